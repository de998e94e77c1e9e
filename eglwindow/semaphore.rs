/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Cross-process buffer-return signalling.

use eglwindow_api::BufferSignal;
use eglwindow_api::Error;
use eglwindow_api::WindowKey;

use log::warn;

use std::ffi::CString;
use std::io;

/// A POSIX named counting semaphore following the `EGLWindow<key>` naming
/// convention shared with the client process.
///
/// Either side may open first: the semaphore is created empty if it does
/// not exist yet. The compositor only ever posts; the client waits before
/// reusing a buffer it posted earlier.
pub struct NamedSemaphore {
    name: CString,
    sem: *mut libc::sem_t,
}

// The handle is a process-wide kernel object; the raw pointer is only
// thread-affine in the type system.
unsafe impl Send for NamedSemaphore {}

impl NamedSemaphore {
    pub fn open(key: WindowKey) -> Result<NamedSemaphore, Error> {
        let name = CString::new(format!("/{}", key.semaphore_name()))
            .map_err(|err| Error::SemaphoreOpen(err.to_string()))?;
        let sem = unsafe {
            libc::sem_open(
                name.as_ptr(),
                libc::O_CREAT,
                0o600 as libc::mode_t,
                0 as libc::c_uint,
            )
        };
        if sem == libc::SEM_FAILED {
            return Err(Error::SemaphoreOpen(format!(
                "sem_open({}): {}",
                name.to_string_lossy(),
                io::Error::last_os_error()
            )));
        }
        Ok(NamedSemaphore { name, sem })
    }

    /// Returns one count to the producer.
    pub fn post(&self) {
        if unsafe { libc::sem_post(self.sem) } != 0 {
            warn!(
                "sem_post({}): {}",
                self.name.to_string_lossy(),
                io::Error::last_os_error()
            );
        }
    }

    /// Producer side: blocks until the compositor returns a buffer.
    pub fn wait(&self) {
        loop {
            if unsafe { libc::sem_wait(self.sem) } == 0 {
                return;
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                warn!("sem_wait({}): {}", self.name.to_string_lossy(), err);
                return;
            }
        }
    }

    /// Producer side: takes one count if one is immediately available.
    pub fn try_wait(&self) -> bool {
        unsafe { libc::sem_trywait(self.sem) == 0 }
    }

    /// Removes the name from the system so a later open starts fresh.
    /// The semaphore itself lives until every holder closes it.
    pub fn unlink(&self) {
        unsafe {
            libc::sem_unlink(self.name.as_ptr());
        }
    }
}

impl Drop for NamedSemaphore {
    fn drop(&mut self) {
        unsafe {
            libc::sem_close(self.sem);
        }
    }
}

impl BufferSignal for NamedSemaphore {
    fn release(&self) {
        self.post();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_and_try_wait_round_trip() {
        // A process-unique key keeps parallel test runs apart; unlinking
        // right away leaves nothing behind while the handle stays valid.
        let key = WindowKey(std::process::id() as i32);
        let sem = NamedSemaphore::open(key).expect("sem_open");
        sem.unlink();

        assert!(!sem.try_wait());
        sem.post();
        sem.post();
        assert!(sem.try_wait());
        assert!(sem.try_wait());
        assert!(!sem.try_wait());
    }
}
