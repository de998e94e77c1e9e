/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The read-only window metadata region shared by the client.

use eglwindow_api::Error;
use eglwindow_api::MetadataKey;
use eglwindow_api::WindowMetadata;

use std::io;
use std::mem;
use std::ptr;
use std::slice;

/// A SysV shared-memory segment attached read-only by key.
pub struct MetadataRegion {
    addr: *const u8,
    len: usize,
}

impl MetadataRegion {
    /// Attaches the segment the client allocated under `key`.
    pub fn attach(key: MetadataKey) -> Result<MetadataRegion, Error> {
        let id = unsafe { libc::shmget(key.0 as libc::key_t, 0, 0) };
        if id < 0 {
            return Err(Error::MetadataAttach(
                key.0,
                io::Error::last_os_error().to_string(),
            ));
        }
        MetadataRegion::attach_id(key, id)
    }

    fn attach_id(key: MetadataKey, id: libc::c_int) -> Result<MetadataRegion, Error> {
        let addr = unsafe { libc::shmat(id, ptr::null(), libc::SHM_RDONLY) };
        if addr as isize == -1 {
            return Err(Error::MetadataAttach(
                key.0,
                io::Error::last_os_error().to_string(),
            ));
        }
        let mut stat: libc::shmid_ds = unsafe { mem::zeroed() };
        let len = if unsafe { libc::shmctl(id, libc::IPC_STAT, &mut stat) } == 0 {
            stat.shm_segsz as usize
        } else {
            0
        };
        Ok(MetadataRegion {
            addr: addr as *const u8,
            len,
        })
    }

    /// The raw bytes of the region, header included.
    pub fn bytes(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(self.addr, self.len) }
    }

    /// Reads the current metadata header, if the region is large enough
    /// to hold one. The client may be mid-write; callers needing a
    /// consistent view resample until the serial settles.
    pub fn metadata(&self) -> Option<WindowMetadata> {
        if self.len < WindowMetadata::wire_size() {
            return None;
        }
        Some(unsafe { ptr::read_volatile(self.addr as *const WindowMetadata) })
    }
}

impl Drop for MetadataRegion {
    fn drop(&mut self) {
        unsafe {
            libc::shmdt(self.addr as *const libc::c_void);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reads_what_the_writer_stored() {
        unsafe {
            let id = libc::shmget(libc::IPC_PRIVATE, 4096, libc::IPC_CREAT | 0o600);
            assert!(id >= 0);
            let rw = libc::shmat(id, ptr::null(), 0);
            assert_ne!(rw as isize, -1);
            ptr::write_volatile(
                rw as *mut WindowMetadata,
                WindowMetadata {
                    serial: 7,
                    width: 320,
                    height: 480,
                    orientation: 90,
                },
            );

            let region = MetadataRegion::attach_id(MetadataKey(0), id).expect("attach");
            assert_eq!(region.bytes().len(), 4096);
            let snapshot = region.metadata().expect("header");
            assert_eq!(snapshot.serial, 7);
            assert_eq!(snapshot.width, 320);
            assert_eq!(snapshot.height, 480);
            assert_eq!(snapshot.orientation, 90);
            drop(region);

            libc::shmdt(rw);
            libc::shmctl(id, libc::IPC_RMID, ptr::null_mut());
        }
    }

    #[test]
    fn attaching_an_unallocated_key_fails() {
        let key = MetadataKey(0x7e57_0000 | (std::process::id() & 0xffff) as i32);
        assert!(MetadataRegion::attach(key).is_err());
    }
}
