/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::error;
use std::fmt;

/// Faults raised while wiring a window buffer adapter to its platform.
///
/// The running acquire/post/cancel protocol deliberately has no error
/// channel of its own: the host compositor keeps presenting degraded
/// windows, and runtime faults are reported through the `log` facade
/// instead. Only construction-time faults that leave the adapter unable
/// to function are propagated as values of this type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The system EGL library could not be loaded.
    EglLibrary(String),
    /// A required EGL/GLES extension entry point could not be resolved.
    ExtensionMissing(&'static str),
    /// The named buffer-return semaphore could not be opened.
    SemaphoreOpen(String),
    /// The shared metadata region for the given key could not be attached.
    MetadataAttach(i32, String),
    /// EGL image creation failed with the given platform error code.
    ImageCreation(i32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::EglLibrary(reason) => write!(f, "EGL library unavailable: {}", reason),
            Error::ExtensionMissing(name) => {
                write!(f, "missing EGL extension entry point {}", name)
            }
            Error::SemaphoreOpen(reason) => {
                write!(f, "failed to open buffer semaphore: {}", reason)
            }
            Error::MetadataAttach(key, reason) => write!(
                f,
                "failed to attach metadata region (key = {}): {}",
                key, reason
            ),
            Error::ImageCreation(code) => write!(
                f,
                "failed to create an EGL image from the client buffer (egl error {:#x})",
                code
            ),
        }
    }
}

impl error::Error for Error {}
