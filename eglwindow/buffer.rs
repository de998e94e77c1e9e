/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::egl::EGLClientBuffer;

use std::os::raw::c_void;

/// A native window buffer rendered by the client's offscreen window.
///
/// The compositor never inspects the handle; it travels through the queue
/// unchanged and is only ever wrapped as an EGL client buffer when bound.
/// The client retains ownership and is told through the buffer-return
/// semaphore when it may reuse the memory.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OffscreenNativeBuffer {
    handle: *const c_void,
}

impl OffscreenNativeBuffer {
    /// Wraps the raw handle received from the client process. The handle
    /// must stay valid until the buffer is released back to the client.
    pub fn from_raw(handle: *const c_void) -> OffscreenNativeBuffer {
        OffscreenNativeBuffer { handle }
    }

    pub fn as_client_buffer(&self) -> EGLClientBuffer {
        self.handle
    }
}
