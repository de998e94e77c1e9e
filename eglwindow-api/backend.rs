/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The trait seams between the window adapter and its platform backend.

use crate::Pixmap;

use gleam::gl::GLuint;

/// One count of the cross-process buffer-return semaphore.
///
/// The client process blocks on the paired semaphore before reusing a
/// buffer it previously posted; each release means "one buffer has been
/// returned to you".
pub trait BufferSignal {
    fn release(&self);
}

/// Binds a native client buffer as the backing store of a GL texture.
pub trait GpuBinding {
    /// The opaque native buffer handle this backend accepts.
    type Buffer;

    /// Whether a GL context is current on the calling thread.
    fn context_is_current(&self) -> bool;

    /// Replaces the active image/texture pair with one backed by `buffer`.
    ///
    /// `pixmap` provides the placeholder contents uploaded to the fresh
    /// texture before the native buffer is attached. Faults are logged and
    /// never propagated; the compositor keeps rendering whatever backing
    /// store the texture ends up with.
    fn rebind(&mut self, pixmap: &Pixmap, buffer: &Self::Buffer);

    /// The GL texture currently backed by a client buffer, if any.
    fn texture(&self) -> Option<GLuint>;
}
