/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! This crate defines the platform-independent API for the compositor-side
//! window buffer adapter. It is implemented for EGL/hybris by the
//! `eglwindow` crate.

mod backend;
mod buffer;
mod error;
mod metadata;
pub mod mock;
mod pixmap;
mod windowdata;

pub use backend::BufferSignal;
pub use backend::GpuBinding;

pub use buffer::BufferQueue;
pub use buffer::MetadataKey;
pub use buffer::WindowKey;

pub use error::Error;

pub use metadata::WindowMetadata;

pub use pixmap::Pixmap;

pub use windowdata::AcquireOutcome;
pub use windowdata::AcquiredPixmap;
pub use windowdata::WindowBufferData;
pub use windowdata::WindowData;
