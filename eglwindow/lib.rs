/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! This crate implements the window buffer adapter defined by
//! `eglwindow-api` for hybris platforms: client-rendered native buffers
//! are wrapped as EGL images and bound as GL texture backing stores, with
//! a POSIX named semaphore returning consumed buffers to the client.

mod buffer;
mod egl;
mod gpu;
mod semaphore;
mod shm;

pub use buffer::OffscreenNativeBuffer;

pub use egl::EglExtensions;
pub use egl::EglLibrary;

pub use gpu::EglGpuBinding;

pub use semaphore::NamedSemaphore;

pub use shm::MetadataRegion;

use eglwindow_api::AcquiredPixmap;
use eglwindow_api::Error;
use eglwindow_api::MetadataKey;
use eglwindow_api::Pixmap;
use eglwindow_api::WindowBufferData;
use eglwindow_api::WindowData;
use eglwindow_api::WindowKey;
use eglwindow_api::WindowMetadata;

use euclid::default::Size2D;

use gleam::gl::GLuint;

use log::error;

use sparkle::gl::Gl;

use std::ffi::CString;
use std::ptr;
use std::rc::Rc;

/// Compositor-side buffer management for one hybris client window.
///
/// Holds an `Rc` GL handle, so it stays on the compositor's render
/// thread; cross-process coordination happens solely through the named
/// buffer-return semaphore.
pub struct HybrisWindowData {
    data: WindowBufferData<EglGpuBinding, NamedSemaphore>,
    metadata: Option<MetadataRegion>,
}

impl HybrisWindowData {
    /// Attaches the optional metadata region, loads the EGL entry points
    /// (once per process) and opens the window's buffer-return semaphore.
    ///
    /// A missing metadata region is logged and tolerated; an unusable EGL
    /// library or semaphore is not, since the adapter cannot function
    /// without them.
    pub fn new(
        key: WindowKey,
        metadata_key: MetadataKey,
        size: Size2D<i32>,
        has_alpha: bool,
        gl: Rc<Gl>,
    ) -> Result<HybrisWindowData, Error> {
        let metadata = if metadata_key.is_present() {
            match MetadataRegion::attach(metadata_key) {
                Ok(region) => Some(region),
                Err(err) => {
                    error!(
                        "failed to attach to metadata shared buffer with key {}: {}",
                        metadata_key.0, err
                    );
                    None
                }
            }
        } else {
            None
        };

        let library = EglLibrary::open()?;
        let extensions = EglExtensions::resolve(library)?;
        let display = library.default_display();
        let signal = NamedSemaphore::open(key)?;
        let gpu = EglGpuBinding::new(library, extensions, display, gl);

        Ok(HybrisWindowData {
            data: WindowBufferData::new(key, size, has_alpha, gpu, signal),
            metadata,
        })
    }

    /// The latest metadata header published by the client, if a region
    /// was attached and is large enough to carry one.
    pub fn metadata(&self) -> Option<WindowMetadata> {
        self.metadata.as_ref().and_then(MetadataRegion::metadata)
    }

    /// The buffer most recently taken for rendering.
    pub fn current_buffer(&self) -> Option<&OffscreenNativeBuffer> {
        self.data.current_buffer()
    }

    /// Buffers posted by the client and not yet acquired.
    pub fn queued_buffers(&self) -> usize {
        self.data.queued_buffers()
    }
}

impl WindowData for HybrisWindowData {
    type Buffer = OffscreenNativeBuffer;

    fn key(&self) -> WindowKey {
        self.data.key()
    }

    fn size(&self) -> Size2D<i32> {
        self.data.size()
    }

    fn has_alpha(&self) -> bool {
        self.data.has_alpha()
    }

    fn flip(&mut self) {
        self.data.flip()
    }

    fn initialize_pixmap(&mut self, screen: &mut Pixmap) {
        self.data.initialize_pixmap(screen)
    }

    fn acquire_pixmap<'a>(&'a mut self, screen: &'a Pixmap) -> AcquiredPixmap<'a> {
        self.data.acquire_pixmap(screen)
    }

    fn post_buffer(&mut self, buffer: OffscreenNativeBuffer) {
        self.data.post_buffer(buffer)
    }

    fn cancel_buffer(&mut self, buffer: &OffscreenNativeBuffer) {
        self.data.cancel_buffer(buffer)
    }

    fn update_from_direct_rendering_layer(&mut self, x: i32, y: i32, orientation: i32) {
        self.data.update_from_direct_rendering_layer(x, y, orientation)
    }

    fn on_update_region(&mut self, screen: &mut Pixmap, x: i32, y: i32, w: i32, h: i32) {
        self.data.on_update_region(screen, x, y, w, h)
    }

    fn allow_updates(&mut self, allowed: bool) {
        self.data.allow_updates(allowed)
    }

    fn updates_allowed(&self) -> bool {
        self.data.updates_allowed()
    }

    fn texture(&self) -> Option<GLuint> {
        self.data.texture()
    }
}

/// Loads GLES entry points through `eglGetProcAddress`, the path hybris
/// drivers expose them on.
pub fn load_gles(library: &'static EglLibrary) -> Rc<Gl> {
    Gl::gles_fns(sparkle::gl::ffi_gles::Gles2::load_with(|symbol| {
        match CString::new(symbol) {
            Ok(name) => library.lookup(name.as_bytes_with_nul()) as *const _,
            Err(_) => ptr::null(),
        }
    }))
}
