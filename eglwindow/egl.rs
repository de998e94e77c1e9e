/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Hand-maintained EGL bindings: the few core entry points the adapter
//! relies on, plus the extension capability table used to wrap native
//! client buffers.

#![allow(non_camel_case_types)]

use eglwindow_api::Error;

use log::debug;

use std::mem;
use std::os::raw::{c_char, c_void};
use std::ptr;
use std::sync::OnceLock;

pub type EGLBoolean = u32;
pub type EGLenum = u32;
pub type EGLint = i32;
pub type EGLDisplay = *const c_void;
pub type EGLContext = *const c_void;
pub type EGLClientBuffer = *const c_void;
pub type EGLImageKHR = *const c_void;
pub type EGLNativeDisplayType = *const c_void;

pub const EGL_DEFAULT_DISPLAY: EGLNativeDisplayType = ptr::null();
pub const EGL_NO_CONTEXT: EGLContext = ptr::null();
pub const EGL_NO_DISPLAY: EGLDisplay = ptr::null();
pub const EGL_NO_IMAGE_KHR: EGLImageKHR = ptr::null();

pub const EGL_NONE: EGLint = 0x3038;
pub const EGL_TRUE: EGLint = 1;
pub const EGL_IMAGE_PRESERVED_KHR: EGLint = 0x30D2;
pub const EGL_NATIVE_BUFFER_ANDROID: EGLenum = 0x3140;

pub type PFNEGLGETDISPLAYPROC = unsafe extern "C" fn(EGLNativeDisplayType) -> EGLDisplay;
pub type PFNEGLGETPROCADDRESSPROC = unsafe extern "C" fn(*const c_char) -> *mut c_void;
pub type PFNEGLGETERRORPROC = unsafe extern "C" fn() -> EGLint;
pub type PFNEGLGETCURRENTCONTEXTPROC = unsafe extern "C" fn() -> EGLContext;
pub type PFNEGLCREATEIMAGEKHRPROC = unsafe extern "C" fn(
    EGLDisplay,
    EGLContext,
    EGLenum,
    EGLClientBuffer,
    *const EGLint,
) -> EGLImageKHR;
pub type PFNEGLDESTROYIMAGEKHRPROC = unsafe extern "C" fn(EGLDisplay, EGLImageKHR) -> EGLBoolean;
pub type PFNGLEGLIMAGETARGETTEXTURE2DOESPROC = unsafe extern "C" fn(u32, EGLImageKHR);

static EGL_LIBRARY: OnceLock<Result<EglLibrary, Error>> = OnceLock::new();
static EGL_EXTENSIONS: OnceLock<Result<EglExtensions, Error>> = OnceLock::new();

/// The system EGL library, loaded once and kept loaded for the life of
/// the process.
pub struct EglLibrary {
    _library: libloading::Library,
    get_display: PFNEGLGETDISPLAYPROC,
    get_proc_address: PFNEGLGETPROCADDRESSPROC,
    get_error: PFNEGLGETERRORPROC,
    get_current_context: PFNEGLGETCURRENTCONTEXTPROC,
}

impl EglLibrary {
    pub fn open() -> Result<&'static EglLibrary, Error> {
        EGL_LIBRARY
            .get_or_init(EglLibrary::load)
            .as_ref()
            .map_err(Clone::clone)
    }

    fn load() -> Result<EglLibrary, Error> {
        unsafe {
            let library = libloading::Library::new("libEGL.so.1")
                .map_err(|err| Error::EglLibrary(format!("failed to load libEGL.so.1: {}", err)))?;
            let get_display = *library
                .get::<PFNEGLGETDISPLAYPROC>(b"eglGetDisplay\0")
                .map_err(|err| Error::EglLibrary(err.to_string()))?;
            let get_proc_address = *library
                .get::<PFNEGLGETPROCADDRESSPROC>(b"eglGetProcAddress\0")
                .map_err(|err| Error::EglLibrary(err.to_string()))?;
            let get_error = *library
                .get::<PFNEGLGETERRORPROC>(b"eglGetError\0")
                .map_err(|err| Error::EglLibrary(err.to_string()))?;
            let get_current_context = *library
                .get::<PFNEGLGETCURRENTCONTEXTPROC>(b"eglGetCurrentContext\0")
                .map_err(|err| Error::EglLibrary(err.to_string()))?;
            debug!("loaded libEGL.so.1");
            Ok(EglLibrary {
                _library: library,
                get_display,
                get_proc_address,
                get_error,
                get_current_context,
            })
        }
    }

    /// The platform default display handle.
    pub fn default_display(&self) -> EGLDisplay {
        unsafe { (self.get_display)(EGL_DEFAULT_DISPLAY) }
    }

    /// The error code of the most recent EGL call on this thread.
    pub fn error_code(&self) -> EGLint {
        unsafe { (self.get_error)() }
    }

    /// Whether any EGL context is current on the calling thread.
    pub fn has_current_context(&self) -> bool {
        unsafe { (self.get_current_context)() != EGL_NO_CONTEXT }
    }

    /// Resolves an entry point by nul-terminated name. Null comes back
    /// untouched so callers can surface the missing symbol themselves.
    pub fn lookup(&self, name: &[u8]) -> *mut c_void {
        debug_assert!(name.ends_with(&[0]));
        unsafe { (self.get_proc_address)(name.as_ptr() as *const c_char) }
    }
}

/// The extension entry points that wrap native client buffers, resolved
/// once per process and injected into the component using them.
#[derive(Clone, Copy)]
pub struct EglExtensions {
    pub create_image: PFNEGLCREATEIMAGEKHRPROC,
    pub destroy_image: PFNEGLDESTROYIMAGEKHRPROC,
    pub image_target_texture_2d: PFNGLEGLIMAGETARGETTEXTURE2DOESPROC,
}

impl EglExtensions {
    pub fn resolve(library: &EglLibrary) -> Result<EglExtensions, Error> {
        EGL_EXTENSIONS
            .get_or_init(|| EglExtensions::lookup_all(library))
            .clone()
    }

    fn lookup_all(library: &EglLibrary) -> Result<EglExtensions, Error> {
        let create_image = library.lookup(b"eglCreateImageKHR\0");
        if create_image.is_null() {
            return Err(Error::ExtensionMissing("eglCreateImageKHR"));
        }
        let destroy_image = library.lookup(b"eglDestroyImageKHR\0");
        if destroy_image.is_null() {
            return Err(Error::ExtensionMissing("eglDestroyImageKHR"));
        }
        let image_target_texture_2d = library.lookup(b"glEGLImageTargetTexture2DOES\0");
        if image_target_texture_2d.is_null() {
            return Err(Error::ExtensionMissing("glEGLImageTargetTexture2DOES"));
        }
        unsafe {
            Ok(EglExtensions {
                create_image: mem::transmute(create_image),
                destroy_image: mem::transmute(destroy_image),
                image_target_texture_2d: mem::transmute(image_target_texture_2d),
            })
        }
    }
}

/// The attribute list asking EGL to preserve the wrapped buffer's
/// contents when it is bound.
pub fn preserved_image_attributes() -> [EGLint; 3] {
    [EGL_IMAGE_PRESERVED_KHR, EGL_TRUE, EGL_NONE]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_attributes_are_none_terminated() {
        let attributes = preserved_image_attributes();
        assert_eq!(attributes[0], EGL_IMAGE_PRESERVED_KHR);
        assert_eq!(attributes[1], EGL_TRUE);
        assert_eq!(attributes[2], EGL_NONE);
    }
}
