/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Binds posted client buffers to GL textures through EGL images.

use crate::buffer::OffscreenNativeBuffer;
use crate::egl;
use crate::egl::EGLDisplay;
use crate::egl::EGLImageKHR;
use crate::egl::EglExtensions;
use crate::egl::EglLibrary;

use eglwindow_api::Error;
use eglwindow_api::GpuBinding;
use eglwindow_api::Pixmap;

use log::warn;

use sparkle::gl;
use sparkle::gl::GLint;
use sparkle::gl::GLuint;
use sparkle::gl::Gl;

use std::rc::Rc;

/// GPU binding state for one window: at most one EGL image and one GL
/// texture, both replaced wholesale on every rebind.
pub struct EglGpuBinding {
    library: &'static EglLibrary,
    extensions: EglExtensions,
    display: EGLDisplay,
    gl: Rc<Gl>,
    image: Option<EGLImageKHR>,
    texture: Option<GLuint>,
}

impl EglGpuBinding {
    pub fn new(
        library: &'static EglLibrary,
        extensions: EglExtensions,
        display: EGLDisplay,
        gl: Rc<Gl>,
    ) -> EglGpuBinding {
        EglGpuBinding {
            library,
            extensions,
            display,
            gl,
            image: None,
            texture: None,
        }
    }

    /// Tears down the previous binding. Only called with a context
    /// current.
    fn destroy_binding(&mut self) {
        if let Some(image) = self.image.take() {
            unsafe {
                (self.extensions.destroy_image)(self.display, image);
            }
        }
        if let Some(texture) = self.texture.take() {
            self.gl.delete_textures(&[texture]);
        }
    }

    fn upload_placeholder(&self, pixmap: &Pixmap) -> GLuint {
        let texture = self.gl.gen_textures(1)[0];
        let size = pixmap.size();
        self.gl.bind_texture(gl::TEXTURE_2D, texture);
        self.gl
            .tex_parameter_i(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::LINEAR as GLint);
        self.gl
            .tex_parameter_i(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);
        self.gl.tex_parameter_i(
            gl::TEXTURE_2D,
            gl::TEXTURE_WRAP_S,
            gl::CLAMP_TO_EDGE as GLint,
        );
        self.gl.tex_parameter_i(
            gl::TEXTURE_2D,
            gl::TEXTURE_WRAP_T,
            gl::CLAMP_TO_EDGE as GLint,
        );
        self.gl.tex_image_2d(
            gl::TEXTURE_2D,
            0,
            gl::RGBA as GLint,
            size.width,
            size.height,
            0,
            gl::RGBA,
            gl::UNSIGNED_BYTE,
            gl::TexImageSource::Pixels(Some(pixmap.data())),
        );
        texture
    }
}

impl GpuBinding for EglGpuBinding {
    type Buffer = OffscreenNativeBuffer;

    fn context_is_current(&self) -> bool {
        self.library.has_current_context()
    }

    fn rebind(&mut self, pixmap: &Pixmap, buffer: &OffscreenNativeBuffer) {
        self.destroy_binding();

        let texture = self.upload_placeholder(pixmap);

        let attributes = egl::preserved_image_attributes();
        let image = unsafe {
            (self.extensions.create_image)(
                self.display,
                egl::EGL_NO_CONTEXT,
                egl::EGL_NATIVE_BUFFER_ANDROID,
                buffer.as_client_buffer(),
                attributes.as_ptr(),
            )
        };
        if image == egl::EGL_NO_IMAGE_KHR {
            warn!("{}", Error::ImageCreation(self.library.error_code()));
        }

        // The texture keeps whatever backing store this call leaves it
        // with, even after a failed image creation.
        unsafe {
            (self.extensions.image_target_texture_2d)(gl::TEXTURE_2D, image);
        }

        self.image = if image == egl::EGL_NO_IMAGE_KHR {
            None
        } else {
            Some(image)
        };
        self.texture = Some(texture);
    }

    fn texture(&self) -> Option<GLuint> {
        self.texture
    }
}

impl Drop for EglGpuBinding {
    fn drop(&mut self) {
        if let Some(image) = self.image.take() {
            unsafe {
                (self.extensions.destroy_image)(self.display, image);
            }
        }
        if let Some(texture) = self.texture.take() {
            if self.library.has_current_context() {
                self.gl.delete_textures(&[texture]);
            } else {
                warn!(
                    "no GL context current at teardown, leaking texture {}",
                    texture
                );
            }
        }
    }
}
