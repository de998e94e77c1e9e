/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The compositor-side window buffer adapter.

use crate::BufferQueue;
use crate::BufferSignal;
use crate::GpuBinding;
use crate::Pixmap;
use crate::WindowKey;

use euclid::default::Size2D;

use gleam::gl::GLuint;

use image::Rgba;

use log::debug;

#[cfg(feature = "ipc")]
use serde::{Deserialize, Serialize};

/// Diagnostic fill for the pixmap the compositor presents directly.
const SCREEN_PLACEHOLDER: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Diagnostic fill for the internal back buffer a client buffer replaces.
const BACK_BUFFER_PLACEHOLDER: Rgba<u8> = Rgba([0, 255, 0, 255]);

/// How [`WindowData::acquire_pixmap`] obtained the pixmap it returned.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub enum AcquireOutcome {
    /// No buffer was queued; the caller's own pixmap came straight back
    /// and no window state changed.
    Passthrough,
    /// A buffer was made current and bound as the texture backing store.
    Bound,
    /// A buffer was made current, but no GL context was current on the
    /// calling thread, so the texture binding was left untouched.
    NoActiveContext,
}

/// The pixmap handed back by [`WindowData::acquire_pixmap`], together
/// with the typed outcome the caller must inspect.
#[derive(Debug)]
pub struct AcquiredPixmap<'a> {
    pub outcome: AcquireOutcome,
    pub pixmap: &'a Pixmap,
}

/// Per-window buffer management as the surrounding compositor sees it.
///
/// One implementation exists per buffer-sharing strategy; the compositor
/// only ever talks to this trait.
pub trait WindowData {
    type Buffer;

    fn key(&self) -> WindowKey;
    fn size(&self) -> Size2D<i32>;
    fn has_alpha(&self) -> bool;

    /// Reinterprets the window a quarter turn: swaps width and height and
    /// resets the back buffer at the new dimensions.
    fn flip(&mut self);

    /// Fills `screen` and the internal back buffer with their diagnostic
    /// placeholder colors at the current window size.
    fn initialize_pixmap(&mut self, screen: &mut Pixmap);

    /// Takes the next posted buffer, if any, for rendering.
    ///
    /// See [`AcquireOutcome`] for the three possible results; the returned
    /// pixmap is the one the compositor should render this frame in every
    /// case.
    fn acquire_pixmap<'a>(&'a mut self, screen: &'a Pixmap) -> AcquiredPixmap<'a>;

    /// Producer-side enqueue of a freshly rendered client buffer.
    fn post_buffer(&mut self, buffer: Self::Buffer);

    /// Returns one semaphore count to the producer without consulting the
    /// queue.
    ///
    /// The buffer argument is logged and otherwise unused: a cancel is the
    /// producer withdrawing a buffer it still owns, so the release is owed
    /// whether or not the buffer ever reached the queue.
    fn cancel_buffer(&mut self, buffer: &Self::Buffer);

    /// Extension point for compositing an app's direct-rendering layer.
    fn update_from_direct_rendering_layer(&mut self, x: i32, y: i32, orientation: i32);

    /// Extension point for partial-region updates of the screen pixmap.
    fn on_update_region(&mut self, screen: &mut Pixmap, x: i32, y: i32, w: i32, h: i32);

    fn allow_updates(&mut self, allowed: bool);
    fn updates_allowed(&self) -> bool;

    /// The GL texture currently backed by a client buffer, if any.
    fn texture(&self) -> Option<GLuint>;
}

/// The queue-and-semaphore buffer-sharing strategy.
///
/// Native buffers posted by the client accumulate in an unbounded FIFO;
/// acquiring one makes it current and (given a GL context) rebinds the
/// window texture to it through the injected [`GpuBinding`]. The release
/// signal for a buffer fires only when its successor is acquired, keeping
/// one buffer in flight between the two processes.
pub struct WindowBufferData<G: GpuBinding, S: BufferSignal> {
    key: WindowKey,
    size: Size2D<i32>,
    has_alpha: bool,
    updates_allowed: bool,
    pixmap: Pixmap,
    queue: BufferQueue<G::Buffer>,
    current: Option<G::Buffer>,
    gpu: G,
    signal: S,
}

impl<G: GpuBinding, S: BufferSignal> WindowBufferData<G, S> {
    /// No validation is performed on the key or dimensions; the host
    /// compositor is trusted to pass on what the client negotiated.
    pub fn new(
        key: WindowKey,
        size: Size2D<i32>,
        has_alpha: bool,
        gpu: G,
        signal: S,
    ) -> WindowBufferData<G, S> {
        debug!(
            "creating window buffer data: key = {} width = {} height = {}",
            key.0, size.width, size.height
        );
        WindowBufferData {
            key,
            size,
            has_alpha,
            updates_allowed: true,
            pixmap: Pixmap::new(size, BACK_BUFFER_PLACEHOLDER),
            queue: BufferQueue::new(),
            current: None,
            gpu,
            signal,
        }
    }

    /// The buffer most recently taken for rendering.
    pub fn current_buffer(&self) -> Option<&G::Buffer> {
        self.current.as_ref()
    }

    /// Buffers posted by the client and not yet acquired.
    pub fn queued_buffers(&self) -> usize {
        self.queue.len()
    }

    /// The internal back buffer the adapter returns from a non-empty
    /// acquire.
    pub fn back_buffer(&self) -> &Pixmap {
        &self.pixmap
    }
}

impl<G: GpuBinding, S: BufferSignal> WindowData for WindowBufferData<G, S> {
    type Buffer = G::Buffer;

    fn key(&self) -> WindowKey {
        self.key
    }

    fn size(&self) -> Size2D<i32> {
        self.size
    }

    fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    fn flip(&mut self) {
        self.size = Size2D::new(self.size.height, self.size.width);
        self.pixmap = Pixmap::new(self.size, BACK_BUFFER_PLACEHOLDER);
    }

    fn initialize_pixmap(&mut self, screen: &mut Pixmap) {
        *screen = Pixmap::new(self.size, SCREEN_PLACEHOLDER);
        self.pixmap = Pixmap::new(self.size, BACK_BUFFER_PLACEHOLDER);
    }

    fn acquire_pixmap<'a>(&'a mut self, screen: &'a Pixmap) -> AcquiredPixmap<'a> {
        let next = match self.queue.take() {
            None => {
                return AcquiredPixmap {
                    outcome: AcquireOutcome::Passthrough,
                    pixmap: screen,
                };
            }
            Some(buffer) => buffer,
        };

        // A buffer's release is owed only once its successor is taken;
        // the client blocks on the semaphore before reusing it.
        if self.current.take().is_some() {
            debug!("releasing last used buffer (key = {})", self.key.0);
            self.signal.release();
        }

        debug!("taking next buffer for rendering (key = {})", self.key.0);
        let outcome = if self.gpu.context_is_current() {
            self.gpu.rebind(&self.pixmap, &next);
            AcquireOutcome::Bound
        } else {
            AcquireOutcome::NoActiveContext
        };
        self.current = Some(next);

        AcquiredPixmap {
            outcome,
            pixmap: &self.pixmap,
        }
    }

    fn post_buffer(&mut self, buffer: G::Buffer) {
        debug!(
            "got buffer for rendering from client (key = {})",
            self.key.0
        );
        self.queue.post(buffer);
    }

    fn cancel_buffer(&mut self, _buffer: &G::Buffer) {
        debug!(
            "buffer cancelled by client, releasing one count (key = {})",
            self.key.0
        );
        self.signal.release();
    }

    fn update_from_direct_rendering_layer(&mut self, _x: i32, _y: i32, _orientation: i32) {}

    fn on_update_region(&mut self, _screen: &mut Pixmap, _x: i32, _y: i32, _w: i32, _h: i32) {}

    fn allow_updates(&mut self, allowed: bool) {
        self.updates_allowed = allowed;
    }

    fn updates_allowed(&self) -> bool {
        self.updates_allowed
    }

    fn texture(&self) -> Option<GLuint> {
        self.gpu.texture()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::mock::MockBuffer;
    use crate::mock::MockGpu;
    use crate::mock::MockGpuState;
    use crate::mock::MockSignal;

    use std::cell::Cell;
    use std::rc::Rc;

    fn window() -> (
        WindowBufferData<MockGpu, MockSignal>,
        MockGpuState,
        Rc<Cell<usize>>,
    ) {
        let (gpu, gpu_state) = MockGpu::new();
        let (signal, releases) = MockSignal::new();
        let data = WindowBufferData::new(WindowKey(7), Size2D::new(320, 480), true, gpu, signal);
        (data, gpu_state, releases)
    }

    #[test]
    fn initialize_fills_both_pixmaps_with_placeholders() {
        let (mut data, _, _) = window();
        let mut screen = Pixmap::new(Size2D::new(1, 1), BACK_BUFFER_PLACEHOLDER);
        data.initialize_pixmap(&mut screen);
        assert_eq!(screen.size(), Size2D::new(320, 480));
        assert!(screen.is_solid(SCREEN_PLACEHOLDER));
        assert_eq!(data.back_buffer().size(), Size2D::new(320, 480));
        assert!(data.back_buffer().is_solid(BACK_BUFFER_PLACEHOLDER));
    }

    #[test]
    fn flip_swaps_dimensions_and_resets_the_back_buffer() {
        let (mut data, _, _) = window();
        data.flip();
        assert_eq!(data.size(), Size2D::new(480, 320));
        assert_eq!(data.back_buffer().size(), Size2D::new(480, 320));
        assert!(data.back_buffer().is_solid(BACK_BUFFER_PLACEHOLDER));
    }

    #[test]
    fn acquire_on_an_empty_queue_is_a_passthrough() {
        let (mut data, gpu_state, releases) = window();
        gpu_state.set_context_active(true);
        let screen = Pixmap::new(Size2D::new(320, 480), SCREEN_PLACEHOLDER);
        let before = screen.clone();

        let acquired = data.acquire_pixmap(&screen);
        assert_eq!(acquired.outcome, AcquireOutcome::Passthrough);
        assert_eq!(*acquired.pixmap, before);

        assert!(data.current_buffer().is_none());
        assert_eq!(data.queued_buffers(), 0);
        assert_eq!(releases.get(), 0);
        assert!(gpu_state.bound().is_empty());
    }

    #[test]
    fn buffers_become_current_in_fifo_order() {
        let (mut data, _, _) = window();
        let screen = Pixmap::new(Size2D::new(320, 480), SCREEN_PLACEHOLDER);
        data.post_buffer(MockBuffer(1));
        data.post_buffer(MockBuffer(2));

        let _ = data.acquire_pixmap(&screen);
        assert_eq!(data.current_buffer(), Some(&MockBuffer(1)));
        assert_eq!(data.queued_buffers(), 1);
    }

    #[test]
    fn release_lags_one_acquisition_behind() {
        let (mut data, _, releases) = window();
        let screen = Pixmap::new(Size2D::new(320, 480), SCREEN_PLACEHOLDER);
        data.post_buffer(MockBuffer(1));
        data.post_buffer(MockBuffer(2));

        let _ = data.acquire_pixmap(&screen);
        assert_eq!(releases.get(), 0);

        let _ = data.acquire_pixmap(&screen);
        assert_eq!(releases.get(), 1);
        assert_eq!(data.current_buffer(), Some(&MockBuffer(2)));
        assert_eq!(data.queued_buffers(), 0);
    }

    #[test]
    fn cancel_always_releases_exactly_once() {
        let (mut data, _, releases) = window();
        // Never posted, never current: the release still fires.
        data.cancel_buffer(&MockBuffer(99));
        assert_eq!(releases.get(), 1);
        data.cancel_buffer(&MockBuffer(99));
        assert_eq!(releases.get(), 2);
    }

    #[test]
    fn acquire_without_a_context_skips_the_gpu_binding() {
        let (mut data, gpu_state, _) = window();
        let screen = Pixmap::new(Size2D::new(320, 480), SCREEN_PLACEHOLDER);
        data.post_buffer(MockBuffer(5));

        let acquired = data.acquire_pixmap(&screen);
        assert_eq!(acquired.outcome, AcquireOutcome::NoActiveContext);
        assert!(gpu_state.bound().is_empty());
        assert_eq!(data.texture(), None);
        // The buffer still became current; only the GPU work was skipped.
        assert_eq!(data.current_buffer(), Some(&MockBuffer(5)));
    }

    #[test]
    fn acquire_with_a_context_rebinds_the_texture() {
        let (mut data, gpu_state, _) = window();
        gpu_state.set_context_active(true);
        let screen = Pixmap::new(Size2D::new(320, 480), SCREEN_PLACEHOLDER);
        data.post_buffer(MockBuffer(5));

        let acquired = data.acquire_pixmap(&screen);
        assert_eq!(acquired.outcome, AcquireOutcome::Bound);
        assert!(acquired.pixmap.is_solid(BACK_BUFFER_PLACEHOLDER));

        assert_eq!(gpu_state.bound(), vec![5]);
        assert_eq!(data.texture(), Some(1));
    }

    #[test]
    fn updates_allowed_is_a_plain_toggle() {
        let (mut data, _, _) = window();
        assert!(data.updates_allowed());
        data.allow_updates(false);
        assert!(!data.updates_allowed());
    }
}
