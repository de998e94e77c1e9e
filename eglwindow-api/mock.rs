/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Mock backends for exercising the window adapter without a GPU or a
//! second process.

use crate::BufferSignal;
use crate::GpuBinding;
use crate::Pixmap;

use gleam::gl::GLuint;

use std::cell::Cell;
use std::cell::RefCell;
use std::rc::Rc;

/// A stand-in native buffer carrying just an id.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MockBuffer(pub u32);

/// A shared handle onto everything a [`MockGpu`] was asked to do.
#[derive(Clone, Default)]
pub struct MockGpuState {
    context_active: Rc<Cell<bool>>,
    bound: Rc<RefCell<Vec<u32>>>,
}

impl MockGpuState {
    /// Simulates a GL context becoming (or stopping being) current on the
    /// calling thread.
    pub fn set_context_active(&self, active: bool) {
        self.context_active.set(active);
    }

    /// The ids of every buffer bound so far, in binding order.
    pub fn bound(&self) -> Vec<u32> {
        self.bound.borrow().clone()
    }
}

/// A [`GpuBinding`] that records rebinds instead of talking to a driver.
///
/// Texture names are handed out sequentially, one per rebind.
pub struct MockGpu {
    state: MockGpuState,
}

impl MockGpu {
    pub fn new() -> (MockGpu, MockGpuState) {
        let state = MockGpuState::default();
        (
            MockGpu {
                state: state.clone(),
            },
            state,
        )
    }
}

impl GpuBinding for MockGpu {
    type Buffer = MockBuffer;

    fn context_is_current(&self) -> bool {
        self.state.context_active.get()
    }

    fn rebind(&mut self, _pixmap: &Pixmap, buffer: &MockBuffer) {
        self.state.bound.borrow_mut().push(buffer.0);
    }

    fn texture(&self) -> Option<GLuint> {
        let bound = self.state.bound.borrow();
        if bound.is_empty() {
            None
        } else {
            Some(bound.len() as GLuint)
        }
    }
}

/// A [`BufferSignal`] that counts releases.
pub struct MockSignal {
    releases: Rc<Cell<usize>>,
}

impl MockSignal {
    pub fn new() -> (MockSignal, Rc<Cell<usize>>) {
        let releases = Rc::new(Cell::new(0));
        (
            MockSignal {
                releases: releases.clone(),
            },
            releases,
        )
    }
}

impl BufferSignal for MockSignal {
    fn release(&self) {
        self.releases.set(self.releases.get() + 1);
    }
}
