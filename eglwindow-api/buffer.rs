/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Buffer bookkeeping shared between the producer and consumer sides.

use std::collections::VecDeque;

#[cfg(feature = "ipc")]
use serde::{Deserialize, Serialize};

/// Identifies one compositor window and names its cross-process
/// buffer-return semaphore.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub struct WindowKey(pub i32);

impl WindowKey {
    /// The semaphore name shared with the client process.
    pub fn semaphore_name(&self) -> String {
        format!("EGLWindow{}", self.0)
    }
}

/// The shared-memory key of a window's optional metadata region.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub struct MetadataKey(pub i32);

impl MetadataKey {
    /// Keys at or below zero mean no metadata region was allocated.
    pub fn is_present(&self) -> bool {
        self.0 > 0
    }
}

/// An unbounded FIFO of native buffers posted by the client renderer.
///
/// The producer side appends; the compositor takes buffers out one at a
/// time when it acquires a pixmap. There is no capacity bound and no drop
/// policy: flow control lives entirely in the buffer-return semaphore.
pub struct BufferQueue<B> {
    buffers: VecDeque<B>,
}

impl<B> BufferQueue<B> {
    pub fn new() -> BufferQueue<B> {
        BufferQueue {
            buffers: VecDeque::new(),
        }
    }

    /// Producer-side enqueue at the tail.
    pub fn post(&mut self, buffer: B) {
        self.buffers.push_back(buffer);
    }

    /// Consumer-side dequeue from the head.
    pub fn take(&mut self) -> Option<B> {
        self.buffers.pop_front()
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

impl<B> Default for BufferQueue<B> {
    fn default() -> BufferQueue<B> {
        BufferQueue::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_come_back_out_in_post_order() {
        let mut queue = BufferQueue::new();
        queue.post(1);
        queue.post(2);
        queue.post(3);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.take(), Some(1));
        assert_eq!(queue.take(), Some(2));
        assert_eq!(queue.take(), Some(3));
        assert_eq!(queue.take(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn window_key_names_its_semaphore() {
        assert_eq!(WindowKey(42).semaphore_name(), "EGLWindow42");
    }

    #[test]
    fn non_positive_metadata_keys_are_absent() {
        assert!(MetadataKey(7).is_present());
        assert!(!MetadataKey(0).is_present());
        assert!(!MetadataKey(-1).is_present());
    }
}
