/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::mem;

#[cfg(feature = "ipc")]
use serde::{Deserialize, Serialize};

/// The header of a window's shared metadata region.
///
/// The client renderer writes it in place and bumps `serial` after every
/// complete update; the compositor only ever reads. Unknown bytes past the
/// header belong to the client and are exposed as a raw slice by the
/// platform crate.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct WindowMetadata {
    pub serial: u32,
    pub width: i32,
    pub height: i32,
    /// Quarter-turn orientation of the client's content, in degrees.
    pub orientation: i32,
}

impl WindowMetadata {
    /// The size in bytes of the shared header.
    pub fn wire_size() -> usize {
        mem::size_of::<WindowMetadata>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout_is_stable() {
        assert_eq!(WindowMetadata::wire_size(), 16);
    }
}
