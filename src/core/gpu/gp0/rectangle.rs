// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! GP0 rectangle commands (0x60-0x7F)
//!
//! ```text
//! bits 3-4: size (0=variable, 1=1x1, 2=8x8, 3=16x16)
//! bit 2:    textured (texcoord word after the vertex)
//! bit 1:    semi-transparent
//! ```
//!
//! Rectangles are never dithered.

use super::WordReader;
use crate::core::gpu::render::FlatRect;
use crate::core::gpu::types::{Color, Vertex};
use crate::core::gpu::GPU;

impl GPU {
    /// Decode and draw a rectangle
    ///
    /// # Word layout
    ///
    /// ```text
    /// Color+Cmd, Vertex (top-left), [UV+CLUT], [Size 0xHHHHWWWW]
    /// ```
    pub(in crate::core::gpu) fn gp0_rectangle(&mut self, words: &[u32]) {
        let opcode = (words[0] >> 24) as u8;
        let textured = opcode & 0x04 != 0;
        let semi_transparent = opcode & 0x02 != 0;

        let mut reader = WordReader::new(words);
        let color = Color::from_u32(reader.next_word());
        let vertex = Vertex::from_u32(reader.next_word());
        if textured {
            reader.skip();
        }

        let (width, height) = match (opcode >> 3) & 3 {
            0 => {
                let size = reader.next_word();
                (size & 0x3FF, (size >> 16) & 0x1FF)
            }
            1 => (1, 1),
            2 => (8, 8),
            _ => (16, 16),
        };

        let (dx, dy) = self.draw_offset;
        let origin = vertex.offset(dx, dy);
        let rect = FlatRect {
            x: origin.x,
            y: origin.y,
            width,
            height,
            color,
        };

        log::trace!(
            "Rectangle 0x{:02X}: ({}, {}) {}x{} semi={}",
            opcode,
            rect.x,
            rect.y,
            width,
            height,
            semi_transparent
        );

        let mut state = self.drawing_state(semi_transparent);
        state.dither = false;
        self.dispatch_draw(&rect, state);
    }
}
