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

//! GP0 polygon commands (0x20-0x3F)
//!
//! ```text
//! bit 4: gouraud shading (one color word per vertex)
//! bit 3: quad (4 vertices) instead of triangle
//! bit 2: textured (one texcoord word after each vertex)
//! bit 1: semi-transparent
//! bit 0: raw texture (no color modulation)
//! ```
//!
//! Texture sampling is not emulated; textured polygons are drawn with their
//! vertex colors, as the hardware does with texturing disabled.

use super::WordReader;
use crate::core::gpu::render::Polygon;
use crate::core::gpu::types::{Color, Vertex};
use crate::core::gpu::GPU;

impl GPU {
    /// Decode and draw a polygon
    ///
    /// # Word layout
    ///
    /// ```text
    /// flat:    Color+Cmd, V1, [UV1], V2, [UV2], V3, [UV3], (V4, [UV4])
    /// gouraud: Color1+Cmd, V1, [UV1], C2, V2, [UV2], C3, V3, [UV3], (C4, V4, [UV4])
    /// ```
    pub(in crate::core::gpu) fn gp0_polygon(&mut self, words: &[u32]) {
        let opcode = (words[0] >> 24) as u8;
        let gouraud = opcode & 0x10 != 0;
        let quad = opcode & 0x08 != 0;
        let textured = opcode & 0x04 != 0;
        let semi_transparent = opcode & 0x02 != 0;
        let raw_texture = opcode & 0x01 != 0;
        let count = if quad { 4 } else { 3 };

        let (dx, dy) = self.draw_offset;
        let mut reader = WordReader::new(words);
        let first_color = Color::from_u32(reader.next_word());

        let mut vertices = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);
        for index in 0..count {
            let color = if gouraud && index > 0 {
                Color::from_u32(reader.next_word())
            } else {
                first_color
            };
            vertices.push(Vertex::from_u32(reader.next_word()).offset(dx, dy));
            colors.push(color);
            if textured {
                reader.skip();
            }
        }

        let polygon = Polygon::new(&vertices, &colors);
        if polygon.is_empty() {
            log::trace!("Polygon 0x{:02X} is degenerate, nothing drawn", opcode);
            return;
        }
        if polygon.exceeds_hardware_limits() {
            log::debug!("Polygon 0x{:02X} exceeds 1023x511, skipped", opcode);
            return;
        }

        log::trace!(
            "Polygon 0x{:02X}: {:?} gouraud={} semi={}",
            opcode,
            vertices,
            gouraud,
            semi_transparent
        );

        let mut state = self.drawing_state(semi_transparent);
        // Only shaded or texture-blended polygons are dithered
        state.dither &= gouraud || (textured && !raw_texture);
        self.dispatch_draw(&polygon, state);
    }
}
