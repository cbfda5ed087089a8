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

//! GP0 line commands (0x40-0x5F)
//!
//! ```text
//! bit 4: gouraud shading
//! bit 3: polyline (vertices until a 0x5xxx5xxx terminator word)
//! bit 1: semi-transparent
//! ```
//!
//! Each segment of a polyline is its own dispatch, so the shared end point
//! of consecutive segments is drawn twice.

use super::{DecoderState, WordReader};
use crate::core::gpu::render::LineSegment;
use crate::core::gpu::types::{Color, Vertex};
use crate::core::gpu::GPU;

/// Polyline terminator pattern, checked on every word after the first segment
const POLYLINE_TERMINATOR_MASK: u32 = 0xF000_F000;
const POLYLINE_TERMINATOR: u32 = 0x5000_5000;

/// A polyline waiting for its next vertex
#[derive(Debug, Clone, Copy)]
pub(in crate::core::gpu) struct PolylineState {
    gouraud: bool,
    semi_transparent: bool,
    /// End point of the last segment, offset applied
    last_vertex: Vertex,
    last_color: Color,
    /// Gouraud polylines send the color before the vertex
    pending_color: Option<Color>,
}

impl GPU {
    /// Decode a line command and draw its first segment
    ///
    /// # Word layout
    ///
    /// ```text
    /// flat:    Color+Cmd, V1, V2, [V3, ...terminator]
    /// gouraud: Color1+Cmd, V1, C2, V2, [C3, V3, ...terminator]
    /// ```
    pub(in crate::core::gpu) fn gp0_line(&mut self, words: &[u32]) -> DecoderState {
        let opcode = (words[0] >> 24) as u8;
        let gouraud = opcode & 0x10 != 0;
        let polyline = opcode & 0x08 != 0;
        let semi_transparent = opcode & 0x02 != 0;

        let (dx, dy) = self.draw_offset;
        let mut reader = WordReader::new(words);
        let start_color = Color::from_u32(reader.next_word());
        let start = Vertex::from_u32(reader.next_word()).offset(dx, dy);
        let end_color = if gouraud {
            Color::from_u32(reader.next_word())
        } else {
            start_color
        };
        let end = Vertex::from_u32(reader.next_word()).offset(dx, dy);

        self.draw_line_segment(start, end, start_color, end_color, gouraud, semi_transparent);

        if polyline {
            DecoderState::ReceivingPolyline(PolylineState {
                gouraud,
                semi_transparent,
                last_vertex: end,
                last_color: end_color,
                pending_color: None,
            })
        } else {
            DecoderState::Idle
        }
    }

    /// Feed one word to an open polyline
    pub(in crate::core::gpu) fn continue_polyline(
        &mut self,
        mut polyline: PolylineState,
        word: u32,
    ) -> DecoderState {
        if word & POLYLINE_TERMINATOR_MASK == POLYLINE_TERMINATOR {
            log::trace!("Polyline terminated");
            return DecoderState::Idle;
        }

        if polyline.gouraud && polyline.pending_color.is_none() {
            polyline.pending_color = Some(Color::from_u32(word));
            return DecoderState::ReceivingPolyline(polyline);
        }

        let color = polyline.pending_color.take().unwrap_or(polyline.last_color);
        let (dx, dy) = self.draw_offset;
        let vertex = Vertex::from_u32(word).offset(dx, dy);

        self.draw_line_segment(
            polyline.last_vertex,
            vertex,
            polyline.last_color,
            color,
            polyline.gouraud,
            polyline.semi_transparent,
        );

        polyline.last_vertex = vertex;
        polyline.last_color = color;
        DecoderState::ReceivingPolyline(polyline)
    }

    fn draw_line_segment(
        &mut self,
        start: Vertex,
        end: Vertex,
        start_color: Color,
        end_color: Color,
        gouraud: bool,
        semi_transparent: bool,
    ) {
        let segment = LineSegment::new(start, end, start_color, end_color);
        if segment.exceeds_hardware_limits() {
            log::debug!(
                "Line ({}, {}) -> ({}, {}) exceeds 1023x511, skipped",
                start.x,
                start.y,
                end.x,
                end.y
            );
            return;
        }

        log::trace!(
            "Line ({}, {}) -> ({}, {}) gouraud={} semi={}",
            start.x,
            start.y,
            end.x,
            end.y,
            gouraud,
            semi_transparent
        );

        let mut state = self.drawing_state(semi_transparent);
        state.dither &= gouraud;
        self.dispatch_draw(&segment, state);
    }
}
