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

//! GP0 Drawing Mode Commands
//!
//! # Commands
//!
//! - 0xE1: Draw Mode Setting (texture page, semi-transparency mode, dithering)
//! - 0xE2: Texture Window Setting
//! - 0xE3: Set Drawing Area Top-Left
//! - 0xE4: Set Drawing Area Bottom-Right
//! - 0xE5: Set Drawing Offset
//! - 0xE6: Mask Bit Setting
//!
//! # References
//!
//! - [PSX-SPX: GP0 Drawing Settings](http://problemkaputt.de/psx-spx.htm#gpurenderattributes)

use crate::core::gpu::registers::{DrawMode, TextureWindow};
use crate::core::gpu::types::sign_extend_11;
use crate::core::gpu::GPU;

impl GPU {
    /// GP0(E1h) - Draw Mode Setting (aka "Texpage")
    ///
    /// ```text
    ///   Bit 0-3:   Texture page X Base   (N*64)
    ///   Bit 4:     Texture page Y Base   (N*256)
    ///   Bit 5-6:   Semi Transparency     (0=B/2+F/2, 1=B+F, 2=B-F, 3=B+F/4)
    ///   Bit 7-8:   Texture page colors   (0=4bit, 1=8bit, 2=15bit)
    ///   Bit 9:     Dithering enabled
    ///   Bit 10:    Drawing to display area allowed
    ///   Bit 11:    Texture disable
    /// ```
    pub(in crate::core::gpu) fn gp0_draw_mode(&mut self, cmd: u32) {
        self.draw_mode = DrawMode::from_u32(cmd);

        log::debug!(
            "Draw mode: page=({}, {}) semi={:?} dither={} tex_disable={}",
            self.draw_mode.texture_page_x,
            self.draw_mode.texture_page_y,
            self.draw_mode.blend_mode,
            self.draw_mode.dithering,
            self.draw_mode.texture_disable
        );
    }

    /// GP0(E2h) - Texture Window Setting
    pub(in crate::core::gpu) fn gp0_texture_window(&mut self, cmd: u32) {
        self.texture_window = TextureWindow::from_u32(cmd);
        log::debug!("Texture window: {:?}", self.texture_window);
    }

    /// GP0(E3h) - Set Drawing Area Top-Left
    ///
    /// ```text
    ///   Bit 0-9:   X-coordinate (0-1023)
    ///   Bit 10-18: Y-coordinate (0-511)
    /// ```
    pub(in crate::core::gpu) fn gp0_draw_area_top_left(&mut self, cmd: u32) {
        self.draw_area.left = (cmd & 0x3FF) as i32;
        self.draw_area.top = ((cmd >> 10) & 0x1FF) as i32;

        log::debug!(
            "Drawing area top-left: ({}, {})",
            self.draw_area.left,
            self.draw_area.top
        );
    }

    /// GP0(E4h) - Set Drawing Area Bottom-Right
    ///
    /// Same layout as E3h. Both corners are inclusive.
    pub(in crate::core::gpu) fn gp0_draw_area_bottom_right(&mut self, cmd: u32) {
        self.draw_area.right = (cmd & 0x3FF) as i32;
        self.draw_area.bottom = ((cmd >> 10) & 0x1FF) as i32;

        log::debug!(
            "Drawing area bottom-right: ({}, {})",
            self.draw_area.right,
            self.draw_area.bottom
        );
    }

    /// GP0(E5h) - Set Drawing Offset
    ///
    /// ```text
    ///   Bit 0-10:  X-offset (-1024..+1023, signed 11-bit)
    ///   Bit 11-21: Y-offset (-1024..+1023, signed 11-bit)
    /// ```
    pub(in crate::core::gpu) fn gp0_draw_offset(&mut self, cmd: u32) {
        let x = sign_extend_11(cmd);
        let y = sign_extend_11(cmd >> 11);
        self.draw_offset = (x, y);

        log::debug!("Drawing offset: ({}, {})", x, y);
    }

    /// GP0(E6h) - Mask Bit Setting
    ///
    /// ```text
    ///   Bit 0: Set mask while drawing (0=TextureBit15, 1=ForceBit15=1)
    ///   Bit 1: Check mask before draw (0=Draw Always, 1=Draw if Bit15=0)
    /// ```
    pub(in crate::core::gpu) fn gp0_mask_settings(&mut self, cmd: u32) {
        self.set_mask = cmd & 1 != 0;
        self.check_mask = cmd & 2 != 0;

        log::debug!(
            "Mask settings: set_mask={} check_mask={}",
            self.set_mask,
            self.check_mask
        );
    }
}
