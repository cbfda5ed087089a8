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

//! GP0 Fill Rectangle command
//!
//! GP0(02h) clears a VRAM rectangle to a solid color. It is a raw fill:
//! drawing area, drawing offset, dithering and mask settings are all ignored.

use crate::core::gpu::dispatch::DispatchStats;
use crate::core::gpu::pipeline::quantize;
use crate::core::gpu::types::{Color, Pixel};
use crate::core::gpu::GPU;

impl GPU {
    /// GP0(0x02): Fill Rectangle in VRAM
    ///
    /// # Command Format
    ///
    /// ```text
    /// Word 0: 0x02BBGGRR  color
    /// Word 1: 0xYYYYXXXX  top-left corner (x rounded down to 16 pixels)
    /// Word 2: 0xHHHHWWWW  size (width rounded up to 16 pixels)
    /// ```
    ///
    /// # Examples
    ///
    /// ```
    /// # use psx_gpu::core::GPU;
    /// let mut gpu = GPU::new();
    ///
    /// gpu.write_gp0(0x0200_00FF); // red
    /// gpu.write_gp0(0x0032_0020); // X=32, Y=50
    /// gpu.write_gp0(0x0064_0064); // 100×100, width becomes 112
    ///
    /// assert_eq!(gpu.read_vram(32, 50).raw(), 0x001F);
    /// assert_eq!(gpu.read_vram(32 + 111, 50).raw(), 0x001F);
    /// assert_eq!(gpu.read_vram(32 + 112, 50).raw(), 0x0000);
    /// ```
    pub(in crate::core::gpu) fn gp0_fill_rectangle(&mut self, words: &[u32]) {
        let color = Color::from_u32(words[0]);
        let x = words[1] & 0x3F0;
        let y = (words[1] >> 16) & 0x1FF;
        let width = ((words[2] & 0x3FF) + 0xF) & !0xF;
        let height = (words[2] >> 16) & 0x1FF;

        let pixel = Pixel::new(quantize(color.r), quantize(color.g), quantize(color.b), false);

        log::debug!(
            "Fill Rectangle: ({}, {}) size {}×{} color=0x{:04X}",
            x,
            y,
            width,
            height,
            pixel.raw()
        );

        self.vram.fill_rect(x as i32, y as i32, width, height, pixel);

        self.stats.dispatches += 1;
        self.stats.pixels += DispatchStats {
            written: width as u64 * height as u64,
            suppressed: 0,
        };
    }
}
