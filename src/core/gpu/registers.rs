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

//! GPU register type definitions
//!
//! Drawing settings written through GP0(E1h)-(E6h) and the control state set
//! through GP1. GPUSTAT is assembled from these on every read.

use super::types::BlendMode;

/// Drawing mode configuration (GP0(E1h))
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawMode {
    /// Texture page X base (in units of 64 pixels)
    pub texture_page_x: u8,
    /// Texture page Y base (0 or 1, in units of 256 lines)
    pub texture_page_y: u8,
    /// Semi-transparency mode used when a primitive requests blending
    pub blend_mode: BlendMode,
    /// Texture color depth (0=4bit, 1=8bit, 2=15bit)
    pub texture_depth: u8,
    pub dithering: bool,
    pub draw_to_display: bool,
    pub texture_disable: bool,
}

impl DrawMode {
    pub fn from_u32(cmd: u32) -> Self {
        Self {
            texture_page_x: (cmd & 0xF) as u8,
            texture_page_y: ((cmd >> 4) & 1) as u8,
            blend_mode: BlendMode::from_bits(((cmd >> 5) & 3) as u8),
            texture_depth: ((cmd >> 7) & 3) as u8,
            dithering: (cmd >> 9) & 1 != 0,
            draw_to_display: (cmd >> 10) & 1 != 0,
            texture_disable: (cmd >> 11) & 1 != 0,
        }
    }

    /// GPUSTAT bits 0-10 plus bit 15
    pub fn status_bits(&self) -> u32 {
        (self.texture_page_x as u32 & 0xF)
            | ((self.texture_page_y as u32 & 1) << 4)
            | ((self.blend_mode.bits() as u32) << 5)
            | ((self.texture_depth as u32 & 3) << 7)
            | ((self.dithering as u32) << 9)
            | ((self.draw_to_display as u32) << 10)
            | ((self.texture_disable as u32) << 15)
    }
}

/// Drawing area (clipping rectangle), inclusive on all sides
///
/// Coordinates are VRAM-space: `top` is the smaller y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawingArea {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl DrawingArea {
    /// Area covering a whole VRAM of the given size
    pub fn full(width: usize, height: usize) -> Self {
        Self {
            left: 0,
            top: 0,
            right: width as i32 - 1,
            bottom: height as i32 - 1,
        }
    }

    #[inline(always)]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

impl Default for DrawingArea {
    fn default() -> Self {
        Self::full(1024, 512)
    }
}

/// Texture window settings (GP0(E2h))
///
/// Recorded for GP1(10h) readback only; texture sampling is not emulated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextureWindow {
    pub mask_x: u8,
    pub mask_y: u8,
    pub offset_x: u8,
    pub offset_y: u8,
}

impl TextureWindow {
    pub fn from_u32(cmd: u32) -> Self {
        Self {
            mask_x: (cmd & 0x1F) as u8,
            mask_y: ((cmd >> 5) & 0x1F) as u8,
            offset_x: ((cmd >> 10) & 0x1F) as u8,
            offset_y: ((cmd >> 15) & 0x1F) as u8,
        }
    }

    pub fn to_u32(self) -> u32 {
        (self.mask_x as u32)
            | ((self.mask_y as u32) << 5)
            | ((self.offset_x as u32) << 10)
            | ((self.offset_y as u32) << 15)
    }
}

/// GP1(04h) DMA direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DmaDirection {
    #[default]
    Off,
    Fifo,
    CpuToGp0,
    GpuReadToCpu,
}

impl DmaDirection {
    pub fn from_bits(bits: u32) -> Self {
        match bits & 3 {
            0 => DmaDirection::Off,
            1 => DmaDirection::Fifo,
            2 => DmaDirection::CpuToGp0,
            _ => DmaDirection::GpuReadToCpu,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            DmaDirection::Off => 0,
            DmaDirection::Fifo => 1,
            DmaDirection::CpuToGp0 => 2,
            DmaDirection::GpuReadToCpu => 3,
        }
    }
}

/// Display configuration from GP1(03h) and GP1(05h)-(08h)
///
/// Scan-out is handled by the presentation layer; the values are kept so
/// GPUSTAT and debugging output reflect what the CPU programmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayControl {
    pub display_disabled: bool,
    /// GP1(05h) start of display area, raw parameter
    pub display_start: u32,
    /// GP1(06h) horizontal display range, raw parameter
    pub horizontal_range: u32,
    /// GP1(07h) vertical display range, raw parameter
    pub vertical_range: u32,
    /// GP1(08h) display mode, raw parameter
    pub display_mode: u32,
}

impl Default for DisplayControl {
    fn default() -> Self {
        Self {
            display_disabled: true,
            display_start: 0,
            horizontal_range: 0,
            vertical_range: 0,
            display_mode: 0,
        }
    }
}

impl DisplayControl {
    /// GPUSTAT bits 14 and 16-22 mirrored from GP1(08h)
    pub fn status_bits(&self) -> u32 {
        let mode = self.display_mode;
        ((mode & 0x3F) << 17) | (((mode >> 6) & 1) << 16) | (((mode >> 7) & 1) << 14)
    }
}
