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

//! GP1 display configuration commands
//!
//! Scan-out is outside this crate. These commands only record what the CPU
//! programmed so it shows up in GPUSTAT.

use super::super::GPU;

impl GPU {
    /// GP1(0x03): Display Enable (bit 0: 0=on, 1=off)
    pub(in crate::core::gpu) fn gp1_display_enable(&mut self, value: u32) {
        self.display.display_disabled = value & 1 != 0;
        log::debug!(
            "Display {}",
            if self.display.display_disabled {
                "disabled"
            } else {
                "enabled"
            }
        );
    }

    /// GP1(0x05): Start of Display Area
    pub(in crate::core::gpu) fn gp1_display_area_start(&mut self, value: u32) {
        self.display.display_start = value & 0x7FFFF;
        log::debug!(
            "Display area start: ({}, {})",
            value & 0x3FF,
            (value >> 10) & 0x1FF
        );
    }

    /// GP1(0x06): Horizontal Display Range
    pub(in crate::core::gpu) fn gp1_horizontal_display_range(&mut self, value: u32) {
        self.display.horizontal_range = value & 0xFF_FFFF;
        log::debug!(
            "Horizontal display range: {} to {}",
            value & 0xFFF,
            (value >> 12) & 0xFFF
        );
    }

    /// GP1(0x07): Vertical Display Range
    pub(in crate::core::gpu) fn gp1_vertical_display_range(&mut self, value: u32) {
        self.display.vertical_range = value & 0xF_FFFF;
        log::debug!(
            "Vertical display range: {} to {}",
            value & 0x3FF,
            (value >> 10) & 0x3FF
        );
    }

    /// GP1(0x08): Display Mode
    ///
    /// ```text
    /// Bit 0-1: horizontal resolution 1
    /// Bit 2:   vertical resolution
    /// Bit 3:   video mode (0=NTSC, 1=PAL)
    /// Bit 4:   color depth (0=15bit, 1=24bit)
    /// Bit 5:   vertical interlace
    /// Bit 6:   horizontal resolution 2
    /// Bit 7:   reverse flag
    /// ```
    pub(in crate::core::gpu) fn gp1_display_mode(&mut self, value: u32) {
        self.display.display_mode = value & 0xFF;
        log::debug!("Display mode: 0x{:02X}", value & 0xFF);
    }
}
