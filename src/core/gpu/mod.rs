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

//! GPU (Graphics Processing Unit) emulation
//!
//! The GPU owns the VRAM store and everything that writes to it. Commands
//! arrive as 32-bit words on two ports:
//!
//! - GP0 (0x1F801810 write): drawing commands, drawing settings and VRAM
//!   transfers, decoded by a parameter-accumulating state machine
//! - GP1 (0x1F801814 write): control commands (reset, DMA direction, info)
//!
//! Reads return GPUREAD (VRAM-to-CPU data or GP1(10h) info) and GPUSTAT.
//!
//! Every command that writes VRAM runs as one dispatch of the pixel pipeline
//! and completes before the next GP0 word is looked at.
//!
//! # References
//!
//! - [PSX-SPX: GPU](http://problemkaputt.de/psx-spx.htm#graphicsprocessingunitgpu)

mod dispatch;
mod gp0;
mod gp1;
mod pipeline;
mod registers;
pub mod render;
mod types;
mod vram;

#[cfg(test)]
mod tests;

pub use dispatch::{Coverage, DispatchStats, Dispatcher};
pub use gp0::{parameter_count, DecoderPhase};
pub use pipeline::{dither, gate_pixel, quantize, shade_pixel, DrawingAreaState};
pub use registers::{DisplayControl, DmaDirection, DrawMode, DrawingArea, TextureWindow};
pub use types::{BlendMode, Color, DitherMatrix, Pixel, Vertex};
pub use vram::{Vram, VRAM_HEIGHT, VRAM_WIDTH};

use crate::core::config::GpuConfig;
use crate::core::dma::DmaClient;
use crate::core::error::{GpuError, Result};
use gp0::Decoder;
use serde::Serialize;
use std::collections::VecDeque;

/// Base physical address of the GPU register window
pub const GPU_BASE: u32 = 0x1F80_1810;

/// Running totals since construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GpuStats {
    /// GP0 words received
    pub words: u64,
    /// Commands executed
    pub commands: u64,
    /// Pipeline dispatches run
    pub dispatches: u64,
    /// Partial commands thrown away by GP1(01h) or GP1(00h)
    pub discarded: u64,
    pub pixels: DispatchStats,
}

/// GPU state
///
/// # Examples
///
/// ```
/// use psx_gpu::core::gpu::GPU;
///
/// let mut gpu = GPU::new();
///
/// // Opaque 1x1 rectangle at (5, 7), color (255, 0, 0)
/// gpu.write_gp0(0x6800_00FF);
/// gpu.write_gp0(0x0007_0005);
///
/// assert_eq!(gpu.read_vram(5, 7).raw(), 0x001F);
/// ```
pub struct GPU {
    pub(in crate::core::gpu) vram: Vram,
    pub(in crate::core::gpu) dispatcher: Dispatcher,

    pub(in crate::core::gpu) draw_mode: DrawMode,
    pub(in crate::core::gpu) draw_area: DrawingArea,
    /// Drawing offset (x, y), added to every vertex
    pub(in crate::core::gpu) draw_offset: (i32, i32),
    pub(in crate::core::gpu) texture_window: TextureWindow,
    pub(in crate::core::gpu) set_mask: bool,
    pub(in crate::core::gpu) check_mask: bool,

    pub(in crate::core::gpu) display: DisplayControl,
    pub(in crate::core::gpu) dma_direction: DmaDirection,
    pub(in crate::core::gpu) interrupt_request: bool,

    pub(in crate::core::gpu) decoder: Decoder,
    /// Packed VRAM-to-CPU words waiting for GPUREAD
    pub(in crate::core::gpu) readback: VecDeque<u32>,
    /// Last GPUREAD value (GP1(10h) results land here too)
    pub(in crate::core::gpu) gpuread_latch: u32,

    pub(in crate::core::gpu) stats: GpuStats,
}

impl GPU {
    /// Create a GPU with a 1024x512 VRAM and serial dispatch
    pub fn new() -> Self {
        Self::with_config(&GpuConfig::default())
    }

    /// Create a GPU sized and dispatched per `config`
    pub fn with_config(config: &GpuConfig) -> Self {
        let vram = Vram::new(config.vram_width, config.vram_height);
        let draw_area = DrawingArea::full(vram.width(), vram.height());

        log::info!(
            "GPU created: VRAM {}x{}, {:?} dispatch ({} workers)",
            vram.width(),
            vram.height(),
            config.dispatch,
            config.workers
        );

        Self {
            vram,
            dispatcher: Dispatcher::new(config.dispatch, config.workers),
            draw_mode: DrawMode::default(),
            draw_area,
            draw_offset: (0, 0),
            texture_window: TextureWindow::default(),
            set_mask: false,
            check_mask: false,
            display: DisplayControl::default(),
            dma_direction: DmaDirection::Off,
            interrupt_request: false,
            decoder: Decoder::new(),
            readback: VecDeque::new(),
            gpuread_latch: 0,
            stats: GpuStats::default(),
        }
    }

    /// Reset all state including VRAM
    pub fn reset(&mut self) {
        self.reset_state_preserving_vram();
        self.vram.clear();
        log::info!("GPU reset (VRAM cleared)");
    }

    /// Reset drawing, control and decoder state, keeping VRAM
    pub(in crate::core::gpu) fn reset_state_preserving_vram(&mut self) {
        self.draw_mode = DrawMode::default();
        self.draw_area = DrawingArea::full(self.vram.width(), self.vram.height());
        self.draw_offset = (0, 0);
        self.texture_window = TextureWindow::default();
        self.set_mask = false;
        self.check_mask = false;
        self.display = DisplayControl::default();
        self.dma_direction = DmaDirection::Off;
        self.interrupt_request = false;
        self.discard_partial_command();
        self.readback.clear();
        self.gpuread_latch = 0;
    }

    /// Drop any half-received command, counting it when there was one
    pub(in crate::core::gpu) fn discard_partial_command(&mut self) {
        if self.decoder.reset() {
            self.stats.discarded += 1;
        }
    }

    /// Read a VRAM pixel (coordinates wrap)
    #[inline(always)]
    pub fn read_vram(&self, x: i32, y: i32) -> Pixel {
        self.vram.read(x, y)
    }

    /// Write a VRAM pixel directly, bypassing the pipeline
    ///
    /// Meant for test setup and state injection by the host.
    #[inline(always)]
    pub fn write_vram(&mut self, x: i32, y: i32, pixel: Pixel) {
        self.vram.write(x, y, pixel);
    }

    pub fn vram(&self) -> &Vram {
        &self.vram
    }

    pub fn stats(&self) -> GpuStats {
        self.stats
    }

    /// Current decoder state
    pub fn decoder_phase(&self) -> DecoderPhase {
        self.decoder.phase()
    }

    /// True when no command is partially received
    ///
    /// Dispatches run to completion inside `write_gp0`, so an idle decoder
    /// means every VRAM write issued so far is visible.
    pub fn is_idle(&self) -> bool {
        self.decoder.phase() == DecoderPhase::Idle
    }

    pub fn interrupt_pending(&self) -> bool {
        self.interrupt_request
    }

    /// Drawing state a primitive would be rendered with right now
    pub fn drawing_state(&self, semi_transparent: bool) -> DrawingAreaState {
        DrawingAreaState {
            area: self.draw_area,
            dither: self.draw_mode.dithering,
            semi_transparent,
            blend_mode: self.draw_mode.blend_mode,
            set_mask: self.set_mask,
            check_mask: self.check_mask,
        }
    }

    /// Get GPU status register value (GPUSTAT)
    ///
    /// # Bit layout
    ///
    /// ```text
    /// 0-10  draw mode (texpage, semi mode, depth, dither, draw to display)
    /// 11    set mask while drawing
    /// 12    check mask before drawing
    /// 14    reverse flag (GP1(08h) bit 7)
    /// 15    texture disable
    /// 16-22 display mode (GP1(08h))
    /// 23    display disabled
    /// 24    interrupt request
    /// 25    DMA request (meaning depends on bits 29-30)
    /// 26    ready to receive command
    /// 27    ready to send VRAM to CPU
    /// 28    ready to receive DMA block
    /// 29-30 DMA direction
    /// ```
    pub fn status(&self) -> u32 {
        let idle = self.is_idle();
        let ready_to_send = !self.readback.is_empty();
        let ready_for_dma = !matches!(self.decoder.phase(), DecoderPhase::ReceivingParameters);

        let dma_request = match self.dma_direction {
            DmaDirection::Off => false,
            DmaDirection::Fifo => true,
            DmaDirection::CpuToGp0 => ready_for_dma,
            DmaDirection::GpuReadToCpu => ready_to_send,
        };

        let mut status = self.draw_mode.status_bits();
        status |= (self.set_mask as u32) << 11;
        status |= (self.check_mask as u32) << 12;
        status |= self.display.status_bits();
        status |= (self.display.display_disabled as u32) << 23;
        status |= (self.interrupt_request as u32) << 24;
        status |= (dma_request as u32) << 25;
        status |= (idle as u32) << 26;
        status |= (ready_to_send as u32) << 27;
        status |= (ready_for_dma as u32) << 28;
        status |= self.dma_direction.bits() << 29;
        status
    }

    /// Read GPUREAD
    ///
    /// Pops the next packed VRAM-to-CPU word when a readback is pending,
    /// otherwise returns the latched value (last word read or GP1(10h) info).
    pub fn read_gpuread(&mut self) -> u32 {
        if let Some(word) = self.readback.pop_front() {
            self.gpuread_latch = word;
            if self.readback.is_empty() {
                log::debug!("VRAM→CPU transfer drained");
            }
        }
        self.gpuread_latch
    }

    /// Write a GP1 control command
    pub fn write_gp1(&mut self, value: u32) {
        let command = (value >> 24) & 0xFF;
        log::trace!("GP1 <- 0x{:08X}", value);

        match command {
            0x00 => self.gp1_reset_gpu(),
            0x01 => self.gp1_reset_command_buffer(),
            0x02 => self.gp1_acknowledge_interrupt(),
            0x03 => self.gp1_display_enable(value),
            0x04 => self.gp1_dma_direction(value),
            0x05 => self.gp1_display_area_start(value),
            0x06 => self.gp1_horizontal_display_range(value),
            0x07 => self.gp1_vertical_display_range(value),
            0x08 => self.gp1_display_mode(value),
            0x10..=0x1F => self.gp1_get_gpu_info(value),
            _ => {
                log::warn!("Unknown GP1 command: 0x{:02X}", command);
            }
        }
    }
}

impl Default for GPU {
    fn default() -> Self {
        Self::new()
    }
}

impl DmaClient for GPU {
    fn name(&self) -> &'static str {
        "GPU"
    }

    fn read_word(&mut self, address: u32) -> Result<u32> {
        match address & 0xF {
            0x0 => Ok(self.read_gpuread()),
            0x4 => Ok(self.status()),
            offset => Err(GpuError::InvalidRegister { offset }.into()),
        }
    }

    fn write_word(&mut self, address: u32, value: u32) -> Result<()> {
        match address & 0xF {
            0x0 => self.write_gp0(value),
            0x4 => self.write_gp1(value),
            offset => return Err(GpuError::InvalidRegister { offset }.into()),
        }
        Ok(())
    }

    /// Lane 0 of GPUREAD advances the readback; lanes 1-3 read the latch
    fn read_byte(&mut self, address: u32) -> Result<u8> {
        let shift = (address & 3) * 8;
        let word = match address & 0xC {
            0x0 if address & 3 == 0 => self.read_gpuread(),
            0x0 => self.gpuread_latch,
            0x4 => self.status(),
            offset => return Err(GpuError::InvalidRegister { offset }.into()),
        };
        Ok((word >> shift) as u8)
    }

    /// GP0 and GP1 are command ports; a partial word cannot be merged
    fn write_byte(&mut self, address: u32, _value: u8) -> Result<()> {
        Err(GpuError::UnsupportedAccess {
            offset: address & 0xF,
            size: 1,
        }
        .into())
    }

    fn dma_read_word(&mut self) -> u32 {
        self.read_gpuread()
    }

    fn dma_write_word(&mut self, value: u32) {
        self.write_gp0(value);
    }
}
