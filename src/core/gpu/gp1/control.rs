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

//! GP1 control commands
//!
//! Implements GPU control operations including reset, interrupt, DMA
//! direction and the info query.

use super::super::registers::DmaDirection;
use super::super::GPU;

impl GPU {
    /// GP1(0x00): Reset GPU
    ///
    /// Resets drawing and control state and the decoder. VRAM contents are
    /// preserved.
    pub(in crate::core::gpu) fn gp1_reset_gpu(&mut self) {
        self.reset_state_preserving_vram();
        log::debug!("GPU reset");
    }

    /// GP1(0x01): Reset Command Buffer
    ///
    /// Discards any partially received GP0 command, including a CPU-to-VRAM
    /// load in progress. Nothing staged so far reaches VRAM.
    pub(in crate::core::gpu) fn gp1_reset_command_buffer(&mut self) {
        self.discard_partial_command();
        log::debug!("Command buffer reset");
    }

    /// GP1(0x02): Acknowledge GPU Interrupt
    pub(in crate::core::gpu) fn gp1_acknowledge_interrupt(&mut self) {
        self.interrupt_request = false;
        log::debug!("GPU interrupt acknowledged");
    }

    /// GP1(0x04): DMA Direction
    ///
    /// Bits 0-1: 0=Off, 1=FIFO, 2=CPU→GP0, 3=GPUREAD→CPU
    pub(in crate::core::gpu) fn gp1_dma_direction(&mut self, value: u32) {
        self.dma_direction = DmaDirection::from_bits(value);

        match self.dma_direction {
            DmaDirection::Off => log::debug!("DMA off"),
            DmaDirection::Fifo => log::debug!("DMA FIFO"),
            DmaDirection::CpuToGp0 => log::debug!("DMA CPU→GP0"),
            DmaDirection::GpuReadToCpu => log::debug!("DMA GPUREAD→CPU"),
        }
    }

    /// GP1(0x10): GPU Info
    ///
    /// Latches the requested value into GPUREAD:
    ///
    /// ```text
    /// 0x02  texture window (20 bits, as written by GP0(E2h))
    /// 0x03  draw area top-left (x bits 0-9, y bits 10-18)
    /// 0x04  draw area bottom-right
    /// 0x05  draw offset (x bits 0-10, y bits 11-21)
    /// 0x07  GPU version (2)
    /// ```
    ///
    /// Other indices leave GPUREAD unchanged.
    pub(in crate::core::gpu) fn gp1_get_gpu_info(&mut self, value: u32) {
        let info_type = value & 0x0F;
        let area = self.draw_area;

        let info = match info_type {
            0x02 => Some(self.texture_window.to_u32()),
            0x03 => Some((area.left as u32 & 0x3FF) | ((area.top as u32 & 0x1FF) << 10)),
            0x04 => Some((area.right as u32 & 0x3FF) | ((area.bottom as u32 & 0x1FF) << 10)),
            0x05 => {
                let (x, y) = self.draw_offset;
                Some((x as u32 & 0x7FF) | ((y as u32 & 0x7FF) << 11))
            }
            0x07 => Some(2),
            _ => None,
        };

        match info {
            Some(info) => {
                log::debug!("GPU info {}: 0x{:08X}", info_type, info);
                self.gpuread_latch = info;
            }
            None => log::debug!("GPU info {}: no response", info_type),
        }
    }
}
