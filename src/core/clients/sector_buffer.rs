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

//! Disc controller data FIFO
//!
//! Holds sector bytes delivered by the drive until the CPU or DMA channel 3
//! drains them.
//!
//! # Register Map
//!
//! ```text
//! 0x1F801800: Index/status (write: select index, read: status)
//! 0x1F801802: Data byte (pops one byte from the FIFO)
//! ```
//!
//! Status bits:
//!
//! ```text
//! Bit 0-1: Index (0-3)
//! Bit 3: Parameter FIFO empty (always 1)
//! Bit 4: Parameter FIFO not full (always 1)
//! Bit 6: Data FIFO not empty
//! ```

use crate::core::dma::DmaClient;
use crate::core::error::Result;
use std::collections::VecDeque;

/// Index/status register
const REG_INDEX: u32 = 0x1F80_1800;

/// Data byte port
const REG_DATA: u32 = 0x1F80_1802;

/// Raw sector size in bytes
pub const SECTOR_SIZE: usize = 2352;

/// Disc controller data FIFO
///
/// # Example
///
/// ```
/// use psx_gpu::core::clients::SectorBuffer;
/// use psx_gpu::core::dma::DmaClient;
///
/// let mut cd = SectorBuffer::new();
/// cd.push_sector(&[0x01, 0x02, 0x03, 0x04, 0x05]);
/// assert_eq!(cd.dma_read_word(), 0x0403_0201);
/// assert_eq!(cd.dma_read_word(), 0x0000_0005);
/// assert_eq!(cd.dma_read_word(), 0);
/// ```
pub struct SectorBuffer {
    data: VecDeque<u8>,
    index: u8,
}

impl SectorBuffer {
    pub fn new() -> Self {
        Self {
            data: VecDeque::with_capacity(SECTOR_SIZE),
            index: 0,
        }
    }

    /// Queue sector bytes for reading
    pub fn push_sector(&mut self, bytes: &[u8]) {
        self.data.extend(bytes.iter().copied());
        log::trace!(
            "Sector buffer: {} bytes queued ({} pending)",
            bytes.len(),
            self.data.len()
        );
    }

    /// Bytes still waiting to be read
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    /// Status register value
    pub fn read_status(&self) -> u8 {
        let mut status = self.index & 0x3;
        status |= 1 << 3;
        status |= 1 << 4;
        if !self.data.is_empty() {
            status |= 1 << 6;
        }
        status
    }

    fn pop_byte(&mut self) -> u8 {
        self.data.pop_front().unwrap_or(0)
    }
}

impl Default for SectorBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DmaClient for SectorBuffer {
    fn name(&self) -> &'static str {
        "sector buffer"
    }

    /// Word reads return the status lane only; the data port is not popped
    fn read_word(&mut self, _address: u32) -> Result<u32> {
        Ok(self.read_status() as u32)
    }

    /// Word writes set the index from the low byte
    fn write_word(&mut self, _address: u32, value: u32) -> Result<()> {
        self.index = (value & 0x3) as u8;
        Ok(())
    }

    fn read_byte(&mut self, address: u32) -> Result<u8> {
        Ok(match address {
            REG_INDEX => self.read_status(),
            REG_DATA => self.pop_byte(),
            _ => 0,
        })
    }

    fn write_byte(&mut self, address: u32, value: u8) -> Result<()> {
        match address {
            REG_INDEX => self.index = value & 0x3,
            _ => log::trace!("Sector buffer: ignored write 0x{:08X} = 0x{:02X}", address, value),
        }
        Ok(())
    }

    fn dma_read_word(&mut self) -> u32 {
        let bytes = [
            self.pop_byte(),
            self.pop_byte(),
            self.pop_byte(),
            self.pop_byte(),
        ];
        u32::from_le_bytes(bytes)
    }

    fn dma_write_word(&mut self, value: u32) {
        log::warn!("Sector buffer is read-only (dropped 0x{:08X})", value);
    }
}
