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

//! CPU-side scratchpad
//!
//! 1 KiB of fast data RAM at 0x1F800000 plus the cache control register at
//! 0x1FFE0130. Neither is reachable by a DMA channel.

use crate::core::dma::DmaClient;
use crate::core::error::Result;

/// Scratchpad size in bytes
pub const SCRATCHPAD_SIZE: usize = 1024;

/// Scratchpad physical base address
pub const SCRATCHPAD_BASE: u32 = 0x1F80_0000;

/// Cache control register physical address
pub const CACHE_CONTROL: u32 = 0x1FFE_0130;

pub struct Scratchpad {
    data: [u8; SCRATCHPAD_SIZE],
    cache_control: u32,
}

impl Scratchpad {
    pub fn new() -> Self {
        Self {
            data: [0u8; SCRATCHPAD_SIZE],
            cache_control: 0,
        }
    }

    pub fn cache_control(&self) -> u32 {
        self.cache_control
    }

    #[inline(always)]
    fn offset(address: u32) -> usize {
        (address.wrapping_sub(SCRATCHPAD_BASE) as usize) & (SCRATCHPAD_SIZE - 1)
    }
}

impl Default for Scratchpad {
    fn default() -> Self {
        Self::new()
    }
}

impl DmaClient for Scratchpad {
    fn name(&self) -> &'static str {
        "scratchpad"
    }

    fn read_word(&mut self, address: u32) -> Result<u32> {
        if address == CACHE_CONTROL {
            return Ok(self.cache_control);
        }
        let offset = Self::offset(address);
        Ok(u32::from_le_bytes([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ]))
    }

    fn write_word(&mut self, address: u32, value: u32) -> Result<()> {
        if address == CACHE_CONTROL {
            log::trace!("Cache control = 0x{:08X}", value);
            self.cache_control = value;
            return Ok(());
        }
        let offset = Self::offset(address);
        self.data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn read_byte(&mut self, address: u32) -> Result<u8> {
        if address & !3 == CACHE_CONTROL {
            return Ok((self.cache_control >> ((address & 3) * 8)) as u8);
        }
        Ok(self.data[Self::offset(address)])
    }

    fn write_byte(&mut self, address: u32, value: u8) -> Result<()> {
        if address & !3 == CACHE_CONTROL {
            let shift = (address & 3) * 8;
            self.cache_control =
                (self.cache_control & !(0xFF << shift)) | ((value as u32) << shift);
            return Ok(());
        }
        self.data[Self::offset(address)] = value;
        Ok(())
    }

    fn dma_read_word(&mut self) -> u32 {
        log::warn!("Scratchpad has no DMA data path");
        0
    }

    fn dma_write_word(&mut self, value: u32) {
        log::warn!("Scratchpad has no DMA data path (dropped 0x{:08X})", value);
    }
}
