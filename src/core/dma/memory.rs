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

//! Main memory
//!
//! 2 MiB of RAM, mirrored across the first 8 MiB of the physical map.

use super::client::MemoryInterface;

/// Main RAM size in bytes
pub const RAM_SIZE: usize = 2 * 1024 * 1024;

/// Mask applied to RAM addresses (mirroring)
const RAM_MASK: u32 = (RAM_SIZE - 1) as u32;

/// Main RAM
///
/// # Examples
///
/// ```
/// use psx_gpu::core::dma::{MainMemory, MemoryInterface};
///
/// let mut ram = MainMemory::new();
/// ram.write_word(0x1000, 0x1234_5678);
/// assert_eq!(ram.read_byte(0x1000), 0x78);
/// assert_eq!(ram.read_word(0x0020_1000), 0x1234_5678); // mirror
/// ```
pub struct MainMemory {
    data: Vec<u8>,
}

impl MainMemory {
    pub fn new() -> Self {
        Self {
            data: vec![0u8; RAM_SIZE],
        }
    }

    /// Copy words into RAM starting at `address`
    pub fn load_words(&mut self, address: u32, words: &[u32]) {
        for (i, &word) in words.iter().enumerate() {
            self.write_word(address.wrapping_add(i as u32 * 4), word);
        }
    }

    /// Read `count` consecutive words starting at `address`
    pub fn read_words(&self, address: u32, count: usize) -> Vec<u32> {
        (0..count)
            .map(|i| self.read_word(address.wrapping_add(i as u32 * 4)))
            .collect()
    }

    /// Zero all of RAM
    pub fn clear(&mut self) {
        self.data.fill(0);
    }
}

impl Default for MainMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryInterface for MainMemory {
    #[inline(always)]
    fn read_byte(&self, address: u32) -> u8 {
        self.data[(address & RAM_MASK) as usize]
    }

    #[inline(always)]
    fn write_byte(&mut self, address: u32, value: u8) {
        self.data[(address & RAM_MASK) as usize] = value;
    }

    #[inline(always)]
    fn read_word(&self, address: u32) -> u32 {
        let index = (address & RAM_MASK & !3) as usize;
        u32::from_le_bytes([
            self.data[index],
            self.data[index + 1],
            self.data[index + 2],
            self.data[index + 3],
        ])
    }

    #[inline(always)]
    fn write_word(&mut self, address: u32, value: u32) {
        let index = (address & RAM_MASK & !3) as usize;
        self.data[index..index + 4].copy_from_slice(&value.to_le_bytes());
    }
}
