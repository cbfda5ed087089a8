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

//! Bus client interfaces
//!
//! The arbiter talks to three kinds of collaborator:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 DmaArbiter                   │
//! │  route(addr) ─► registers | memory | client  │
//! └──────┬─────────────┬──────────────┬──────────┘
//!        │             │              │
//!  MemoryInterface  DmaClient      DmaClient
//!   (main RAM)     (CPU, GPU)    (disc controller)
//! ```
//!
//! Clients see two paths: register access at bus addresses (CPU-issued
//! reads and writes) and a word-at-a-time data path used by channel
//! transfers.

use crate::core::error::Result;
use std::cell::RefCell;
use std::rc::Rc;

/// A bus client behind the arbiter
///
/// Register methods receive the physical address (already mirrored down to
/// 0x1FFF_FFFF). Devices must implement the 32-bit methods; the byte methods
/// default to operating on one lane of the containing word.
///
/// # Example
///
/// ```
/// use psx_gpu::core::dma::DmaClient;
/// use psx_gpu::core::error::Result;
///
/// struct Latch(u32);
///
/// impl DmaClient for Latch {
///     fn name(&self) -> &'static str {
///         "latch"
///     }
///     fn read_word(&mut self, _address: u32) -> Result<u32> {
///         Ok(self.0)
///     }
///     fn write_word(&mut self, _address: u32, value: u32) -> Result<()> {
///         self.0 = value;
///         Ok(())
///     }
///     fn dma_read_word(&mut self) -> u32 {
///         self.0
///     }
///     fn dma_write_word(&mut self, value: u32) {
///         self.0 = value;
///     }
/// }
///
/// let mut latch = Latch(0x1122_3344);
/// latch.write_byte(0x1F80_1801, 0xAA).unwrap();
/// assert_eq!(latch.read_word(0x1F80_1800).unwrap(), 0x1122_AA44);
/// ```
pub trait DmaClient {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    /// Read a 32-bit register (address is 4-byte aligned)
    fn read_word(&mut self, address: u32) -> Result<u32>;

    /// Write a 32-bit register (address is 4-byte aligned)
    fn write_word(&mut self, address: u32, value: u32) -> Result<()>;

    /// Read one byte lane of the containing register
    fn read_byte(&mut self, address: u32) -> Result<u8> {
        let word = self.read_word(address & !3)?;
        let shift = (address & 3) * 8;
        Ok((word >> shift) as u8)
    }

    /// Write one byte lane, leaving the other lanes of the register as they were
    fn write_byte(&mut self, address: u32, value: u8) -> Result<()> {
        let aligned = address & !3;
        let shift = (address & 3) * 8;
        let word = self.read_word(aligned)?;
        let merged = (word & !(0xFF << shift)) | ((value as u32) << shift);
        self.write_word(aligned, merged)
    }

    /// Produce the next word of a device-to-RAM transfer
    fn dma_read_word(&mut self) -> u32;

    /// Consume the next word of a RAM-to-device transfer
    fn dma_write_word(&mut self, value: u32);
}

/// Main memory as seen by the arbiter
///
/// Addresses are physical RAM offsets; implementations mirror them into
/// their storage, so accesses never fail.
pub trait MemoryInterface {
    fn read_byte(&self, address: u32) -> u8;

    fn write_byte(&mut self, address: u32, value: u8);

    /// Little-endian word read (address is 4-byte aligned)
    fn read_word(&self, address: u32) -> u32 {
        u32::from_le_bytes([
            self.read_byte(address),
            self.read_byte(address.wrapping_add(1)),
            self.read_byte(address.wrapping_add(2)),
            self.read_byte(address.wrapping_add(3)),
        ])
    }

    /// Little-endian word write (address is 4-byte aligned)
    fn write_word(&mut self, address: u32, value: u32) {
        for (i, byte) in value.to_le_bytes().into_iter().enumerate() {
            self.write_byte(address.wrapping_add(i as u32), byte);
        }
    }
}

/// Shared handle to a client, kept by both the arbiter and the host
pub type SharedClient = Rc<RefCell<dyn DmaClient>>;

/// Shared handle to main memory
pub type SharedMemory = Rc<RefCell<dyn MemoryInterface>>;
