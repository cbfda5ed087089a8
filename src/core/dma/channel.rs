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

//! DMA channel registers and transfer requests

use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Channel control register (CHCR)
    ///
    /// ```text
    /// bit 0:     direction (0=to RAM, 1=from RAM)
    /// bit 1:     memory address step (0=+4, 1=-4)
    /// bit 8:     chopping enable
    /// bits 9-10: sync mode (0=immediate, 1=block, 2=linked list)
    /// bit 24:    start/busy
    /// bit 28:    manual trigger
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ChannelControl: u32 {
        const FROM_RAM = 1 << 0;
        const STEP_BACKWARD = 1 << 1;
        const CHOPPING = 1 << 8;
        const SYNC_MODE = 0b11 << 9;
        const START_BUSY = 1 << 24;
        const TRIGGER = 1 << 28;

        const _ = !0;
    }
}

impl ChannelControl {
    /// Bits the CPU can write
    pub const WRITABLE: u32 = 0x7177_0703;

    pub fn sync_mode(self) -> SyncMode {
        SyncMode::from_bits((self.bits() >> 9) & 3)
    }

    pub fn direction(self) -> Direction {
        if self.contains(ChannelControl::FROM_RAM) {
            Direction::FromRam
        } else {
            Direction::ToRam
        }
    }
}

/// Transfer synchronization mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Whole transfer at once, started by the manual trigger
    Immediate,
    /// Fixed-size blocks
    Block,
    /// Chain of headers in main memory
    LinkedList,
    Reserved,
}

impl SyncMode {
    pub fn from_bits(bits: u32) -> Self {
        match bits & 3 {
            0 => SyncMode::Immediate,
            1 => SyncMode::Block,
            2 => SyncMode::LinkedList,
            _ => SyncMode::Reserved,
        }
    }
}

/// Transfer direction relative to main memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ToRam,
    FromRam,
}

/// Why a transfer was abandoned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChannelFault {
    /// Linked list did not reach its end marker within the hop limit
    ChainTooLong { hops: u32 },
    /// Linked-list mode requested towards RAM
    InvalidDirection,
    /// Sync mode 3
    ReservedSyncMode,
    /// No device behind this channel
    Unconnected,
}

/// Channel progress as seen by the CPU collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ChannelStatus {
    #[default]
    Idle,
    /// Request created, no block moved yet
    Pending,
    /// At least one block moved, more to go
    Running,
    Completed,
    /// Start bit cleared by the CPU before the end
    Aborted,
    Error(ChannelFault),
}

/// A started transfer
///
/// Snapshotted from the channel registers when the CPU sets the start bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    pub mode: SyncMode,
    pub direction: Direction,
    /// Address of the next word (or next header in linked-list mode)
    pub address: u32,
    /// +4 or -4
    pub step: i32,
    /// Words per block (unused in linked-list mode)
    pub block_size: u32,
    /// Blocks still to move (unused in linked-list mode)
    pub blocks_remaining: u32,
    /// Headers followed so far
    pub hops: u32,
    pub words_moved: u64,
}

impl TransferRequest {
    pub fn new(control: ChannelControl, base_address: u32, block_control: u32) -> Self {
        let mode = control.sync_mode();
        let low = block_control & 0xFFFF;
        let high = block_control >> 16;
        let words = if low == 0 { 0x1_0000 } else { low };

        let (block_size, blocks_remaining) = match mode {
            SyncMode::Block => (words, if high == 0 { 0x1_0000 } else { high }),
            _ => (words, 1),
        };

        Self {
            mode,
            direction: control.direction(),
            address: base_address & 0x00FF_FFFF,
            step: if control.contains(ChannelControl::STEP_BACKWARD) {
                -4
            } else {
                4
            },
            block_size,
            blocks_remaining,
            hops: 0,
            words_moved: 0,
        }
    }
}

/// One DMA channel
#[derive(Debug, Clone)]
pub struct DMAChannel {
    /// MADR
    pub(super) base_address: u32,
    /// BCR
    pub(super) block_control: u32,
    /// CHCR
    pub(super) channel_control: ChannelControl,
    pub(super) request: Option<TransferRequest>,
    pub(super) status: ChannelStatus,
    /// Transfers finished since reset
    pub(super) completions: u64,
    pub(super) channel_id: u8,
}

impl DMAChannel {
    pub(super) fn new(channel_id: u8) -> Self {
        Self {
            base_address: 0,
            block_control: 0,
            channel_control: ChannelControl::empty(),
            request: None,
            status: ChannelStatus::Idle,
            completions: 0,
            channel_id,
        }
    }

    /// Whether a transfer is in flight
    pub fn is_active(&self) -> bool {
        self.request.is_some()
    }

    pub fn status(&self) -> ChannelStatus {
        self.status
    }

    pub fn completions(&self) -> u64 {
        self.completions
    }

    pub fn control(&self) -> ChannelControl {
        self.channel_control
    }

    /// Write CHCR, creating or aborting a request as the start bit dictates
    pub(super) fn write_control(&mut self, value: u32) {
        let mut control = ChannelControl::from_bits_retain(value & ChannelControl::WRITABLE);
        if self.channel_id == 6 {
            // OTC always runs backwards towards RAM
            control = ChannelControl::from_bits_retain(
                value & (ChannelControl::START_BUSY | ChannelControl::TRIGGER).bits(),
            ) | ChannelControl::STEP_BACKWARD;
        }
        self.channel_control = control;

        let start = control.contains(ChannelControl::START_BUSY);
        let trigger = control.contains(ChannelControl::TRIGGER);

        match (start, self.request.is_some()) {
            (true, false) => {
                if control.sync_mode() == SyncMode::Immediate && !trigger {
                    log::trace!("DMA{} armed, waiting for trigger", self.channel_id);
                    return;
                }
                let request =
                    TransferRequest::new(control, self.base_address, self.block_control);
                log::debug!(
                    "DMA{} start: {:?} {:?} addr=0x{:06X} block={} count={}",
                    self.channel_id,
                    request.mode,
                    request.direction,
                    request.address,
                    request.block_size,
                    request.blocks_remaining
                );
                self.request = Some(request);
                self.status = ChannelStatus::Pending;
                self.channel_control.remove(ChannelControl::TRIGGER);
            }
            (false, true) => {
                log::debug!("DMA{} aborted by CPU", self.channel_id);
                self.request = None;
                self.status = ChannelStatus::Aborted;
            }
            _ => {}
        }
    }

    /// Clear start/busy and trigger, dropping any request
    pub(super) fn deactivate(&mut self) {
        self.channel_control
            .remove(ChannelControl::START_BUSY | ChannelControl::TRIGGER);
        self.request = None;
    }
}
