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

//! DMA arbiter
//!
//! Sits between the CPU's bus accesses and the devices it can reach. Every
//! access is first classified by physical address:
//!
//! | Physical range          | Target                         |
//! |-------------------------|--------------------------------|
//! | 0x00000000-0x007FFFFF   | Main RAM (2 MiB, mirrored)     |
//! | 0x1F800000-0x1F8003FF   | CPU client (scratchpad)        |
//! | 0x1FFE0130-0x1FFE0133   | CPU client (cache control)     |
//! | 0x1F801080-0x1F8010FF   | DMA registers                  |
//! | 0x1F801800-0x1F801803   | Disc controller client         |
//! | 0x1F801810-0x1F801817   | GPU client                     |
//!
//! # DMA Channels
//!
//! | Channel | Device      | Base Address |
//! |---------|-------------|--------------|
//! | 0       | MDEC In     | 0x1F801080   |
//! | 1       | MDEC Out    | 0x1F801090   |
//! | 2       | GPU         | 0x1F8010A0   |
//! | 3       | CD-ROM      | 0x1F8010B0   |
//! | 4       | SPU         | 0x1F8010C0   |
//! | 5       | PIO         | 0x1F8010D0   |
//! | 6       | OTC         | 0x1F8010E0   |
//!
//! Each channel has MADR (+0x00), BCR (+0x04) and CHCR (+0x08). DPCR lives at
//! 0x1F8010F0 and DICR at 0x1F8010F4.
//!
//! Transfers run one block at a time. Between blocks the arbiter picks the
//! lowest-numbered enabled channel with a request, so a higher priority
//! transfer started mid-way through another one overtakes it at the next
//! block boundary.
//!
//! # References
//!
//! - [PSX-SPX: DMA Controller](http://problemkaputt.de/psx-spx.htm#dmacontroller)

pub mod channel;
pub mod client;
pub mod memory;

#[cfg(test)]
mod tests;

pub use channel::{
    ChannelControl, ChannelFault, ChannelStatus, DMAChannel, Direction, SyncMode,
    TransferRequest,
};
pub use client::{DmaClient, MemoryInterface, SharedClient, SharedMemory};
pub use memory::{MainMemory, RAM_SIZE};

use crate::core::config::DmaConfig;
use crate::core::error::{DmaError, Result};
use std::cell::RefCell;
use std::rc::Rc;

/// First DMA register address
pub const DMA_BASE: u32 = 0x1F80_1080;

/// Number of DMA channels
pub const CHANNEL_COUNT: usize = 7;

/// Physical address mask (folds KUSEG/KSEG0/KSEG1 together)
const PHYSICAL_MASK: u32 = 0x1FFF_FFFF;

/// Word-aligned RAM address used by transfers
const RAM_ADDRESS_MASK: u32 = 0x001F_FFFC;

/// Linked-list end marker (bit 23 of the next-node address)
const END_OF_CHAIN: u32 = 0x0080_0000;

/// DICR bits the CPU can write directly
const DICR_WRITABLE: u32 = 0x00FF_807F;
/// DICR bit 15: force IRQ (also set on chain errors)
const DICR_FORCE: u32 = 1 << 15;
/// DICR bit 23: master enable
const DICR_MASTER_ENABLE: u32 = 1 << 23;
/// DICR bits 24-30: per-channel flags (write 1 to clear)
const DICR_FLAGS: u32 = 0x7F00_0000;
/// DICR bit 31: master flag (read-only)
const DICR_MASTER_FLAG: u32 = 1 << 31;

/// Where a physical address lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusTarget {
    Memory,
    Registers,
    Client(ClientSlot),
}

/// Collaborator slots on the arbiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientSlot {
    Cpu,
    Gpu,
    Cdrom,
    Memory,
}

impl ClientSlot {
    pub fn name(self) -> &'static str {
        match self {
            ClientSlot::Cpu => "CPU",
            ClientSlot::Gpu => "GPU",
            ClientSlot::Cdrom => "CD-ROM",
            ClientSlot::Memory => "memory",
        }
    }
}

/// Classify a physical address
///
/// # Examples
///
/// ```
/// use psx_gpu::core::dma::{classify, BusTarget, ClientSlot};
///
/// assert_eq!(classify(0x0000_1000), Some(BusTarget::Memory));
/// assert_eq!(classify(0x1F80_1814), Some(BusTarget::Client(ClientSlot::Gpu)));
/// assert_eq!(classify(0x1F80_2000), None);
/// ```
pub fn classify(physical: u32) -> Option<BusTarget> {
    match physical {
        0x0000_0000..=0x007F_FFFF => Some(BusTarget::Memory),
        0x1F80_0000..=0x1F80_03FF | 0x1FFE_0130..=0x1FFE_0133 => {
            Some(BusTarget::Client(ClientSlot::Cpu))
        }
        0x1F80_1080..=0x1F80_10FF => Some(BusTarget::Registers),
        0x1F80_1800..=0x1F80_1803 => Some(BusTarget::Client(ClientSlot::Cdrom)),
        0x1F80_1810..=0x1F80_1817 => Some(BusTarget::Client(ClientSlot::Gpu)),
        _ => None,
    }
}

/// Result of moving one block
enum BlockOutcome {
    /// More blocks to go
    Continue,
    Finished,
    Fault(ChannelFault),
}

/// DMA arbiter with 7 channels
///
/// # Examples
///
/// ```
/// use psx_gpu::core::dma::DmaArbiter;
///
/// let dma = DmaArbiter::new();
/// assert_eq!(dma.read_control(), 0x07654321);
/// assert!(dma.validate().is_err()); // nothing bound yet
/// ```
pub struct DmaArbiter {
    /// 7 DMA channels (MDEC In/Out, GPU, CD-ROM, SPU, PIO, OTC)
    channels: [DMAChannel; CHANNEL_COUNT],

    /// DMA Control Register (DPCR) at 0x1F8010F0
    ///
    /// Bit 3 of each nibble enables the matching channel.
    control: u32,

    /// DMA Interrupt Register (DICR) at 0x1F8010F4
    interrupt: u32,

    /// Linked-list nodes a single transfer may follow
    max_chain_hops: u32,

    memory: Option<SharedMemory>,
    cpu: Option<SharedClient>,
    gpu: Option<SharedClient>,
    cdrom: Option<SharedClient>,

    /// Master flag rose since the last `tick`
    irq_edge: bool,
}

impl DmaArbiter {
    /// Channel 0: MDEC input
    pub const CH_MDEC_IN: usize = 0;
    /// Channel 1: MDEC output
    pub const CH_MDEC_OUT: usize = 1;
    /// Channel 2: GPU (command lists and image data)
    pub const CH_GPU: usize = 2;
    /// Channel 3: CD-ROM
    pub const CH_CDROM: usize = 3;
    /// Channel 4: SPU
    pub const CH_SPU: usize = 4;
    /// Channel 5: PIO (expansion port)
    pub const CH_PIO: usize = 5;
    /// Channel 6: OTC (ordering table clear)
    pub const CH_OTC: usize = 6;

    /// Create an arbiter with no clients bound
    pub fn new() -> Self {
        Self::with_config(&DmaConfig::default())
    }

    pub fn with_config(config: &DmaConfig) -> Self {
        Self {
            channels: std::array::from_fn(|i| DMAChannel::new(i as u8)),
            control: 0x0765_4321,
            interrupt: 0,
            max_chain_hops: config.max_chain_hops,
            memory: None,
            cpu: None,
            gpu: None,
            cdrom: None,
            irq_edge: false,
        }
    }

    // Client binding

    pub fn set_memory_interface(&mut self, memory: SharedMemory) -> Result<()> {
        bind(&mut self.memory, memory, ClientSlot::Memory)
    }

    pub fn set_cpu(&mut self, client: SharedClient) -> Result<()> {
        bind(&mut self.cpu, client, ClientSlot::Cpu)
    }

    pub fn set_gpu(&mut self, client: SharedClient) -> Result<()> {
        bind(&mut self.gpu, client, ClientSlot::Gpu)
    }

    pub fn set_cdrom(&mut self, client: SharedClient) -> Result<()> {
        bind(&mut self.cdrom, client, ClientSlot::Cdrom)
    }

    /// Check every slot is bound
    ///
    /// Must pass before the arbiter is used; an unbound slot is a setup bug.
    pub fn validate(&self) -> Result<()> {
        self.memory_handle()?;
        for slot in [ClientSlot::Cpu, ClientSlot::Gpu, ClientSlot::Cdrom] {
            self.client_handle(slot)?;
        }
        Ok(())
    }

    fn memory_handle(&self) -> Result<SharedMemory> {
        self.memory.clone().ok_or_else(|| {
            DmaError::ClientNotBound {
                client: ClientSlot::Memory.name(),
            }
            .into()
        })
    }

    fn client_handle(&self, slot: ClientSlot) -> Result<SharedClient> {
        let client = match slot {
            ClientSlot::Cpu => &self.cpu,
            ClientSlot::Gpu => &self.gpu,
            ClientSlot::Cdrom => &self.cdrom,
            ClientSlot::Memory => {
                return Err(DmaError::ClientNotBound {
                    client: slot.name(),
                }
                .into())
            }
        };
        client.clone().ok_or_else(|| {
            DmaError::ClientNotBound {
                client: slot.name(),
            }
            .into()
        })
    }

    fn route(&self, address: u32) -> Result<(u32, BusTarget)> {
        let physical = address & PHYSICAL_MASK;
        classify(physical)
            .map(|target| (physical, target))
            .ok_or_else(|| DmaError::AddressError { address }.into())
    }

    // Bus access

    /// Read a 32-bit word at a bus address
    pub fn read_word(&mut self, address: u32) -> Result<u32> {
        if address & 3 != 0 {
            return Err(DmaError::UnalignedAccess { address, size: 4 }.into());
        }
        let (physical, target) = self.route(address)?;
        match target {
            BusTarget::Memory => Ok(self.memory_handle()?.borrow().read_word(physical)),
            BusTarget::Registers => Ok(self.read_register(physical)),
            BusTarget::Client(slot) => {
                let client = self.client_handle(slot)?;
                let value = client.borrow_mut().read_word(physical)?;
                Ok(value)
            }
        }
    }

    /// Write a 32-bit word at a bus address
    ///
    /// Register writes may start or abort transfers; nothing moves until
    /// [`tick`](Self::tick) or [`service_block`](Self::service_block) runs.
    pub fn write_word(&mut self, address: u32, value: u32) -> Result<()> {
        if address & 3 != 0 {
            return Err(DmaError::UnalignedAccess { address, size: 4 }.into());
        }
        let (physical, target) = self.route(address)?;
        match target {
            BusTarget::Memory => {
                self.memory_handle()?
                    .borrow_mut()
                    .write_word(physical, value);
                Ok(())
            }
            BusTarget::Registers => {
                self.write_register(physical, value);
                Ok(())
            }
            BusTarget::Client(slot) => {
                let client = self.client_handle(slot)?;
                let result = client.borrow_mut().write_word(physical, value);
                result
            }
        }
    }

    /// Read one byte at a bus address
    pub fn read_byte(&mut self, address: u32) -> Result<u8> {
        let (physical, target) = self.route(address)?;
        match target {
            BusTarget::Memory => Ok(self.memory_handle()?.borrow().read_byte(physical)),
            BusTarget::Registers => {
                let shift = (physical & 3) * 8;
                Ok((self.read_register(physical & !3) >> shift) as u8)
            }
            BusTarget::Client(slot) => {
                let client = self.client_handle(slot)?;
                let value = client.borrow_mut().read_byte(physical)?;
                Ok(value)
            }
        }
    }

    /// Write one byte at a bus address
    ///
    /// Register writes only touch the addressed byte lane.
    pub fn write_byte(&mut self, address: u32, value: u8) -> Result<()> {
        let (physical, target) = self.route(address)?;
        match target {
            BusTarget::Memory => {
                self.memory_handle()?
                    .borrow_mut()
                    .write_byte(physical, value);
                Ok(())
            }
            BusTarget::Registers => {
                self.write_register_byte(physical, value);
                Ok(())
            }
            BusTarget::Client(slot) => {
                let client = self.client_handle(slot)?;
                let result = client.borrow_mut().write_byte(physical, value);
                result
            }
        }
    }

    // Register file

    fn read_register(&self, physical: u32) -> u32 {
        let offset = physical - DMA_BASE;
        let index = (offset >> 4) as usize;
        match (index, offset & 0xC) {
            (7, 0x0) => self.read_control(),
            (7, 0x4) => self.read_interrupt(),
            (7, _) => 0,
            (ch, 0x0) => self.channels[ch].base_address,
            (ch, 0x4) => self.channels[ch].block_control,
            (ch, 0x8) => self.channels[ch].channel_control.bits(),
            _ => 0,
        }
    }

    fn write_register(&mut self, physical: u32, value: u32) {
        let offset = physical - DMA_BASE;
        let index = (offset >> 4) as usize;
        match (index, offset & 0xC) {
            (7, 0x0) => self.write_control(value),
            (7, 0x4) => self.write_interrupt(value),
            (ch, 0x0) if ch < CHANNEL_COUNT => self.write_madr(ch, value),
            (ch, 0x4) if ch < CHANNEL_COUNT => self.write_bcr(ch, value),
            (ch, 0x8) if ch < CHANNEL_COUNT => self.write_chcr(ch, value),
            _ => log::warn!(
                "Write to unused DMA register 0x{:08X} = 0x{:08X}",
                physical,
                value
            ),
        }
    }

    fn write_register_byte(&mut self, physical: u32, value: u8) {
        let aligned = physical & !3;
        let shift = (physical & 3) * 8;
        let lane = 0xFFu32 << shift;
        let mut merged = (self.read_register(aligned) & !lane) | ((value as u32) << shift);

        if aligned == DMA_BASE + 0x74 {
            // Flags outside the written lane must not be cleared by the
            // read-back value
            merged &= !(DICR_FLAGS & !lane);
        }
        self.write_register(aligned, merged);
    }

    fn write_madr(&mut self, channel: usize, value: u32) {
        self.channels[channel].base_address = value & 0x00FF_FFFF;
        log::trace!("DMA{} MADR = 0x{:08X}", channel, value);
    }

    fn write_bcr(&mut self, channel: usize, value: u32) {
        self.channels[channel].block_control = value;
        log::trace!("DMA{} BCR = 0x{:08X}", channel, value);
    }

    fn write_chcr(&mut self, channel: usize, value: u32) {
        log::trace!("DMA{} CHCR = 0x{:08X}", channel, value);
        self.channels[channel].write_control(value);
    }

    /// Read DMA Control Register (DPCR)
    pub fn read_control(&self) -> u32 {
        self.control
    }

    /// Write DMA Control Register (DPCR)
    pub fn write_control(&mut self, value: u32) {
        self.control = value;
        log::trace!("DPCR = 0x{:08X}", value);
    }

    /// Read DMA Interrupt Register (DICR)
    pub fn read_interrupt(&self) -> u32 {
        self.interrupt
    }

    /// Write DMA Interrupt Register (DICR)
    ///
    /// Flags (bits 24-30) are write-1-to-clear; bit 31 is computed.
    pub fn write_interrupt(&mut self, value: u32) {
        let flags = self.interrupt & DICR_FLAGS & !(value & DICR_FLAGS);
        self.interrupt = (value & DICR_WRITABLE) | flags;
        self.update_master_flag();
        log::trace!("DICR = 0x{:08X}", self.interrupt);
    }

    fn update_master_flag(&mut self) {
        let enables = (self.interrupt >> 16) & 0x7F;
        let flags = (self.interrupt >> 24) & 0x7F;
        let master = self.interrupt & DICR_FORCE != 0
            || (self.interrupt & DICR_MASTER_ENABLE != 0 && enables & flags != 0);
        let was_set = self.interrupt & DICR_MASTER_FLAG != 0;

        if master {
            self.interrupt |= DICR_MASTER_FLAG;
            if !was_set {
                log::trace!("DMA interrupt line raised (DICR = 0x{:08X})", self.interrupt);
                self.irq_edge = true;
            }
        } else {
            self.interrupt &= !DICR_MASTER_FLAG;
        }
    }

    /// Set the channel's flag if its interrupt is enabled
    fn raise_flag(&mut self, channel: usize) {
        if self.interrupt & (1 << (16 + channel)) != 0 {
            self.interrupt |= 1 << (24 + channel);
            self.update_master_flag();
        }
    }

    // Channel state

    pub fn channel(&self, channel: usize) -> Result<&DMAChannel> {
        self.channels
            .get(channel)
            .ok_or_else(|| DmaError::InvalidChannel { channel }.into())
    }

    pub fn channel_status(&self, channel: usize) -> Result<ChannelStatus> {
        Ok(self.channel(channel)?.status())
    }

    pub fn completions(&self, channel: usize) -> Result<u64> {
        Ok(self.channel(channel)?.completions())
    }

    /// Whether DPCR enables the channel
    pub fn channel_enabled(&self, channel: usize) -> bool {
        channel < CHANNEL_COUNT && (self.control >> (channel * 4)) & 0x8 != 0
    }

    /// Master interrupt flag (DICR bit 31)
    pub fn irq_pending(&self) -> bool {
        self.interrupt & DICR_MASTER_FLAG != 0
    }

    fn next_runnable(&self) -> Option<usize> {
        (0..CHANNEL_COUNT).find(|&ch| self.channels[ch].is_active() && self.channel_enabled(ch))
    }

    // Transfers

    /// Run every runnable block until all channels are idle
    ///
    /// # Returns
    ///
    /// `true` if the interrupt line rose since the previous call
    pub fn tick(&mut self) -> Result<bool> {
        while self.service_block()? {}
        Ok(std::mem::take(&mut self.irq_edge))
    }

    /// Move one block of the highest priority runnable channel
    ///
    /// # Returns
    ///
    /// `false` if no channel was runnable
    pub fn service_block(&mut self) -> Result<bool> {
        let Some(channel) = self.next_runnable() else {
            return Ok(false);
        };
        self.run_block(channel)?;
        Ok(true)
    }

    fn run_block(&mut self, channel: usize) -> Result<()> {
        let client = match channel {
            Self::CH_GPU => Some(self.client_handle(ClientSlot::Gpu)?),
            Self::CH_CDROM => Some(self.client_handle(ClientSlot::Cdrom)?),
            Self::CH_OTC => None,
            _ => {
                log::warn!("DMA{} has no device attached", channel);
                self.fail(channel, ChannelFault::Unconnected);
                return Ok(());
            }
        };
        let memory = self.memory_handle()?;

        let Some(mut request) = self.channels[channel].request.take() else {
            return Ok(());
        };

        let outcome = match client {
            None => transfer_otc(&mut request, &mut *memory.borrow_mut()),
            Some(client) => {
                let mut memory = memory.borrow_mut();
                let mut client = client.borrow_mut();
                match request.mode {
                    SyncMode::LinkedList => transfer_linked_list(
                        &mut request,
                        &*memory,
                        &mut *client,
                        self.max_chain_hops,
                    ),
                    SyncMode::Immediate | SyncMode::Block => {
                        transfer_block(&mut request, &mut *memory, &mut *client)
                    }
                    SyncMode::Reserved => BlockOutcome::Fault(ChannelFault::ReservedSyncMode),
                }
            }
        };

        self.finish_block(channel, request, outcome);
        Ok(())
    }

    fn finish_block(&mut self, channel: usize, request: TransferRequest, outcome: BlockOutcome) {
        let state = &mut self.channels[channel];
        if request.mode != SyncMode::Immediate {
            state.base_address = request.address & 0x00FF_FFFF;
        }
        if request.mode == SyncMode::Block {
            state.block_control =
                (request.blocks_remaining << 16) | (state.block_control & 0xFFFF);
        }

        match outcome {
            BlockOutcome::Continue => {
                state.request = Some(request);
                state.status = ChannelStatus::Running;
                if self.interrupt & (1 << channel) != 0 {
                    self.raise_flag(channel);
                }
            }
            BlockOutcome::Finished => {
                state.deactivate();
                state.status = ChannelStatus::Completed;
                state.completions += 1;
                log::debug!(
                    "DMA{} transfer complete ({} words)",
                    channel,
                    request.words_moved
                );
                self.raise_flag(channel);
            }
            BlockOutcome::Fault(fault) => self.fail(channel, fault),
        }
    }

    fn fail(&mut self, channel: usize, fault: ChannelFault) {
        let state = &mut self.channels[channel];
        state.deactivate();
        state.status = ChannelStatus::Error(fault);

        if let ChannelFault::ChainTooLong { hops } = fault {
            log::error!("DMA{} linked list not terminated after {} hops", channel, hops);
            self.interrupt |= DICR_FORCE;
            self.update_master_flag();
        } else {
            log::warn!("DMA{} transfer abandoned: {:?}", channel, fault);
        }
    }
}

impl Default for DmaArbiter {
    fn default() -> Self {
        Self::new()
    }
}

fn bind<T: ?Sized>(
    slot: &mut Option<Rc<RefCell<T>>>,
    value: Rc<RefCell<T>>,
    which: ClientSlot,
) -> Result<()> {
    if slot.is_some() {
        return Err(DmaError::ClientAlreadyBound {
            client: which.name(),
        }
        .into());
    }
    log::debug!("DMA: {} client bound", which.name());
    *slot = Some(value);
    Ok(())
}

/// Move `block_size` words between RAM and a device
fn transfer_block(
    request: &mut TransferRequest,
    memory: &mut dyn MemoryInterface,
    client: &mut dyn DmaClient,
) -> BlockOutcome {
    for _ in 0..request.block_size {
        let address = request.address & RAM_ADDRESS_MASK;
        match request.direction {
            Direction::FromRam => client.dma_write_word(memory.read_word(address)),
            Direction::ToRam => memory.write_word(address, client.dma_read_word()),
        }
        request.address = request.address.wrapping_add_signed(request.step) & 0x00FF_FFFF;
    }
    request.words_moved += u64::from(request.block_size);
    request.blocks_remaining = request.blocks_remaining.saturating_sub(1);

    if request.blocks_remaining == 0 {
        BlockOutcome::Finished
    } else {
        BlockOutcome::Continue
    }
}

/// Send one linked-list node to a device
///
/// Header: bits 24-31 word count, bits 0-23 next node address.
fn transfer_linked_list(
    request: &mut TransferRequest,
    memory: &dyn MemoryInterface,
    client: &mut dyn DmaClient,
    max_hops: u32,
) -> BlockOutcome {
    if request.direction == Direction::ToRam {
        return BlockOutcome::Fault(ChannelFault::InvalidDirection);
    }
    if request.hops >= max_hops {
        return BlockOutcome::Fault(ChannelFault::ChainTooLong {
            hops: request.hops,
        });
    }

    let node = request.address & RAM_ADDRESS_MASK;
    let header = memory.read_word(node);
    let count = header >> 24;

    for i in 0..count {
        let word = memory.read_word(node.wrapping_add(4 + i * 4) & RAM_ADDRESS_MASK);
        client.dma_write_word(word);
    }
    request.words_moved += u64::from(count);
    request.hops += 1;

    let next = header & 0x00FF_FFFF;
    request.address = next;
    if next & END_OF_CHAIN != 0 {
        BlockOutcome::Finished
    } else {
        BlockOutcome::Continue
    }
}

/// Build an empty ordering table (reverse linked list ending in 0x00FFFFFF)
fn transfer_otc(request: &mut TransferRequest, memory: &mut dyn MemoryInterface) -> BlockOutcome {
    let count = request.block_size;
    let mut address = request.address & RAM_ADDRESS_MASK;

    for i in 0..count {
        let next = address.wrapping_sub(4) & RAM_ADDRESS_MASK;
        let entry = if i == count - 1 { 0x00FF_FFFF } else { next };
        memory.write_word(address, entry);
        address = next;
    }
    request.words_moved += u64::from(count);
    request.address = address;
    BlockOutcome::Finished
}
