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

//! System integration module
//!
//! Assembles the GPU, main memory, the reference clients and the DMA arbiter
//! into one bus, and runs pending DMA work after every CPU-side write.

#[cfg(test)]
mod tests;

use super::clients::{Scratchpad, SectorBuffer};
use super::config::Config;
use super::dma::{DmaArbiter, MainMemory, CHANNEL_COUNT, RAM_SIZE};
use super::error::{DmaError, Result};
use super::gpu::{GpuStats, GPU, GPU_BASE};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Words per linked-list node built by [`System::send_via_dma`]
pub const MAX_NODE_WORDS: usize = 255;

/// GPU DMA channel register addresses
const GPU_MADR: u32 = 0x1F80_10A0;
const GPU_BCR: u32 = 0x1F80_10A4;
const GPU_CHCR: u32 = 0x1F80_10A8;
const DPCR: u32 = 0x1F80_10F0;

/// CHCR: linked list, from RAM, start
const CHCR_LINKED_LIST_START: u32 = 0x0100_0401;

/// GP1(04h) CPU-to-GP0 DMA direction
const GP1_DMA_TO_GP0: u32 = 0x0400_0002;

/// Summary of a run, printed by the command line tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub gpu: GpuStats,
    /// GPUSTAT at the end of the run
    pub gpustat: u32,
    pub vram_checksum: u64,
    /// Completed transfers per DMA channel
    pub dma_completions: Vec<u64>,
    pub irq_count: u64,
}

/// PlayStation GPU and DMA System
///
/// # Components
/// - GPU: VRAM and the pixel pipeline (GPU client slot)
/// - Main memory: 2 MiB RAM
/// - Scratchpad: CPU client slot
/// - Sector buffer: disc-controller client slot
/// - DMA arbiter: routes every bus access
///
/// # Example
/// ```
/// use psx_gpu::core::config::Config;
/// use psx_gpu::core::system::System;
///
/// let mut system = System::new(&Config::default()).unwrap();
/// system.send_via_dma(&[0x0200_00FF, 0x0000_0000, 0x0001_0001], 0x1000).unwrap();
/// assert_eq!(system.gpu().borrow().read_vram(0, 0).r(), 31);
/// ```
pub struct System {
    /// GPU (shared via Rc<RefCell> with the arbiter)
    gpu: Rc<RefCell<GPU>>,
    memory: Rc<RefCell<MainMemory>>,
    scratchpad: Rc<RefCell<Scratchpad>>,
    sector_buffer: Rc<RefCell<SectorBuffer>>,
    dma: DmaArbiter,
    /// DMA interrupt line rising edges seen so far
    irq_count: u64,
}

impl System {
    /// Create a System from a validated configuration
    ///
    /// Fails when the configuration is invalid or any arbiter slot is left
    /// unbound.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let gpu = Rc::new(RefCell::new(GPU::with_config(&config.gpu)));
        let memory = Rc::new(RefCell::new(MainMemory::new()));
        let scratchpad = Rc::new(RefCell::new(Scratchpad::new()));
        let sector_buffer = Rc::new(RefCell::new(SectorBuffer::new()));

        let mut dma = DmaArbiter::with_config(&config.dma);
        dma.set_memory_interface(memory.clone())?;
        dma.set_cpu(scratchpad.clone())?;
        dma.set_gpu(gpu.clone())?;
        dma.set_cdrom(sector_buffer.clone())?;
        dma.validate()?;

        log::info!("System ready");

        Ok(Self {
            gpu,
            memory,
            scratchpad,
            sector_buffer,
            dma,
            irq_count: 0,
        })
    }

    pub fn gpu(&self) -> Rc<RefCell<GPU>> {
        self.gpu.clone()
    }

    pub fn memory(&self) -> Rc<RefCell<MainMemory>> {
        self.memory.clone()
    }

    pub fn scratchpad(&self) -> Rc<RefCell<Scratchpad>> {
        self.scratchpad.clone()
    }

    pub fn sector_buffer(&self) -> Rc<RefCell<SectorBuffer>> {
        self.sector_buffer.clone()
    }

    pub fn dma(&self) -> &DmaArbiter {
        &self.dma
    }

    /// DMA interrupt edges observed since construction
    pub fn irq_count(&self) -> u64 {
        self.irq_count
    }

    /// Whether either interrupt source is asserted
    pub fn irq_pending(&self) -> bool {
        self.dma.irq_pending() || self.gpu.borrow().interrupt_pending()
    }

    pub fn read_word(&mut self, address: u32) -> Result<u32> {
        self.dma.read_word(address)
    }

    pub fn read_byte(&mut self, address: u32) -> Result<u8> {
        self.dma.read_byte(address)
    }

    /// Write a word, then run any DMA work the write started
    pub fn write_word(&mut self, address: u32, value: u32) -> Result<()> {
        self.dma.write_word(address, value)?;
        self.run_dma()
    }

    /// Write a byte, then run any DMA work the write started
    pub fn write_byte(&mut self, address: u32, value: u8) -> Result<()> {
        self.dma.write_byte(address, value)?;
        self.run_dma()
    }

    fn run_dma(&mut self) -> Result<()> {
        if self.dma.tick()? {
            self.irq_count += 1;
            log::debug!("DMA interrupt #{}", self.irq_count);
        }
        Ok(())
    }

    /// Write words to GP0 one at a time through the bus
    pub fn submit_gp0(&mut self, words: &[u32]) -> Result<()> {
        for &word in words {
            self.write_word(GPU_BASE, word)?;
        }
        Ok(())
    }

    /// Send words to GP0 over DMA channel 2 in linked-list mode
    ///
    /// The words are laid out in RAM at `address` as a chain of nodes of up
    /// to [`MAX_NODE_WORDS`] words each, then the channel is started the way
    /// a game would: enable it in DPCR, select CPU-to-GP0 DMA with GP1(04h),
    /// program MADR/BCR and set CHCR.
    pub fn send_via_dma(&mut self, words: &[u32], address: u32) -> Result<()> {
        let nodes = words.len().div_ceil(MAX_NODE_WORDS).max(1);
        let base = address & 0x001F_FFFC;
        let end = base as usize + 4 * (words.len() + nodes);
        if end > RAM_SIZE {
            return Err(DmaError::AddressError {
                address: end as u32,
            }
            .into());
        }

        {
            let mut memory = self.memory.borrow_mut();
            let mut node = base;
            let mut chunks = words.chunks(MAX_NODE_WORDS).peekable();
            if chunks.peek().is_none() {
                memory.load_words(node, &[0x00FF_FFFF]);
            }
            while let Some(chunk) = chunks.next() {
                let next_node = node + 4 * (chunk.len() as u32 + 1);
                let next = if chunks.peek().is_some() {
                    next_node
                } else {
                    0x00FF_FFFF
                };
                memory.load_words(node, &[((chunk.len() as u32) << 24) | next]);
                memory.load_words(node + 4, chunk);
                node = next_node;
            }
        }
        log::debug!(
            "GPU DMA: {} words in {} nodes at 0x{:06X}",
            words.len(),
            nodes,
            base
        );

        let dpcr = self.read_word(DPCR)?;
        self.write_word(DPCR, dpcr | 0x0000_0800)?;
        self.write_word(GPU_BASE + 4, GP1_DMA_TO_GP0)?;
        self.write_word(GPU_MADR, base)?;
        self.write_word(GPU_BCR, 0)?;
        self.write_word(GPU_CHCR, CHCR_LINKED_LIST_START)
    }

    /// Snapshot the counters and VRAM checksum
    pub fn report(&self) -> RunReport {
        let gpu = self.gpu.borrow();
        RunReport {
            gpu: gpu.stats(),
            gpustat: gpu.status(),
            vram_checksum: gpu.vram().checksum(),
            dma_completions: (0..CHANNEL_COUNT)
                .map(|ch| self.dma.completions(ch).unwrap_or(0))
                .collect(),
            irq_count: self.irq_count,
        }
    }
}
