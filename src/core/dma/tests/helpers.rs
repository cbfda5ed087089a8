// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Shared fixtures for DMA tests

use super::super::*;
use std::collections::{HashMap, VecDeque};

/// Client that records everything it is sent
#[derive(Default)]
pub(super) struct Recorder {
    /// Words received over the data path
    pub received: Vec<u32>,
    /// Words handed out over the data path
    pub source: VecDeque<u32>,
    pub registers: HashMap<u32, u32>,
    /// Register writes in order
    pub writes: Vec<(u32, u32)>,
}

impl DmaClient for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn read_word(&mut self, address: u32) -> crate::core::error::Result<u32> {
        Ok(self.registers.get(&address).copied().unwrap_or(0))
    }

    fn write_word(&mut self, address: u32, value: u32) -> crate::core::error::Result<()> {
        self.writes.push((address, value));
        self.registers.insert(address, value);
        Ok(())
    }

    fn dma_read_word(&mut self) -> u32 {
        self.source.pop_front().unwrap_or(0)
    }

    fn dma_write_word(&mut self, value: u32) {
        self.received.push(value);
    }
}

pub(super) struct Fixture {
    pub dma: DmaArbiter,
    pub ram: Rc<RefCell<MainMemory>>,
    pub cpu: Rc<RefCell<Recorder>>,
    pub gpu: Rc<RefCell<Recorder>>,
    pub cdrom: Rc<RefCell<Recorder>>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(&DmaConfig::default())
    }

    pub fn with_config(config: &DmaConfig) -> Self {
        let mut dma = DmaArbiter::with_config(config);
        let ram = Rc::new(RefCell::new(MainMemory::new()));
        let cpu = Rc::new(RefCell::new(Recorder::default()));
        let gpu = Rc::new(RefCell::new(Recorder::default()));
        let cdrom = Rc::new(RefCell::new(Recorder::default()));

        dma.set_memory_interface(ram.clone()).unwrap();
        dma.set_cpu(cpu.clone()).unwrap();
        dma.set_gpu(gpu.clone()).unwrap();
        dma.set_cdrom(cdrom.clone()).unwrap();
        dma.validate().unwrap();
        // Every channel enabled, stock priorities
        dma.write_control(DPCR_ALL_ENABLED);

        Self {
            dma,
            ram,
            cpu,
            gpu,
            cdrom,
        }
    }

    /// Program MADR, BCR and CHCR of a channel through the bus
    pub fn start(&mut self, channel: usize, madr: u32, bcr: u32, chcr: u32) {
        let base = DMA_BASE + 0x10 * channel as u32;
        self.dma.write_word(base, madr).unwrap();
        self.dma.write_word(base + 4, bcr).unwrap();
        self.dma.write_word(base + 8, chcr).unwrap();
    }
}

/// Register address of a channel
pub(super) fn reg(channel: usize, offset: u32) -> u32 {
    DMA_BASE + 0x10 * channel as u32 + offset
}

pub(super) const DPCR_ALL_ENABLED: u32 = 0x0FED_CBA9;

pub(super) const DPCR: u32 = 0x1F80_10F0;
pub(super) const DICR: u32 = 0x1F80_10F4;

/// CHCR values used throughout
pub(super) const CHCR_LINKED_FROM_RAM: u32 = 0x0100_0401;
pub(super) const CHCR_BLOCK_FROM_RAM: u32 = 0x0100_0201;
pub(super) const CHCR_BLOCK_TO_RAM: u32 = 0x0100_0200;
pub(super) const CHCR_IMMEDIATE_FROM_RAM: u32 = 0x1100_0001;
pub(super) const CHCR_OTC_START: u32 = 0x1100_0000;

#[test]
fn test_fixture_validates() {
    let fixture = Fixture::new();
    assert!(fixture.dma.validate().is_ok());
    assert!(fixture.gpu.borrow().received.is_empty());
}
