// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! DMA channel integration tests

use super::super::*;
use crate::core::config::Config;

const DPCR: u32 = 0x1F80_10F0;
const DICR: u32 = 0x1F80_10F4;

#[test]
fn test_interrupt_edges_counted() {
    let mut system = System::new(&Config::default()).unwrap();
    // Master enable, channel 2 enable
    system.write_word(DICR, 0x0084_0000).unwrap();

    system.send_via_dma(&[0x0000_0000], 0x1000).unwrap();
    assert_eq!(system.irq_count(), 1);
    assert!(system.irq_pending());

    // Flag still set: no new edge
    system.send_via_dma(&[0x0000_0000], 0x1000).unwrap();
    assert_eq!(system.irq_count(), 1);

    // Acknowledge, then complete again
    system.write_word(DICR, 0x0484_0000).unwrap();
    assert!(!system.irq_pending());
    system.send_via_dma(&[0x0000_0000], 0x1000).unwrap();
    assert_eq!(system.irq_count(), 2);
}

#[test]
fn test_no_interrupt_without_enable() {
    let mut system = System::new(&Config::default()).unwrap();
    system.send_via_dma(&[0x0000_0000], 0x1000).unwrap();

    assert_eq!(system.irq_count(), 0);
    assert_eq!(system.read_word(DICR).unwrap(), 0);
}

#[test]
fn test_cdrom_sector_to_ram() {
    let mut system = System::new(&Config::default()).unwrap();
    let bytes: Vec<u8> = (0..16).collect();
    system.sector_buffer().borrow_mut().push_sector(&bytes);

    let dpcr = system.read_word(DPCR).unwrap();
    system.write_word(DPCR, dpcr | 0x8000).unwrap();
    system.write_word(0x1F80_10B0, 0x1000).unwrap();
    system.write_word(0x1F80_10B4, 0x0001_0004).unwrap();
    system.write_word(0x1F80_10B8, 0x0100_0200).unwrap();

    assert_eq!(
        system.memory().borrow().read_words(0x1000, 4),
        vec![0x0302_0100, 0x0706_0504, 0x0B0A_0908, 0x0F0E_0D0C]
    );
    assert!(system.sector_buffer().borrow().is_empty());
    assert_eq!(system.dma().completions(3).unwrap(), 1);
    assert_eq!(system.read_word(0x1F80_10B0).unwrap(), 0x1010);
}

#[test]
fn test_otc_clear_through_bus() {
    let mut system = System::new(&Config::default()).unwrap();
    let dpcr = system.read_word(DPCR).unwrap();
    system.write_word(DPCR, dpcr | 0x0800_0000).unwrap();

    system.write_word(0x1F80_10E0, 0x0000_100C).unwrap();
    system.write_word(0x1F80_10E4, 4).unwrap();
    system.write_word(0x1F80_10E8, 0x1100_0000).unwrap();

    assert_eq!(
        system.memory().borrow().read_words(0x1000, 4),
        vec![0x00FF_FFFF, 0x0000_1000, 0x0000_1004, 0x0000_1008]
    );
}

#[test]
fn test_disabled_channel_waits() {
    let mut system = System::new(&Config::default()).unwrap();
    system.sector_buffer().borrow_mut().push_sector(&[1, 2, 3, 4]);

    system.write_word(0x1F80_10B0, 0x1000).unwrap();
    system.write_word(0x1F80_10B4, 0x0001_0001).unwrap();
    system.write_word(0x1F80_10B8, 0x0100_0200).unwrap();
    assert_eq!(system.sector_buffer().borrow().len(), 4);

    // Enabling the channel lets the pending transfer run
    let dpcr = system.read_word(DPCR).unwrap();
    system.write_word(DPCR, dpcr | 0x8000).unwrap();
    assert!(system.sector_buffer().borrow().is_empty());
    assert_eq!(system.memory().borrow().read_words(0x1000, 1), vec![0x0403_0201]);
}
