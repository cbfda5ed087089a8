// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Channel priority and preemption tests

use super::super::*;
use super::helpers::*;

#[test]
fn test_lower_index_runs_first() {
    let mut fixture = Fixture::new();
    fixture.cdrom.borrow_mut().source.extend(0..8);

    fixture.start(3, 0x8000, 0x0002_0002, CHCR_BLOCK_TO_RAM);
    fixture.start(2, 0x4000, 0x0002_0002, CHCR_BLOCK_FROM_RAM);

    fixture.dma.service_block().unwrap();
    assert_eq!(fixture.dma.channel_status(2).unwrap(), ChannelStatus::Running);
    assert_eq!(fixture.dma.channel_status(3).unwrap(), ChannelStatus::Pending);

    fixture.dma.service_block().unwrap();
    assert_eq!(fixture.dma.channel_status(2).unwrap(), ChannelStatus::Completed);
    assert_eq!(fixture.dma.channel_status(3).unwrap(), ChannelStatus::Pending);

    fixture.dma.service_block().unwrap();
    assert_eq!(fixture.dma.channel_status(3).unwrap(), ChannelStatus::Running);
}

#[test]
fn test_higher_priority_overtakes_between_blocks() {
    let mut fixture = Fixture::new();
    fixture.cdrom.borrow_mut().source.extend(0..6);
    fixture.ram.borrow_mut().load_words(0x4000, &[0xAAAA]);

    fixture.start(3, 0x8000, 0x0003_0002, CHCR_BLOCK_TO_RAM);
    fixture.dma.service_block().unwrap();
    assert_eq!(fixture.cdrom.borrow().source.len(), 4);

    // GPU transfer arrives mid-way through the disc transfer
    fixture.start(2, 0x4000, 1, CHCR_IMMEDIATE_FROM_RAM);
    fixture.dma.service_block().unwrap();

    assert_eq!(fixture.gpu.borrow().received, vec![0xAAAA]);
    assert_eq!(fixture.dma.channel_status(2).unwrap(), ChannelStatus::Completed);
    assert_eq!(fixture.dma.channel_status(3).unwrap(), ChannelStatus::Running);
    assert_eq!(fixture.cdrom.borrow().source.len(), 4);

    fixture.dma.tick().unwrap();
    assert_eq!(fixture.dma.channel_status(3).unwrap(), ChannelStatus::Completed);
    assert_eq!(
        fixture.ram.borrow().read_words(0x8000, 6),
        vec![0, 1, 2, 3, 4, 5]
    );
}

#[test]
fn test_abort_between_blocks() {
    let mut fixture = Fixture::new();
    fixture.cdrom.borrow_mut().source.extend(1..=6);

    fixture.start(3, 0x8000, 0x0003_0002, CHCR_BLOCK_TO_RAM);
    fixture.dma.service_block().unwrap();

    // Clear the start bit
    fixture.dma.write_word(reg(3, 8), 0x0000_0200).unwrap();
    assert_eq!(fixture.dma.channel_status(3).unwrap(), ChannelStatus::Aborted);
    assert!(!fixture.dma.tick().unwrap());

    assert_eq!(
        fixture.ram.borrow().read_words(0x8000, 4),
        vec![1, 2, 0, 0]
    );
    assert_eq!(fixture.cdrom.borrow().source.len(), 4);
    assert_eq!(fixture.dma.completions(3).unwrap(), 0);
}

#[test]
fn test_abort_linked_list_keeps_sent_words() {
    let mut fixture = Fixture::new();
    fixture
        .ram
        .borrow_mut()
        .load_words(0x1000, &[0x0100_1100, 0x11]);
    fixture
        .ram
        .borrow_mut()
        .load_words(0x1100, &[0x01FF_FFFF, 0x22]);

    fixture.start(2, 0x1000, 0, CHCR_LINKED_FROM_RAM);
    fixture.dma.service_block().unwrap();
    fixture.dma.write_word(reg(2, 8), 0x0000_0401).unwrap();
    fixture.dma.tick().unwrap();

    assert_eq!(fixture.gpu.borrow().received, vec![0x11]);
    assert_eq!(fixture.dma.channel_status(2).unwrap(), ChannelStatus::Aborted);
}

#[test]
fn test_tick_runs_everything() {
    let mut fixture = Fixture::new();
    fixture.cdrom.borrow_mut().source.extend(0..4);

    fixture.start(6, 0x2000, 2, CHCR_OTC_START);
    fixture.start(3, 0x8000, 0x0001_0004, CHCR_BLOCK_TO_RAM);
    fixture.start(2, 0x4000, 2, CHCR_IMMEDIATE_FROM_RAM);

    fixture.dma.tick().unwrap();
    for ch in [2, 3, 6] {
        assert_eq!(
            fixture.dma.channel_status(ch).unwrap(),
            ChannelStatus::Completed,
            "channel {}",
            ch
        );
    }
    assert!(!fixture.dma.service_block().unwrap());
}
