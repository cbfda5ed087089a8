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


//! Custom assertions for GPU and DMA testing

use psx_gpu::core::dma::ChannelStatus;
use psx_gpu::core::gpu::GPU;
use psx_gpu::core::system::System;

/// Assert VRAM pixel has expected raw value
#[allow(dead_code)]
pub fn assert_vram_pixel(gpu: &GPU, x: i32, y: i32, expected: u16) {
    let actual = gpu.read_vram(x, y).raw();
    assert_eq!(
        actual, expected,
        "VRAM at ({}, {}) mismatch: expected 0x{:04X}, got 0x{:04X}",
        x, y, expected, actual
    );
}

/// Assert every pixel of a rectangle has the expected raw value
#[allow(dead_code)]
pub fn assert_vram_rect(gpu: &GPU, x: i32, y: i32, width: i32, height: i32, expected: u16) {
    for dy in 0..height {
        for dx in 0..width {
            assert_vram_pixel(gpu, x + dx, y + dy, expected);
        }
    }
}

/// Assert main memory contains expected words starting at address
#[allow(dead_code)]
pub fn assert_memory_words(system: &System, address: u32, expected: &[u32]) {
    let actual = system.memory().borrow().read_words(address, expected.len());
    assert_eq!(
        actual, expected,
        "Memory at 0x{:08X} mismatch",
        address
    );
}

/// Assert a DMA channel ended in the given state
#[allow(dead_code)]
pub fn assert_channel_status(system: &System, channel: usize, expected: ChannelStatus) {
    let actual = system
        .dma()
        .channel_status(channel)
        .expect("channel index in range");
    assert_eq!(
        actual, expected,
        "DMA{} status mismatch: expected {:?}, got {:?}",
        channel, expected, actual
    );
}
