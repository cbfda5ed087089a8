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

//! GP1 control command tests

use super::super::*;
use super::submit;

#[test]
fn test_reset_preserves_vram() {
    let mut gpu = GPU::new();
    gpu.write_vram(8, 8, Pixel::from_raw(0x1234));
    submit(&mut gpu, &[0xE100_0200, 0xE600_0003, 0x1F00_0000]);

    gpu.write_gp1(0x0000_0000);

    assert_eq!(gpu.read_vram(8, 8).raw(), 0x1234);
    assert_eq!(gpu.status(), 0x1480_0000);
    assert!(!gpu.interrupt_pending());
}

#[test]
fn test_reset_command_buffer_discards_partial_command() {
    let mut gpu = GPU::new();

    submit(&mut gpu, &[0x2000_00FF, 0x0000_0000]);
    gpu.write_gp1(0x0100_0000);

    assert!(gpu.is_idle());
    assert_eq!(gpu.stats().discarded, 1);

    // Remaining vertices of the abandoned triangle start new commands
    gpu.write_gp0(0x6800_00FF);
    gpu.write_gp0(0x0000_0000);
    assert_eq!(gpu.read_vram(0, 0).r(), 31);
}

#[test]
fn test_reset_command_buffer_drops_upload() {
    let mut gpu = GPU::new();

    submit(&mut gpu, &[0xA000_0000, 0x0000_0000, 0x0002_0002, 0x7FFF_7FFF]);
    gpu.write_gp1(0x0100_0000);

    assert!(gpu.is_idle());
    assert_eq!(gpu.read_vram(0, 0), Pixel::BLACK);
    assert_eq!(gpu.read_vram(1, 0), Pixel::BLACK);
}

#[test]
fn test_reset_command_buffer_when_idle() {
    let mut gpu = GPU::new();
    gpu.write_gp1(0x0100_0000);
    assert_eq!(gpu.stats().discarded, 0);
}

#[test]
fn test_display_enable() {
    let mut gpu = GPU::new();
    assert_ne!(gpu.status() & (1 << 23), 0);

    gpu.write_gp1(0x0300_0000);
    assert_eq!(gpu.status() & (1 << 23), 0);

    gpu.write_gp1(0x0300_0001);
    assert_ne!(gpu.status() & (1 << 23), 0);
}

#[test]
fn test_dma_direction() {
    let mut gpu = GPU::new();

    gpu.write_gp1(0x0400_0002);
    let status = gpu.status();
    assert_eq!((status >> 29) & 3, 2);
    // CPU to GP0: request follows "ready for DMA block"
    assert_ne!(status & (1 << 25), 0);

    gpu.write_gp1(0x0400_0003);
    assert_eq!((gpu.status() >> 29) & 3, 3);
    // Nothing to read back yet
    assert_eq!(gpu.status() & (1 << 25), 0);

    gpu.write_gp1(0x0400_0000);
    assert_eq!(gpu.status() & (3 << 29), 0);
}

#[test]
fn test_display_mode_bits() {
    let mut gpu = GPU::new();

    // Horizontal 2, PAL, reverse
    gpu.write_gp1(0x0800_00C8);
    let status = gpu.status();
    assert_ne!(status & (1 << 16), 0);
    assert_ne!(status & (1 << 20), 0);
    assert_ne!(status & (1 << 14), 0);
}

#[test]
fn test_gpu_info_queries() {
    let mut gpu = GPU::new();
    submit(
        &mut gpu,
        &[
            0xE200_0000 | 0x2_1CE3,
            0xE300_0000 | 10 | (20 << 10),
            0xE400_0000 | 30 | (40 << 10),
            0xE500_0000 | 0x7FF | (2 << 11),
        ],
    );

    gpu.write_gp1(0x1000_0002);
    assert_eq!(gpu.read_gpuread(), 0x2_1CE3);

    gpu.write_gp1(0x1000_0003);
    assert_eq!(gpu.read_gpuread(), 10 | (20 << 10));

    gpu.write_gp1(0x1000_0004);
    assert_eq!(gpu.read_gpuread(), 30 | (40 << 10));

    gpu.write_gp1(0x1000_0005);
    assert_eq!(gpu.read_gpuread(), 0x7FF | (2 << 11));

    gpu.write_gp1(0x1000_0007);
    assert_eq!(gpu.read_gpuread(), 2);

    // Unsupported indices keep the previous value
    gpu.write_gp1(0x1000_0000);
    assert_eq!(gpu.read_gpuread(), 2);
    gpu.write_gp1(0x1000_0008);
    assert_eq!(gpu.read_gpuread(), 2);
}

#[test]
fn test_unknown_gp1_command_is_ignored() {
    let mut gpu = GPU::new();
    let before = gpu.status();
    gpu.write_gp1(0x2000_0000);
    assert_eq!(gpu.status(), before);
}
