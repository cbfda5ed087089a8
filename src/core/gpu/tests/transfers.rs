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

//! Fill and transfer command tests

use super::super::*;
use super::submit;

#[test]
fn test_fill_aligns_to_16_pixels() {
    let mut gpu = GPU::new();
    // x = 20 rounds down to 16, width 1 rounds up to 16
    submit(&mut gpu, &[0x0200_00FF, 0x0000_0014, 0x0001_0001]);

    assert_eq!(gpu.read_vram(15, 0), Pixel::BLACK);
    for x in 16..32 {
        assert_eq!(gpu.read_vram(x, 0).raw(), 0x001F);
    }
    assert_eq!(gpu.read_vram(32, 0), Pixel::BLACK);
    assert_eq!(gpu.stats().pixels.written, 16);
}

#[test]
fn test_fill_ignores_drawing_state() {
    let mut gpu = GPU::new();
    gpu.write_vram(16, 0, Pixel::new(1, 1, 1, true));
    submit(
        &mut gpu,
        &[
            0xE300_0000,
            0xE400_0000,
            0xE600_0003,
            0xE100_0200,
            0x0280_8080,
            0x0000_0010,
            0x0001_0010,
        ],
    );

    // Clip, mask check, set-mask and dither are all bypassed
    for x in 16..32 {
        assert_eq!(gpu.read_vram(x, 0), Pixel::new(16, 16, 16, false));
    }
}

#[test]
fn test_fill_ignores_drawing_offset() {
    let mut gpu = GPU::new();
    gpu.write_gp0(0xE500_0000 | 100 | (100 << 11));
    submit(&mut gpu, &[0x0200_00FF, 0x0000_0000, 0x0001_0010]);

    assert_eq!(gpu.read_vram(0, 0).r(), 31);
    assert_eq!(gpu.read_vram(100, 100), Pixel::BLACK);
}

#[test]
fn test_fill_zero_height() {
    let mut gpu = GPU::new();
    submit(&mut gpu, &[0x0200_00FF, 0x0000_0000, 0x0000_0010]);
    assert_eq!(gpu.stats().pixels.written, 0);
    assert_eq!(gpu.read_vram(0, 0), Pixel::BLACK);
}

#[test]
fn test_cpu_to_vram() {
    let mut gpu = GPU::new();
    submit(
        &mut gpu,
        &[
            0xA000_0000,
            0x0014_000A,
            0x0002_0003,
            0x0002_0001,
            0x0004_0003,
            0x0006_0005,
        ],
    );

    assert!(gpu.is_idle());
    assert_eq!(gpu.read_vram(10, 20).raw(), 1);
    assert_eq!(gpu.read_vram(11, 20).raw(), 2);
    assert_eq!(gpu.read_vram(12, 20).raw(), 3);
    assert_eq!(gpu.read_vram(10, 21).raw(), 4);
    assert_eq!(gpu.read_vram(12, 21).raw(), 6);
    assert_eq!(gpu.read_vram(13, 20), Pixel::BLACK);
}

#[test]
fn test_cpu_to_vram_odd_pixel_count() {
    let mut gpu = GPU::new();
    submit(
        &mut gpu,
        &[0xA000_0000, 0x0000_0000, 0x0001_0003, 0x2222_1111, 0x4444_3333],
    );

    // The high half of the last word is padding
    assert!(gpu.is_idle());
    assert_eq!(gpu.read_vram(2, 0).raw(), 0x3333);
    assert_eq!(gpu.read_vram(3, 0), Pixel::BLACK);
}

#[test]
fn test_cpu_to_vram_keeps_source_mask() {
    let mut gpu = GPU::new();
    submit(&mut gpu, &[0xA000_0000, 0x0000_0000, 0x0001_0002, 0x0001_8001]);

    assert!(gpu.read_vram(0, 0).mask());
    assert!(!gpu.read_vram(1, 0).mask());
}

#[test]
fn test_cpu_to_vram_zero_size_means_maximum() {
    let mut gpu = GPU::new();
    submit(&mut gpu, &[0xA000_0000, 0x0000_0000, 0x0001_0000]);

    // Width 0 decodes as 1024: 512 data words
    for _ in 0..511 {
        gpu.write_gp0(0x7FFF_7FFF);
    }
    assert_eq!(gpu.decoder_phase(), DecoderPhase::TransferringPixelData);
    gpu.write_gp0(0x7FFF_7FFF);
    assert!(gpu.is_idle());
    assert_eq!(gpu.read_vram(1023, 0).raw(), 0x7FFF);
}

#[test]
fn test_cpu_to_vram_wraps_at_edge() {
    let mut gpu = GPU::new();
    submit(&mut gpu, &[0xA000_0000, 0x0000_03FF, 0x0001_0002, 0x0002_0001]);

    assert_eq!(gpu.read_vram(1023, 0).raw(), 1);
    assert_eq!(gpu.read_vram(0, 0).raw(), 2);
}

#[test]
fn test_cpu_to_vram_respects_mask_and_clip() {
    let mut gpu = GPU::new();
    let protected = Pixel::new(5, 5, 5, true);
    gpu.write_vram(0, 0, protected);

    submit(
        &mut gpu,
        &[
            0xE400_0000 | 1,
            0xE600_0002,
            0xA000_0000,
            0x0000_0000,
            0x0001_0004,
            0x0002_0001,
            0x0004_0003,
        ],
    );

    assert_eq!(gpu.read_vram(0, 0), protected);
    assert_eq!(gpu.read_vram(1, 0).raw(), 2);
    // Outside the drawing area
    assert_eq!(gpu.read_vram(2, 0), Pixel::BLACK);
    assert_eq!(gpu.stats().pixels.suppressed, 3);
}

#[test]
fn test_vram_to_cpu_readback() {
    let mut gpu = GPU::new();
    for (i, x) in (10..13).enumerate() {
        gpu.write_vram(x, 20, Pixel::from_raw(i as u16 + 1));
        gpu.write_vram(x, 21, Pixel::from_raw(i as u16 + 4));
    }

    submit(&mut gpu, &[0xC000_0000, 0x0014_000A, 0x0002_0003]);
    assert_ne!(gpu.status() & (1 << 27), 0);

    assert_eq!(gpu.read_gpuread(), 0x0002_0001);
    assert_eq!(gpu.read_gpuread(), 0x0004_0003);
    assert_eq!(gpu.read_gpuread(), 0x0006_0005);
    assert_eq!(gpu.status() & (1 << 27), 0);

    // Latch repeats the last word
    assert_eq!(gpu.read_gpuread(), 0x0006_0005);
}

#[test]
fn test_vram_to_cpu_odd_count_pads_high_half() {
    let mut gpu = GPU::new();
    gpu.write_vram(0, 0, Pixel::from_raw(0x1111));
    submit(&mut gpu, &[0xC000_0000, 0x0000_0000, 0x0001_0001]);

    assert_eq!(gpu.read_gpuread(), 0x0000_1111);
    assert_eq!(gpu.status() & (1 << 27), 0);
}

#[test]
fn test_vram_to_cpu_dma_request() {
    let mut gpu = GPU::new();
    gpu.write_gp1(0x0400_0003);
    assert_eq!(gpu.status() & (1 << 25), 0);

    submit(&mut gpu, &[0xC000_0000, 0x0000_0000, 0x0001_0002]);
    assert_ne!(gpu.status() & (1 << 25), 0);

    gpu.read_gpuread();
    assert_eq!(gpu.status() & (1 << 25), 0);
}

#[test]
fn test_vram_to_vram_copy() {
    let mut gpu = GPU::new();
    gpu.write_vram(0, 0, Pixel::from_raw(0x001F));
    gpu.write_vram(1, 0, Pixel::from_raw(0x03E0));

    submit(&mut gpu, &[0x8000_0000, 0x0000_0000, 0x0064_0064, 0x0001_0002]);

    assert_eq!(gpu.read_vram(100, 100).raw(), 0x001F);
    assert_eq!(gpu.read_vram(101, 100).raw(), 0x03E0);
    // Source untouched
    assert_eq!(gpu.read_vram(0, 0).raw(), 0x001F);
}

#[test]
fn test_vram_to_vram_set_mask() {
    let mut gpu = GPU::new();
    let source = |x: i32, y: i32| Pixel::new((x * 7) as u8, (y * 9) as u8, (x + y) as u8, false);
    for y in 0..3 {
        for x in 0..4 {
            gpu.write_vram(x, y, source(x, y));
        }
    }

    submit(
        &mut gpu,
        &[0xE600_0001, 0x8000_0000, 0x0000_0000, 0x0064_0064, 0x0003_0004],
    );

    for y in 0..3 {
        for x in 0..4 {
            let copied = gpu.read_vram(100 + x, 100 + y);
            assert!(copied.mask(), "({}, {})", x, y);
            assert_eq!(copied.raw() & 0x7FFF, source(x, y).raw(), "({}, {})", x, y);
        }
    }
    assert!(!gpu.read_vram(104, 100).mask());
    assert!(!gpu.read_vram(100, 103).mask());
}

#[test]
fn test_vram_to_vram_overlap() {
    let mut gpu = GPU::new();
    for x in 0..4 {
        gpu.write_vram(x, 0, Pixel::from_raw(x as u16 + 1));
    }

    submit(&mut gpu, &[0x8000_0000, 0x0000_0000, 0x0000_0001, 0x0001_0004]);

    let row: Vec<u16> = (0..5).map(|x| gpu.read_vram(x, 0).raw()).collect();
    assert_eq!(row, vec![1, 1, 2, 3, 4]);
}
