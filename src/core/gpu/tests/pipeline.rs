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

//! Pixel pipeline tests
//!
//! Exercise `shade_pixel` and `gate_pixel` directly, without VRAM.

use super::super::*;

fn blended(mode: BlendMode) -> DrawingAreaState {
    DrawingAreaState {
        semi_transparent: true,
        blend_mode: mode,
        ..DrawingAreaState::default()
    }
}

fn channels(pixel: Pixel) -> (u8, u8, u8) {
    (pixel.r(), pixel.g(), pixel.b())
}

#[test]
fn test_blend_reference_values() {
    let background = Pixel::new(16, 16, 16, false);
    // 64 >> 3 = 8
    let foreground = Color::new(64, 64, 64);

    let cases = [
        (BlendMode::Average, 12),
        (BlendMode::Additive, 24),
        (BlendMode::Subtractive, 8),
        (BlendMode::AddQuarter, 18),
    ];
    for (mode, expected) in cases {
        let out = shade_pixel(foreground, 0, 0, &blended(mode), background).unwrap();
        assert_eq!(channels(out), (expected, expected, expected), "{:?}", mode);
    }
}

#[test]
fn test_blend_clamps() {
    let bright = Pixel::new(31, 31, 31, false);
    let out = shade_pixel(
        Color::new(255, 255, 255),
        0,
        0,
        &blended(BlendMode::Additive),
        bright,
    )
    .unwrap();
    assert_eq!(channels(out), (31, 31, 31));

    let dark = Pixel::new(2, 2, 2, false);
    let out = shade_pixel(
        Color::new(255, 255, 255),
        0,
        0,
        &blended(BlendMode::Subtractive),
        dark,
    )
    .unwrap();
    assert_eq!(channels(out), (0, 0, 0));
}

#[test]
fn test_opaque_ignores_background() {
    let state = DrawingAreaState::default();
    let out = shade_pixel(
        Color::new(80, 160, 248),
        5,
        5,
        &state,
        Pixel::new(31, 0, 31, false),
    )
    .unwrap();
    assert_eq!(channels(out), (10, 20, 31));
    assert!(!out.mask());
}

#[test]
fn test_quantize() {
    assert_eq!(quantize(0), 0);
    assert_eq!(quantize(7), 0);
    assert_eq!(quantize(8), 1);
    assert_eq!(quantize(255), 31);
}

#[test]
fn test_dither_offsets_by_position() {
    let state = DrawingAreaState {
        dither: true,
        ..DrawingAreaState::default()
    };
    let color = Color::new(128, 128, 128);

    // (0, 0): -4 -> 124 -> 15
    let out = shade_pixel(color, 0, 0, &state, Pixel::BLACK).unwrap();
    assert_eq!(out.r(), 15);
    // (0, 1): +2 -> 130 -> 16
    let out = shade_pixel(color, 0, 1, &state, Pixel::BLACK).unwrap();
    assert_eq!(out.r(), 16);
    // Period of 4 in both directions
    let out = shade_pixel(color, 4, 8, &state, Pixel::BLACK).unwrap();
    assert_eq!(out.r(), 15);
}

#[test]
fn test_dither_clamps_to_byte_range() {
    assert_eq!(dither(Color::new(0, 1, 2), 0, 0), Color::new(0, 0, 0));
    // TABLE[3][0] = +3
    assert_eq!(
        dither(Color::new(255, 254, 253), 0, 3),
        Color::new(255, 255, 255)
    );
}

#[test]
fn test_dither_is_deterministic() {
    let state = DrawingAreaState {
        dither: true,
        ..DrawingAreaState::default()
    };
    for y in 0..8 {
        for x in 0..8 {
            let first = shade_pixel(Color::new(100, 150, 200), x, y, &state, Pixel::BLACK);
            let second = shade_pixel(Color::new(100, 150, 200), x, y, &state, Pixel::BLACK);
            assert_eq!(first, second);
        }
    }
}

#[test]
fn test_clip_boundaries() {
    let state = DrawingAreaState {
        area: DrawingArea {
            left: 10,
            top: 20,
            right: 30,
            bottom: 40,
        },
        ..DrawingAreaState::default()
    };
    let color = Color::new(255, 0, 0);
    let at = |x, y| shade_pixel(color, x, y, &state, Pixel::BLACK);

    assert!(at(10, 20).is_some());
    assert!(at(30, 40).is_some());
    assert!(at(9, 20).is_none());
    assert!(at(10, 19).is_none());
    assert!(at(31, 20).is_none());
    assert!(at(31, 25).is_none());
    assert!(at(10, 41).is_none());
}

#[test]
fn test_check_mask_blocks_protected_pixels() {
    let state = DrawingAreaState {
        check_mask: true,
        ..DrawingAreaState::default()
    };
    let protected = Pixel::new(1, 2, 3, true);
    let open = Pixel::new(1, 2, 3, false);

    assert!(shade_pixel(Color::new(255, 255, 255), 0, 0, &state, protected).is_none());
    assert!(shade_pixel(Color::new(255, 255, 255), 0, 0, &state, open).is_some());
}

#[test]
fn test_set_mask_marks_output() {
    let state = DrawingAreaState {
        set_mask: true,
        ..DrawingAreaState::default()
    };
    let out = shade_pixel(Color::new(0, 0, 0), 0, 0, &state, Pixel::BLACK).unwrap();
    assert!(out.mask());
}

#[test]
fn test_gate_keeps_rgb() {
    let source = Pixel::new(3, 17, 29, false);
    let state = DrawingAreaState {
        dither: true,
        semi_transparent: true,
        ..DrawingAreaState::default()
    };
    // Transfers never dither or blend
    let out = gate_pixel(source, 0, 0, &state, Pixel::new(31, 31, 31, false)).unwrap();
    assert_eq!(out, source);
}

#[test]
fn test_gate_mask_policy() {
    let marked = Pixel::new(1, 1, 1, true);
    let plain = Pixel::new(1, 1, 1, false);

    let keep = DrawingAreaState::default();
    assert!(gate_pixel(marked, 0, 0, &keep, Pixel::BLACK).unwrap().mask());
    assert!(!gate_pixel(plain, 0, 0, &keep, Pixel::BLACK).unwrap().mask());

    let force = DrawingAreaState {
        set_mask: true,
        ..DrawingAreaState::default()
    };
    assert!(gate_pixel(plain, 0, 0, &force, Pixel::BLACK).unwrap().mask());

    let check = DrawingAreaState {
        check_mask: true,
        ..DrawingAreaState::default()
    };
    assert!(gate_pixel(plain, 0, 0, &check, marked).is_none());
    assert!(gate_pixel(plain, 2000, 0, &keep, Pixel::BLACK).is_none());
}
