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

//! Per-pixel pipeline
//!
//! Two pure functions decide what, if anything, lands in VRAM for one
//! coordinate. [`shade_pixel`] is the drawing path used by polygons, lines
//! and rectangles. [`gate_pixel`] is the transfer path used by CPU-to-VRAM
//! loads and VRAM-to-VRAM copies, which carry pre-formatted pixels.
//!
//! Neither function touches VRAM. The dispatcher loads the existing pixel,
//! calls one of them, and stores the result when it is `Some`.

use super::registers::DrawingArea;
use super::types::{BlendMode, Color, DitherMatrix, Pixel};

/// Drawing state for one primitive
///
/// Assembled by the decoder from the current GP0(E1h)/(E3h)/(E4h)/(E6h)
/// settings and the primitive's own semi-transparency flag. It is read-only
/// for the whole dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawingAreaState {
    /// Clip rectangle, inclusive
    pub area: DrawingArea,
    pub dither: bool,
    pub semi_transparent: bool,
    pub blend_mode: BlendMode,
    /// Force the mask bit of written pixels to 1
    pub set_mask: bool,
    /// Skip writes over pixels whose mask bit is 1
    pub check_mask: bool,
}

impl Default for DrawingAreaState {
    fn default() -> Self {
        Self {
            area: DrawingArea::default(),
            dither: false,
            semi_transparent: false,
            blend_mode: BlendMode::Average,
            set_mask: false,
            check_mask: false,
        }
    }
}

/// Add the dither offset for (x, y) and clamp to 0-255
#[inline(always)]
pub fn dither(color: Color, x: i32, y: i32) -> Color {
    let offset = DitherMatrix::offset(x, y);
    let apply = |c: u8| (c as i32 + offset).clamp(0, 255) as u8;
    Color {
        r: apply(color.r),
        g: apply(color.g),
        b: apply(color.b),
    }
}

/// Reduce an 8-bit channel to 5 bits
#[inline(always)]
pub fn quantize(channel: u8) -> u8 {
    (channel >> 3).min(31)
}

/// Run the drawing pipeline for one coordinate
///
/// Order: dither, quantize, blend against `existing`, apply mask policy,
/// clip test, mask-check gate. Returns the pixel to store, or `None` when
/// the write is suppressed.
///
/// # Examples
///
/// ```
/// use psx_gpu::core::gpu::{shade_pixel, BlendMode, Color, DrawingAreaState, Pixel};
///
/// let state = DrawingAreaState {
///     semi_transparent: true,
///     blend_mode: BlendMode::Average,
///     ..DrawingAreaState::default()
/// };
/// let background = Pixel::new(16, 16, 16, false);
/// let out = shade_pixel(Color::new(64, 64, 64), 10, 10, &state, background).unwrap();
/// assert_eq!((out.r(), out.g(), out.b()), (12, 12, 12));
/// ```
#[inline]
pub fn shade_pixel(
    color: Color,
    x: i32,
    y: i32,
    state: &DrawingAreaState,
    existing: Pixel,
) -> Option<Pixel> {
    let color = if state.dither {
        dither(color, x, y)
    } else {
        color
    };

    let mut r = quantize(color.r);
    let mut g = quantize(color.g);
    let mut b = quantize(color.b);

    if state.semi_transparent {
        let mode = state.blend_mode;
        r = mode.blend_channel(existing.r(), r);
        g = mode.blend_channel(existing.g(), g);
        b = mode.blend_channel(existing.b(), b);
    }

    let pixel = Pixel::new(r, g, b, state.set_mask);

    if !state.area.contains(x, y) {
        return None;
    }
    if state.check_mask && existing.mask() {
        return None;
    }

    Some(pixel)
}

/// Run the transfer gate for one coordinate
///
/// RGB is taken from `source` untouched. The mask bit is forced on under
/// set-mask and otherwise carried from the source. Clip test and
/// mask-check gate apply as for drawing.
#[inline]
pub fn gate_pixel(
    source: Pixel,
    x: i32,
    y: i32,
    state: &DrawingAreaState,
    existing: Pixel,
) -> Option<Pixel> {
    let pixel = if state.set_mask {
        source.with_mask(true)
    } else {
        source
    };

    if !state.area.contains(x, y) {
        return None;
    }
    if state.check_mask && existing.mask() {
        return None;
    }

    Some(pixel)
}
