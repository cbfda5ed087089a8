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

//! VRAM store
//!
//! A two-dimensional array of [`Pixel`]s. Every coordinate is wrapped modulo
//! the store's width and height, so out-of-range accesses never fail.

use super::types::Pixel;

/// Default VRAM width in pixels
pub const VRAM_WIDTH: usize = 1024;

/// Default VRAM height in pixels
pub const VRAM_HEIGHT: usize = 512;

/// VRAM pixel storage
///
/// # Examples
///
/// ```
/// use psx_gpu::core::gpu::{Pixel, Vram};
///
/// let mut vram = Vram::new(1024, 512);
/// vram.write(1024 + 3, -1, Pixel::from_raw(0x7FFF));
/// assert_eq!(vram.read(3, 511).raw(), 0x7FFF);
/// ```
#[derive(Debug, Clone)]
pub struct Vram {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
}

impl Vram {
    /// Create a zeroed store
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero. Dimensions come from a validated
    /// [`Config`](crate::core::config::Config).
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "VRAM dimensions must be nonzero");
        Self {
            width,
            height,
            pixels: vec![Pixel::BLACK; width * height],
        }
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Wrap a signed coordinate pair into the store
    #[inline(always)]
    pub fn wrap(&self, x: i32, y: i32) -> (usize, usize) {
        (
            x.rem_euclid(self.width as i32) as usize,
            y.rem_euclid(self.height as i32) as usize,
        )
    }

    #[inline(always)]
    pub fn wrap_row(&self, y: i32) -> usize {
        y.rem_euclid(self.height as i32) as usize
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> usize {
        let (x, y) = self.wrap(x, y);
        y * self.width + x
    }

    #[inline(always)]
    pub fn read(&self, x: i32, y: i32) -> Pixel {
        self.pixels[self.index(x, y)]
    }

    #[inline(always)]
    pub fn write(&mut self, x: i32, y: i32, pixel: Pixel) {
        let index = self.index(x, y);
        self.pixels[index] = pixel;
    }

    /// Fill a rectangle without any drawing-state gating
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, pixel: Pixel) {
        for dy in 0..height as i32 {
            for dx in 0..width as i32 {
                self.write(x + dx, y + dy, pixel);
            }
        }
    }

    /// Copy a rectangle out in row-major order
    pub fn read_rect(&self, x: i32, y: i32, width: u32, height: u32) -> Vec<Pixel> {
        let mut out = Vec::with_capacity(width as usize * height as usize);
        for dy in 0..height as i32 {
            for dx in 0..width as i32 {
                out.push(self.read(x + dx, y + dy));
            }
        }
        out
    }

    /// Mutable row slices, top to bottom
    pub(crate) fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, Pixel> {
        self.pixels.chunks_mut(self.width)
    }

    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [Pixel] {
        let start = y * self.width;
        &mut self.pixels[start..start + self.width]
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Zero every pixel
    pub fn clear(&mut self) {
        self.pixels.fill(Pixel::BLACK);
    }

    /// FNV-1a hash over the raw 16-bit words, little-endian
    pub fn checksum(&self) -> u64 {
        const FNV_OFFSET: u64 = 0xCBF2_9CE4_8422_2325;
        const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;

        self.pixels.iter().fold(FNV_OFFSET, |hash, pixel| {
            pixel.raw().to_le_bytes().iter().fold(hash, |h, &byte| {
                (h ^ byte as u64).wrapping_mul(FNV_PRIME)
            })
        })
    }

    /// Raw little-endian bytes, for dumping
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|pixel| pixel.raw().to_le_bytes())
            .collect()
    }
}

impl Default for Vram {
    fn default() -> Self {
        Self::new(VRAM_WIDTH, VRAM_HEIGHT)
    }
}
