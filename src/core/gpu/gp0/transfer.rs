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

//! GP0 VRAM transfer commands
//!
//! - 0x80-0x9F: VRAM to VRAM copy
//! - 0xA0-0xBF: CPU to VRAM load
//! - 0xC0-0xDF: VRAM to CPU readback
//!
//! Loads and copies go through the transfer gate (set-mask, clip test,
//! check-mask) without any color processing. Readback never writes VRAM.

use super::DecoderState;
use crate::core::gpu::render::StagedRect;
use crate::core::gpu::types::Pixel;
use crate::core::gpu::GPU;

/// Decode a 0xYYYYXXXX VRAM position word
#[inline]
fn decode_position(word: u32) -> (i32, i32) {
    ((word & 0x3FF) as i32, ((word >> 16) & 0x1FF) as i32)
}

/// Decode a 0xHHHHWWWW size word; zero wraps to the maximum
#[inline]
fn decode_size(word: u32) -> (u32, u32) {
    let width = ((word & 0xFFFF).wrapping_sub(1) & 0x3FF) + 1;
    let height = (((word >> 16) & 0xFFFF).wrapping_sub(1) & 0x1FF) + 1;
    (width, height)
}

/// A CPU-to-VRAM load collecting its pixel words
#[derive(Debug, Clone)]
pub(in crate::core::gpu) struct PixelUpload {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    staged: Vec<Pixel>,
}

impl PixelUpload {
    fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            staged: Vec::with_capacity(width as usize * height as usize),
        }
    }

    fn expected(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Stage two pixels, low half first; a surplus high half is dropped
    pub(in crate::core::gpu) fn push_word(&mut self, word: u32) {
        for half in [word as u16, (word >> 16) as u16] {
            if self.staged.len() < self.expected() {
                self.staged.push(Pixel::from_raw(half));
            }
        }
    }

    pub(in crate::core::gpu) fn is_complete(&self) -> bool {
        self.staged.len() >= self.expected()
    }
}

impl GPU {
    /// GP0(A0h): CPU to VRAM
    ///
    /// ```text
    /// Word 0: 0xA0000000
    /// Word 1: 0xYYYYXXXX  destination
    /// Word 2: 0xHHHHWWWW  size
    /// Then ceil(W*H/2) data words, two pixels each
    /// ```
    pub(in crate::core::gpu) fn gp0_cpu_to_vram(&mut self, words: &[u32]) -> DecoderState {
        let (x, y) = decode_position(words[1]);
        let (width, height) = decode_size(words[2]);

        log::debug!("CPU→VRAM transfer: ({}, {}) size {}×{}", x, y, width, height);

        DecoderState::TransferringPixelData(PixelUpload::new(x, y, width, height))
    }

    /// Write a fully staged CPU-to-VRAM load
    pub(in crate::core::gpu) fn finish_cpu_to_vram(&mut self, upload: PixelUpload) {
        let staged = StagedRect {
            x: upload.x,
            y: upload.y,
            width: upload.width,
            height: upload.height,
            pixels: upload.staged,
        };
        self.dispatch_transfer(&staged);
        log::debug!("CPU→VRAM transfer complete");
    }

    /// GP0(C0h): VRAM to CPU
    ///
    /// The rectangle is snapshotted and packed two pixels per word for
    /// GPUREAD; GPUSTAT bit 27 stays set until the last word is read.
    pub(in crate::core::gpu) fn gp0_vram_to_cpu(&mut self, words: &[u32]) {
        let (x, y) = decode_position(words[1]);
        let (width, height) = decode_size(words[2]);

        log::debug!("VRAM→CPU transfer: ({}, {}) size {}×{}", x, y, width, height);

        let pixels = self.vram.read_rect(x, y, width, height);
        self.readback.clear();
        self.readback.extend(pixels.chunks(2).map(|pair| {
            let low = pair[0].raw() as u32;
            let high = pair.get(1).map_or(0, |p| p.raw() as u32);
            low | (high << 16)
        }));
    }

    /// GP0(80h): VRAM to VRAM copy
    ///
    /// ```text
    /// Word 0: 0x80000000
    /// Word 1: 0xYYYYXXXX  source
    /// Word 2: 0xYYYYXXXX  destination
    /// Word 3: 0xHHHHWWWW  size
    /// ```
    ///
    /// The source is read completely before anything is written, so
    /// overlapping rectangles copy as if in one step.
    pub(in crate::core::gpu) fn gp0_vram_to_vram(&mut self, words: &[u32]) {
        let (src_x, src_y) = decode_position(words[1]);
        let (dst_x, dst_y) = decode_position(words[2]);
        let (width, height) = decode_size(words[3]);

        log::debug!(
            "VRAM→VRAM copy: ({}, {}) → ({}, {}) size {}×{}",
            src_x,
            src_y,
            dst_x,
            dst_y,
            width,
            height
        );

        let staged = StagedRect {
            x: dst_x,
            y: dst_y,
            width,
            height,
            pixels: self.vram.read_rect(src_x, src_y, width, height),
        };
        self.dispatch_transfer(&staged);
    }
}
