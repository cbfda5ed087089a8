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

//! GP0 command decoder
//!
//! GP0 words are fed one at a time into a small state machine:
//!
//! ```text
//! Idle ──opcode──► ReceivingParameters ──last parameter──► (execute) ──► Idle
//!                                                             │
//!                      TransferringPixelData ◄── CPU→VRAM ────┤
//!                      ReceivingPolyline     ◄── polyline ────┘
//! ```
//!
//! Commands with no parameters execute on the opcode word. Execution is
//! synchronous, so the next word is only looked at once the command's
//! pipeline dispatch has finished.
//!
//! Unrecognized opcodes are no-ops that still consume their declared
//! parameter count, which keeps the stream aligned.

mod drawing_mode;
mod fill;
mod line;
mod polygon;
mod rectangle;
mod transfer;

use super::dispatch::Coverage;
use super::pipeline::{gate_pixel, shade_pixel, DrawingAreaState};
use super::render::StagedRect;
use super::types::{Color, Pixel};
use super::GPU;
use line::PolylineState;
use transfer::PixelUpload;

/// Observable decoder state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderPhase {
    Idle,
    ReceivingParameters,
    ReceivingPolyline,
    TransferringPixelData,
}

/// Pending-command state
#[derive(Debug, Clone, Default)]
pub(in crate::core::gpu) enum DecoderState {
    #[default]
    Idle,
    ReceivingParameters {
        remaining: usize,
    },
    ReceivingPolyline(PolylineState),
    TransferringPixelData(PixelUpload),
}

/// Decoder state plus the words of the command being assembled
#[derive(Debug, Clone, Default)]
pub(in crate::core::gpu) struct Decoder {
    pub(in crate::core::gpu) state: DecoderState,
    pub(in crate::core::gpu) buffer: Vec<u32>,
}

impl Decoder {
    pub(in crate::core::gpu) fn new() -> Self {
        Self {
            state: DecoderState::Idle,
            buffer: Vec::with_capacity(16),
        }
    }

    pub(in crate::core::gpu) fn phase(&self) -> DecoderPhase {
        match self.state {
            DecoderState::Idle => DecoderPhase::Idle,
            DecoderState::ReceivingParameters { .. } => DecoderPhase::ReceivingParameters,
            DecoderState::ReceivingPolyline(_) => DecoderPhase::ReceivingPolyline,
            DecoderState::TransferringPixelData(_) => DecoderPhase::TransferringPixelData,
        }
    }

    /// Return to Idle, discarding any partial command
    ///
    /// Returns true if something was discarded.
    pub(in crate::core::gpu) fn reset(&mut self) -> bool {
        let discarded = !matches!(self.state, DecoderState::Idle);
        self.state = DecoderState::Idle;
        self.buffer.clear();
        discarded
    }
}

/// Sequential reader over a received command
///
/// The decoder only executes once the declared count has arrived, so reads
/// stay in bounds; a short slice reads as zeros rather than panicking.
pub(in crate::core::gpu) struct WordReader<'a> {
    words: &'a [u32],
    position: usize,
}

impl<'a> WordReader<'a> {
    pub(in crate::core::gpu) fn new(words: &'a [u32]) -> Self {
        Self { words, position: 0 }
    }

    pub(in crate::core::gpu) fn next_word(&mut self) -> u32 {
        let word = self.words.get(self.position).copied().unwrap_or(0);
        self.position += 1;
        word
    }

    pub(in crate::core::gpu) fn skip(&mut self) {
        self.position += 1;
    }
}

/// Number of parameter words following the opcode word
///
/// For polylines this is the count up to the second vertex; further
/// vertices are read until the terminator. For CPU-to-VRAM loads the pixel
/// data words are not included.
///
/// # Examples
///
/// ```
/// use psx_gpu::core::gpu::parameter_count;
///
/// assert_eq!(parameter_count(0x20), 3); // flat triangle
/// assert_eq!(parameter_count(0x3C), 11); // gouraud textured quad
/// assert_eq!(parameter_count(0x60), 2); // variable-size rectangle
/// assert_eq!(parameter_count(0xE1), 0);
/// ```
pub fn parameter_count(opcode: u8) -> usize {
    match opcode {
        0x02 => 2,
        0x20..=0x3F => {
            let vertices = if opcode & 0x08 != 0 { 4 } else { 3 };
            let textured = (opcode & 0x04 != 0) as usize;
            let gouraud = opcode & 0x10 != 0;
            vertices * (1 + textured) + if gouraud { vertices - 1 } else { 0 }
        }
        0x40..=0x5F => {
            if opcode & 0x10 != 0 {
                3
            } else {
                2
            }
        }
        0x60..=0x7F => {
            let textured = (opcode & 0x04 != 0) as usize;
            let variable = (opcode & 0x18 == 0) as usize;
            1 + textured + variable
        }
        0x80..=0x9F => 3,
        0xA0..=0xBF => 2,
        0xC0..=0xDF => 2,
        _ => 0,
    }
}

impl GPU {
    /// Write a word to GP0
    ///
    /// # Examples
    ///
    /// ```
    /// use psx_gpu::core::gpu::{DecoderPhase, GPU};
    ///
    /// let mut gpu = GPU::new();
    /// gpu.write_gp0(0x2000_00FF); // flat triangle, needs 3 vertices
    /// assert_eq!(gpu.decoder_phase(), DecoderPhase::ReceivingParameters);
    /// gpu.write_gp0(0x0000_0000);
    /// gpu.write_gp0(0x0000_0010);
    /// gpu.write_gp0(0x0010_0000);
    /// assert_eq!(gpu.decoder_phase(), DecoderPhase::Idle);
    /// ```
    pub fn write_gp0(&mut self, word: u32) {
        self.stats.words += 1;
        log::trace!("GP0 <- 0x{:08X}", word);

        let state = std::mem::take(&mut self.decoder.state);
        self.decoder.state = match state {
            DecoderState::Idle => {
                self.decoder.buffer.clear();
                self.decoder.buffer.push(word);
                let count = parameter_count((word >> 24) as u8);
                if count == 0 {
                    self.execute_command()
                } else {
                    DecoderState::ReceivingParameters { remaining: count }
                }
            }
            DecoderState::ReceivingParameters { remaining } => {
                self.decoder.buffer.push(word);
                if remaining <= 1 {
                    self.execute_command()
                } else {
                    DecoderState::ReceivingParameters {
                        remaining: remaining - 1,
                    }
                }
            }
            DecoderState::ReceivingPolyline(polyline) => self.continue_polyline(polyline, word),
            DecoderState::TransferringPixelData(mut upload) => {
                upload.push_word(word);
                if upload.is_complete() {
                    self.finish_cpu_to_vram(upload);
                    DecoderState::Idle
                } else {
                    DecoderState::TransferringPixelData(upload)
                }
            }
        };
    }

    /// Execute the fully received command in the buffer
    fn execute_command(&mut self) -> DecoderState {
        let mut words = std::mem::take(&mut self.decoder.buffer);
        let opcode = (words[0] >> 24) as u8;
        self.stats.commands += 1;

        let next = match opcode {
            0x00 | 0x03..=0x1E => {
                log::trace!("GP0({:02X}h) nop", opcode);
                DecoderState::Idle
            }
            0x01 => {
                log::trace!("GP0(01h) clear texture cache");
                DecoderState::Idle
            }
            0x02 => {
                self.gp0_fill_rectangle(&words);
                DecoderState::Idle
            }
            0x1F => {
                log::debug!("GP0(1Fh) interrupt request");
                self.interrupt_request = true;
                DecoderState::Idle
            }
            0x20..=0x3F => {
                self.gp0_polygon(&words);
                DecoderState::Idle
            }
            0x40..=0x5F => self.gp0_line(&words),
            0x60..=0x7F => {
                self.gp0_rectangle(&words);
                DecoderState::Idle
            }
            0x80..=0x9F => {
                self.gp0_vram_to_vram(&words);
                DecoderState::Idle
            }
            0xA0..=0xBF => self.gp0_cpu_to_vram(&words),
            0xC0..=0xDF => {
                self.gp0_vram_to_cpu(&words);
                DecoderState::Idle
            }
            0xE1 => {
                self.gp0_draw_mode(words[0]);
                DecoderState::Idle
            }
            0xE2 => {
                self.gp0_texture_window(words[0]);
                DecoderState::Idle
            }
            0xE3 => {
                self.gp0_draw_area_top_left(words[0]);
                DecoderState::Idle
            }
            0xE4 => {
                self.gp0_draw_area_bottom_right(words[0]);
                DecoderState::Idle
            }
            0xE5 => {
                self.gp0_draw_offset(words[0]);
                DecoderState::Idle
            }
            0xE6 => {
                self.gp0_mask_settings(words[0]);
                DecoderState::Idle
            }
            _ => {
                log::warn!("Unrecognized GP0 command: 0x{:02X}", opcode);
                DecoderState::Idle
            }
        };

        // Hand the allocation back for the next command
        words.clear();
        self.decoder.buffer = words;
        next
    }

    /// Run the drawing pipeline over a primitive as one dispatch
    pub(in crate::core::gpu) fn dispatch_draw<C>(&mut self, coverage: &C, state: DrawingAreaState)
    where
        C: Coverage<Fragment = Color>,
    {
        let kernel = move |color: Color, x: i32, y: i32, existing: Pixel| {
            shade_pixel(color, x, y, &state, existing)
        };
        let stats = self.dispatcher.run(&mut self.vram, coverage, &kernel);

        log::trace!(
            "Dispatch: {} written, {} suppressed",
            stats.written,
            stats.suppressed
        );
        self.stats.dispatches += 1;
        self.stats.pixels += stats;
    }

    /// Write staged pixels through the transfer gate as one dispatch
    ///
    /// Transfers wrap before the clip test, so the gate sees VRAM
    /// coordinates.
    pub(in crate::core::gpu) fn dispatch_transfer(&mut self, staged: &StagedRect) {
        let state = self.drawing_state(false);
        let width = self.vram.width() as i32;
        let height = self.vram.height() as i32;

        let kernel = move |source: Pixel, x: i32, y: i32, existing: Pixel| {
            gate_pixel(
                source,
                x.rem_euclid(width),
                y.rem_euclid(height),
                &state,
                existing,
            )
        };
        let stats = self.dispatcher.run(&mut self.vram, staged, &kernel);

        log::trace!(
            "Transfer dispatch: {} written, {} suppressed",
            stats.written,
            stats.suppressed
        );
        self.stats.dispatches += 1;
        self.stats.pixels += stats;
    }
}
