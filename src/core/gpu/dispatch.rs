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

//! Primitive dispatch
//!
//! One dispatch applies a per-pixel kernel to every coordinate a primitive
//! covers. Within a dispatch each coordinate is visited once and in no
//! particular order. Dispatches never overlap: `run` returns only after every
//! write is stored, so the next dispatch sees all of them.
//!
//! The parallel strategy hands disjoint sets of VRAM rows to scoped worker
//! threads. Rows are the unit of ownership, so no two workers ever hold the
//! same pixel.

use super::types::Pixel;
use super::vram::Vram;
use crate::core::config::DispatchMode;
use serde::Serialize;
use std::ops::AddAssign;

/// The set of coordinates one primitive touches
///
/// Coordinates are primitive-space: they may fall outside the store and are
/// wrapped by the dispatcher.
pub trait Coverage: Sync {
    /// Per-coordinate input to the kernel (a color for drawing, a pixel for
    /// transfers)
    type Fragment: Copy;

    /// Inclusive row range, or `None` when nothing is covered
    fn rows(&self) -> Option<(i32, i32)>;

    /// Call `visit` for every covered x in row `y`
    fn visit_row(&self, y: i32, visit: &mut dyn FnMut(i32, Self::Fragment));
}

/// Outcome counters for a dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    /// Coordinates whose pixel was stored
    pub written: u64,
    /// Coordinates rejected by the clip test or the mask check
    pub suppressed: u64,
}

impl AddAssign for DispatchStats {
    fn add_assign(&mut self, other: Self) {
        self.written += other.written;
        self.suppressed += other.suppressed;
    }
}

/// Executes dispatches against a VRAM store
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    mode: DispatchMode,
    workers: usize,
}

impl Dispatcher {
    pub fn new(mode: DispatchMode, workers: usize) -> Self {
        Self {
            mode,
            workers: workers.max(1),
        }
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Apply `kernel` to every coordinate of `coverage`
    ///
    /// The kernel receives the fragment, the primitive-space coordinate and
    /// the pixel currently stored there, and returns the pixel to store.
    pub fn run<C, K>(&self, vram: &mut Vram, coverage: &C, kernel: &K) -> DispatchStats
    where
        C: Coverage,
        K: Fn(C::Fragment, i32, i32, Pixel) -> Option<Pixel> + Sync,
    {
        let Some((top, bottom)) = coverage.rows() else {
            return DispatchStats::default();
        };

        match self.mode {
            DispatchMode::Parallel if self.workers > 1 && bottom > top => {
                run_parallel(vram, coverage, kernel, top, bottom, self.workers)
            }
            _ => run_serial(vram, coverage, kernel, top, bottom),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DispatchMode::Serial, 1)
    }
}

/// Process every primitive row mapping onto one VRAM row
#[inline]
fn shade_row<C, K>(
    row: &mut [Pixel],
    primitive_rows: impl Iterator<Item = i32>,
    coverage: &C,
    kernel: &K,
) -> DispatchStats
where
    C: Coverage,
    K: Fn(C::Fragment, i32, i32, Pixel) -> Option<Pixel> + Sync,
{
    let width = row.len() as i32;
    let mut stats = DispatchStats::default();

    for y in primitive_rows {
        coverage.visit_row(y, &mut |x, fragment| {
            let column = x.rem_euclid(width) as usize;
            match kernel(fragment, x, y, row[column]) {
                Some(pixel) => {
                    row[column] = pixel;
                    stats.written += 1;
                }
                None => stats.suppressed += 1,
            }
        });
    }

    stats
}

fn run_serial<C, K>(vram: &mut Vram, coverage: &C, kernel: &K, top: i32, bottom: i32) -> DispatchStats
where
    C: Coverage,
    K: Fn(C::Fragment, i32, i32, Pixel) -> Option<Pixel> + Sync,
{
    let mut stats = DispatchStats::default();
    for y in top..=bottom {
        let row = vram.wrap_row(y);
        stats += shade_row(vram.row_mut(row), std::iter::once(y), coverage, kernel);
    }
    stats
}

fn run_parallel<C, K>(
    vram: &mut Vram,
    coverage: &C,
    kernel: &K,
    top: i32,
    bottom: i32,
    workers: usize,
) -> DispatchStats
where
    C: Coverage,
    K: Fn(C::Fragment, i32, i32, Pixel) -> Option<Pixel> + Sync,
{
    let height = vram.height() as i32;

    // Each VRAM row collects every primitive row that wraps onto it, so a
    // row is owned by exactly one worker even when the primitive is taller
    // than the store.
    let first_row = |row: i32| top + (row - top).rem_euclid(height);
    let mut rows: Vec<(i32, &mut [Pixel])> = vram
        .rows_mut()
        .enumerate()
        .map(|(row, pixels)| (first_row(row as i32), pixels))
        .filter(|(first, _)| *first <= bottom)
        .collect();

    let band = rows.len().div_ceil(workers).max(1);

    std::thread::scope(|scope| {
        let handles: Vec<_> = rows
            .chunks_mut(band)
            .map(|chunk| {
                scope.spawn(move || {
                    let mut stats = DispatchStats::default();
                    for (first, pixels) in chunk.iter_mut() {
                        let primitive_rows = (*first..=bottom).step_by(height as usize);
                        stats += shade_row(pixels, primitive_rows, coverage, kernel);
                    }
                    stats
                })
            })
            .collect();

        let mut total = DispatchStats::default();
        for handle in handles {
            match handle.join() {
                Ok(stats) => total += stats,
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
        total
    })
}
