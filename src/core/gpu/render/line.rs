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

//! Line coverage
//!
//! Lines step one pixel at a time along their major axis, both end points
//! included. The minor axis coordinate is rounded to nearest. Gouraud lines
//! interpolate their two end colors along the same steps.

use super::super::dispatch::Coverage;
use super::super::types::{Color, Vertex};
use super::rasterizer::{MAX_PRIMITIVE_HEIGHT, MAX_PRIMITIVE_WIDTH};

/// Round-to-nearest division for a positive divisor
#[inline(always)]
fn div_round(numerator: i64, denominator: i64) -> i64 {
    (2 * numerator + denominator).div_euclid(2 * denominator)
}

#[inline(always)]
fn lerp(a: u8, b: u8, step: i64, steps: i64) -> u8 {
    (a as i64 + (b as i64 - a as i64) * step / steps) as u8
}

/// One line segment, vertices already offset into drawing space
#[derive(Debug, Clone)]
pub struct LineSegment {
    /// Covered pixels grouped by row, rows ascending
    points: Vec<(i32, i32, Color)>,
    /// Start index into `points` for each row from `top`
    row_starts: Vec<usize>,
    top: i32,
    oversized: bool,
}

impl LineSegment {
    pub fn new(start: Vertex, end: Vertex, start_color: Color, end_color: Color) -> Self {
        let dx = (end.x - start.x) as i64;
        let dy = (end.y - start.y) as i64;
        let oversized =
            dx.abs() > MAX_PRIMITIVE_WIDTH as i64 || dy.abs() > MAX_PRIMITIVE_HEIGHT as i64;
        let steps = dx.abs().max(dy.abs());

        let mut points = Vec::with_capacity(steps as usize + 1);
        if steps == 0 {
            points.push((start.x, start.y, start_color));
        } else {
            for step in 0..=steps {
                let x = start.x as i64 + div_round(dx * step, steps);
                let y = start.y as i64 + div_round(dy * step, steps);
                let color = Color {
                    r: lerp(start_color.r, end_color.r, step, steps),
                    g: lerp(start_color.g, end_color.g, step, steps),
                    b: lerp(start_color.b, end_color.b, step, steps),
                };
                points.push((x as i32, y as i32, color));
            }
        }

        points.sort_by_key(|&(_, y, _)| y);
        let top = points.first().map_or(0, |p| p.1);
        let bottom = points.last().map_or(0, |p| p.1);

        let mut row_starts = Vec::with_capacity((bottom - top) as usize + 2);
        let mut index = 0;
        for row in top..=bottom + 1 {
            while index < points.len() && points[index].1 < row {
                index += 1;
            }
            row_starts.push(index);
        }

        Self {
            points,
            row_starts,
            top,
            oversized,
        }
    }

    /// Whether the hardware would reject this line as too long
    pub fn exceeds_hardware_limits(&self) -> bool {
        self.oversized
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Coverage for LineSegment {
    type Fragment = Color;

    fn rows(&self) -> Option<(i32, i32)> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        Some((first.1, last.1))
    }

    fn visit_row(&self, y: i32, visit: &mut dyn FnMut(i32, Color)) {
        let row = (y - self.top) as usize;
        if y < self.top || row + 1 >= self.row_starts.len() {
            return;
        }
        for &(x, _, color) in &self.points[self.row_starts[row]..self.row_starts[row + 1]] {
            visit(x, color);
        }
    }
}
