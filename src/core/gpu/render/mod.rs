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

//! Primitive coverage
//!
//! Converts decoded primitives into [`Coverage`] values the dispatcher can
//! run the pixel pipeline over.

mod line;
mod rasterizer;

pub use line::LineSegment;
pub use rasterizer::{Polygon, Triangle, MAX_PRIMITIVE_HEIGHT, MAX_PRIMITIVE_WIDTH};

use super::dispatch::Coverage;
use super::types::{Color, Pixel};

/// Axis-aligned rectangle of one color
#[derive(Debug, Clone, Copy)]
pub struct FlatRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub color: Color,
}

impl Coverage for FlatRect {
    type Fragment = Color;

    fn rows(&self) -> Option<(i32, i32)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some((self.y, self.y + self.height as i32 - 1))
    }

    fn visit_row(&self, y: i32, visit: &mut dyn FnMut(i32, Color)) {
        if y < self.y || y >= self.y + self.height as i32 {
            return;
        }
        for x in self.x..self.x + self.width as i32 {
            visit(x, self.color);
        }
    }
}

/// Rectangle of pre-formatted pixels headed for VRAM
///
/// Used by CPU-to-VRAM loads and VRAM-to-VRAM copies. `pixels` is
/// row-major and holds exactly `width * height` entries.
#[derive(Debug, Clone)]
pub struct StagedRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Pixel>,
}

impl Coverage for StagedRect {
    type Fragment = Pixel;

    fn rows(&self) -> Option<(i32, i32)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some((self.y, self.y + self.height as i32 - 1))
    }

    fn visit_row(&self, y: i32, visit: &mut dyn FnMut(i32, Pixel)) {
        let row = y - self.y;
        if row < 0 || row >= self.height as i32 {
            return;
        }
        let start = row as usize * self.width as usize;
        let end = start + self.width as usize;
        if let Some(pixels) = self.pixels.get(start..end) {
            for (dx, &pixel) in pixels.iter().enumerate() {
                visit(self.x + dx as i32, pixel);
            }
        }
    }
}
