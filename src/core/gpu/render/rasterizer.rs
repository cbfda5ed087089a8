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

//! Triangle coverage
//!
//! Triangles are rasterized with edge functions over their bounding box.
//! A top-left fill rule decides ownership of pixels lying exactly on an edge,
//! so two triangles sharing an edge never both cover the same pixel. The
//! right and bottom edges of a lone triangle are therefore excluded.
//!
//! Gouraud shading interpolates the vertex colors barycentrically with
//! integer weights. Flat shading is the special case of three equal colors.
//!
//! # References
//!
//! - [Scratchapixel: Rasterization](https://www.scratchapixel.com/lessons/3d-basic-rendering/rasterization-practical-implementation)

use super::super::dispatch::Coverage;
use super::super::types::{Color, Vertex};

/// Largest horizontal extent the hardware will draw
pub const MAX_PRIMITIVE_WIDTH: i32 = 1023;

/// Largest vertical extent the hardware will draw
pub const MAX_PRIMITIVE_HEIGHT: i32 = 511;

/// Edge function: twice the signed area of (a, b, p)
///
/// Positive when p is on the interior side of a clockwise (y-down) edge.
#[inline(always)]
fn edge(a: Vertex, b: Vertex, px: i32, py: i32) -> i64 {
    (b.x - a.x) as i64 * (py - a.y) as i64 - (b.y - a.y) as i64 * (px - a.x) as i64
}

/// Top and left edges own the pixels lying on them
#[inline(always)]
fn is_top_left(a: Vertex, b: Vertex) -> bool {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dy == 0 && dx > 0) || dy < 0
}

/// A shaded triangle, vertices already offset into drawing space
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    vertices: [Vertex; 3],
    colors: [Color; 3],
    area: i64,
    bounds: (i32, i32, i32, i32),
}

impl Triangle {
    /// Build a triangle, returning `None` when it is degenerate
    pub fn new(vertices: [Vertex; 3], colors: [Color; 3]) -> Option<Self> {
        let [v0, mut v1, mut v2] = vertices;
        let [c0, mut c1, mut c2] = colors;

        let mut area = edge(v0, v1, v2.x, v2.y);
        if area == 0 {
            return None;
        }
        if area < 0 {
            std::mem::swap(&mut v1, &mut v2);
            std::mem::swap(&mut c1, &mut c2);
            area = -area;
        }

        let min_x = v0.x.min(v1.x).min(v2.x);
        let max_x = v0.x.max(v1.x).max(v2.x);
        let min_y = v0.y.min(v1.y).min(v2.y);
        let max_y = v0.y.max(v1.y).max(v2.y);

        Some(Self {
            vertices: [v0, v1, v2],
            colors: [c0, c1, c2],
            area,
            bounds: (min_x, min_y, max_x, max_y),
        })
    }

    /// Bounding box as (left, top, right, bottom)
    pub fn bounds(&self) -> (i32, i32, i32, i32) {
        self.bounds
    }

    /// Whether the hardware would reject this triangle as too large
    pub fn exceeds_hardware_limits(&self) -> bool {
        let (left, top, right, bottom) = self.bounds;
        right - left > MAX_PRIMITIVE_WIDTH || bottom - top > MAX_PRIMITIVE_HEIGHT
    }

    #[inline]
    fn interpolate(&self, w: [i64; 3]) -> Color {
        let [c0, c1, c2] = self.colors;
        let channel = |a: u8, b: u8, c: u8| {
            ((w[0] * a as i64 + w[1] * b as i64 + w[2] * c as i64) / self.area) as u8
        };
        Color {
            r: channel(c0.r, c1.r, c2.r),
            g: channel(c0.g, c1.g, c2.g),
            b: channel(c0.b, c1.b, c2.b),
        }
    }

    #[inline]
    fn weights(&self, x: i32, y: i32) -> Option<[i64; 3]> {
        let [v0, v1, v2] = self.vertices;
        let w = [edge(v1, v2, x, y), edge(v2, v0, x, y), edge(v0, v1, x, y)];
        let owns = [
            is_top_left(v1, v2),
            is_top_left(v2, v0),
            is_top_left(v0, v1),
        ];
        w.iter()
            .zip(owns.iter())
            .all(|(&weight, &owned)| weight > 0 || (weight == 0 && owned))
            .then_some(w)
    }

    /// Whether `(x, y)` lies inside under the top-left rule
    pub fn covers(&self, x: i32, y: i32) -> bool {
        let (left, top, right, bottom) = self.bounds;
        (left..=right).contains(&x)
            && (top..=bottom).contains(&y)
            && self.weights(x, y).is_some()
    }

    /// Visit covered pixels of row `y` not already covered by any of `earlier`
    fn visit_row_except(
        &self,
        y: i32,
        earlier: &[Triangle],
        visit: &mut dyn FnMut(i32, Color),
    ) {
        let (left, top, right, bottom) = self.bounds;
        if y < top || y > bottom {
            return;
        }

        for x in left..=right {
            if let Some(w) = self.weights(x, y) {
                if earlier.iter().any(|t| t.covers(x, y)) {
                    continue;
                }
                visit(x, self.interpolate(w));
            }
        }
    }
}

/// Three- or four-point polygon as a single dispatch
///
/// A quad (v0, v1, v2, v3) is split into (v0, v1, v2) and (v1, v2, v3).
/// Where the halves overlap (bowtie or concave quads) the first one wins,
/// so each coordinate is visited at most once.
#[derive(Debug, Clone)]
pub struct Polygon {
    triangles: Vec<Triangle>,
}

impl Polygon {
    pub fn new(vertices: &[Vertex], colors: &[Color]) -> Self {
        let mut triangles = Vec::with_capacity(2);
        for start in 0..vertices.len().saturating_sub(2) {
            let v = [vertices[start], vertices[start + 1], vertices[start + 2]];
            let c = [colors[start], colors[start + 1], colors[start + 2]];
            if let Some(triangle) = Triangle::new(v, c) {
                triangles.push(triangle);
            }
        }
        Self { triangles }
    }

    /// Whether any part exceeds the hardware size limits
    pub fn exceeds_hardware_limits(&self) -> bool {
        self.triangles.iter().any(Triangle::exceeds_hardware_limits)
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

impl Coverage for Polygon {
    type Fragment = Color;

    fn rows(&self) -> Option<(i32, i32)> {
        let top = self.triangles.iter().map(|t| t.bounds.1).min()?;
        let bottom = self.triangles.iter().map(|t| t.bounds.3).max()?;
        Some((top, bottom))
    }

    fn visit_row(&self, y: i32, visit: &mut dyn FnMut(i32, Color)) {
        for (index, triangle) in self.triangles.iter().enumerate() {
            triangle.visit_row_except(y, &self.triangles[..index], visit);
        }
    }
}
