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

//! GPU type definitions
//!
//! This module contains the value types shared by the pixel pipeline and
//! the command decoder: 24-bit command colors, 16-bit VRAM pixels, vertices,
//! semi-transparency modes and the dither table.

/// A 24-bit RGB color used in GPU commands
///
/// Commands carry 8 bits per channel. The pixel pipeline reduces them to the
/// 5-bit VRAM format after optional dithering.
///
/// # Examples
///
/// ```
/// use psx_gpu::core::gpu::Color;
///
/// let color = Color::from_u32(0x00FF8040);
/// assert_eq!(color.r, 0x40);
/// assert_eq!(color.g, 0x80);
/// assert_eq!(color.b, 0xFF);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a Color from a 32-bit command word
    ///
    /// The color is encoded in the lower 24 bits:
    /// - Bits 0-7: Red
    /// - Bits 8-15: Green
    /// - Bits 16-23: Blue
    pub fn from_u32(value: u32) -> Self {
        Self {
            r: (value & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: ((value >> 16) & 0xFF) as u8,
        }
    }

    /// Pack back into the low 24 bits of a command word
    pub fn to_u32(self) -> u32 {
        (self.r as u32) | ((self.g as u32) << 8) | ((self.b as u32) << 16)
    }
}

/// One VRAM texel
///
/// Wire format, 16 bits little-endian:
/// - Bits 0-4: Red
/// - Bits 5-9: Green
/// - Bits 10-14: Blue
/// - Bit 15: Mask
///
/// Channels are always within 0-31 because the constructor saturates them.
///
/// # Examples
///
/// ```
/// use psx_gpu::core::gpu::Pixel;
///
/// let pixel = Pixel::new(31, 16, 8, true);
/// assert_eq!(pixel.raw(), 0x8000 | (8 << 10) | (16 << 5) | 31);
/// assert_eq!(Pixel::new(40, 0, 0, false).r(), 31);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(transparent)]
pub struct Pixel(u16);

impl Pixel {
    pub const BLACK: Pixel = Pixel(0);

    const MASK_BIT: u16 = 0x8000;

    /// Build a pixel from 5-bit channels, saturating each at 31
    #[inline]
    pub fn new(r: u8, g: u8, b: u8, mask: bool) -> Self {
        let r = r.min(31) as u16;
        let g = g.min(31) as u16;
        let b = b.min(31) as u16;
        let mask = if mask { Self::MASK_BIT } else { 0 };
        Self(mask | (b << 10) | (g << 5) | r)
    }

    #[inline(always)]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    #[inline(always)]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline(always)]
    pub const fn r(self) -> u8 {
        (self.0 & 0x1F) as u8
    }

    #[inline(always)]
    pub const fn g(self) -> u8 {
        ((self.0 >> 5) & 0x1F) as u8
    }

    #[inline(always)]
    pub const fn b(self) -> u8 {
        ((self.0 >> 10) & 0x1F) as u8
    }

    #[inline(always)]
    pub const fn mask(self) -> bool {
        self.0 & Self::MASK_BIT != 0
    }

    /// Same color with the mask bit replaced
    #[inline(always)]
    pub const fn with_mask(self, mask: bool) -> Self {
        if mask {
            Self(self.0 | Self::MASK_BIT)
        } else {
            Self(self.0 & !Self::MASK_BIT)
        }
    }
}

/// A 2D vertex position used in polygon and line rendering
///
/// Vertex words hold signed 11-bit coordinates:
/// - Bits 0-10: X
/// - Bits 16-26: Y
///
/// The drawing offset is added before rasterization.
///
/// # Examples
///
/// ```
/// use psx_gpu::core::gpu::Vertex;
///
/// let v = Vertex::from_u32(0x0064_0032);
/// assert_eq!((v.x, v.y), (50, 100));
///
/// // 0x7FF is -1 in 11-bit two's complement
/// let v = Vertex::from_u32(0x07FF_07FF);
/// assert_eq!((v.x, v.y), (-1, -1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Vertex {
    pub x: i32,
    pub y: i32,
}

impl Vertex {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn from_u32(value: u32) -> Self {
        Self {
            x: sign_extend_11(value),
            y: sign_extend_11(value >> 16),
        }
    }

    /// Translate by the drawing offset
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Sign-extend the low 11 bits of a word
#[inline(always)]
pub(crate) fn sign_extend_11(value: u32) -> i32 {
    (((value & 0x7FF) << 21) as i32) >> 21
}

/// Semi-transparency blending modes
///
/// Applied per channel on 5-bit values in a signed domain and clamped to 0-31.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// B/2 + F/2
    #[default]
    Average,
    /// B + F
    Additive,
    /// B - F
    Subtractive,
    /// B + F/4
    AddQuarter,
}

impl BlendMode {
    /// Decode from draw mode bits 5-6 (already shifted down)
    pub fn from_bits(bits: u8) -> Self {
        match bits & 3 {
            0 => BlendMode::Average,
            1 => BlendMode::Additive,
            2 => BlendMode::Subtractive,
            _ => BlendMode::AddQuarter,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            BlendMode::Average => 0,
            BlendMode::Additive => 1,
            BlendMode::Subtractive => 2,
            BlendMode::AddQuarter => 3,
        }
    }

    /// Blend one 5-bit channel of background and foreground
    ///
    /// # Examples
    ///
    /// ```
    /// use psx_gpu::core::gpu::BlendMode;
    ///
    /// assert_eq!(BlendMode::Average.blend_channel(16, 8), 12);
    /// assert_eq!(BlendMode::Additive.blend_channel(31, 8), 31);
    /// assert_eq!(BlendMode::Subtractive.blend_channel(4, 8), 0);
    /// assert_eq!(BlendMode::AddQuarter.blend_channel(16, 8), 18);
    /// ```
    #[inline]
    pub fn blend_channel(self, background: u8, foreground: u8) -> u8 {
        let b = background as i32;
        let f = foreground as i32;
        let result = match self {
            BlendMode::Average => b / 2 + f / 2,
            BlendMode::Additive => b + f,
            BlendMode::Subtractive => b - f,
            BlendMode::AddQuarter => b + f / 4,
        };
        result.clamp(0, 31) as u8
    }
}

/// Ordered dither offsets
///
/// Row-major by VRAM row, so the lookup is `TABLE[y mod 4][x mod 4]`.
pub struct DitherMatrix;

impl DitherMatrix {
    pub const TABLE: [[i8; 4]; 4] = [
        [-4, 0, -3, 1],
        [2, -2, 3, -1],
        [-3, 1, -4, 0],
        [3, -1, 2, -2],
    ];

    /// Signed offset for a coordinate
    ///
    /// # Examples
    ///
    /// ```
    /// use psx_gpu::core::gpu::DitherMatrix;
    ///
    /// assert_eq!(DitherMatrix::offset(0, 0), -4);
    /// assert_eq!(DitherMatrix::offset(1, 0), 0);
    /// assert_eq!(DitherMatrix::offset(0, 1), 2);
    /// assert_eq!(DitherMatrix::offset(5, 4), 0);
    /// ```
    #[inline(always)]
    pub fn offset(x: i32, y: i32) -> i32 {
        Self::TABLE[(y & 3) as usize][(x & 3) as usize] as i32
    }
}
