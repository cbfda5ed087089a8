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

//! PlayStation GPU pixel pipeline and DMA arbiter
//!
//! This library emulates the fixed-function drawing hardware of the PlayStation:
//! the VRAM store, the per-pixel pipeline (dithering, semi-transparency, mask
//! bit handling and clipping), the GP0/GP1 command ports, and the DMA arbiter
//! that routes bus accesses and sequences channel transfers into the GPU.
//!
//! # Example
//!
//! ```
//! use psx_gpu::core::config::Config;
//! use psx_gpu::core::system::System;
//!
//! let mut system = System::new(&Config::default()).unwrap();
//!
//! // Monochrome opaque 16x16 rectangle at (8, 8), pure red
//! system.write_word(0x1F80_1810, 0x7800_00FF).unwrap();
//! system.write_word(0x1F80_1810, 0x0008_0008).unwrap();
//!
//! let pixel = system.gpu().borrow().read_vram(8, 8);
//! assert_eq!(pixel.r(), 31);
//! ```

pub mod core;
