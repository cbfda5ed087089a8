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

//! GPU module tests
//!
//! Tests are organized into the following modules:
//! - `basic`: Construction, GPUSTAT and register access
//! - `pipeline`: Per-pixel shading and transfer gating
//! - `properties`: Property tests over the pixel pipeline
//! - `vram`: VRAM store addressing and wrap-around
//! - `gp0_commands`: Decoder state machine and drawing settings
//! - `gp1_commands`: Control commands and info queries
//! - `rendering`: Polygons, lines and rectangles
//! - `transfers`: Fill, CPU/VRAM loads, copies and readback
//! - `dispatch`: Serial and parallel dispatch

mod gp1_commands;
mod pipeline;
mod transfers;

use super::GPU;

/// Feed a command stream to GP0
pub(super) fn submit(gpu: &mut GPU, words: &[u32]) {
    for &word in words {
        gpu.write_gp0(word);
    }
}
