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


//! Test fixtures for common test scenarios

use psx_gpu::core::config::{Config, DispatchMode};
use psx_gpu::core::system::System;

/// Create a System with the default configuration
#[allow(dead_code)]
pub fn create_test_system() -> System {
    System::new(&Config::default()).expect("default config is valid")
}

/// Create a System that dispatches on `workers` threads
#[allow(dead_code)]
pub fn create_parallel_system(workers: usize) -> System {
    let mut config = Config::default();
    config.gpu.dispatch = DispatchMode::Parallel;
    config.gpu.workers = workers;
    System::new(&config).expect("parallel config is valid")
}

/// Fill rectangle command
#[allow(dead_code)]
pub fn fill(color: u32, x: u32, y: u32, width: u32, height: u32) -> [u32; 3] {
    [0x0200_0000 | color, (y << 16) | x, (height << 16) | width]
}

/// Flat opaque triangle command
#[allow(dead_code)]
pub fn flat_triangle(color: u32, vertices: [(u32, u32); 3]) -> [u32; 4] {
    let [a, b, c] = vertices.map(|(x, y)| (y << 16) | x);
    [0x2000_0000 | color, a, b, c]
}

/// A scene exercising fills, shaded and blended polygons, lines, copies and
/// an upload
#[allow(dead_code)]
pub fn demo_scene() -> Vec<u32> {
    let mut words = Vec::new();
    words.extend(fill(0x20_1008, 0, 0, 320, 240));
    words.extend([0xE100_0220, 0xE300_0000, 0xE400_0000 | 319 | (239 << 10)]);
    // Gouraud triangle
    words.extend([
        0x3000_00FF,
        (20 << 16) | 160,
        0x0000_FF00,
        (220 << 16) | 40,
        0x00FF_0000,
        (220 << 16) | 280,
    ]);
    // Semi-transparent additive quad
    words.extend([
        0x2A40_4040,
        (60 << 16) | 60,
        (60 << 16) | 260,
        (180 << 16) | 60,
        (180 << 16) | 260,
    ]);
    // Gouraud polyline
    words.extend([
        0x5800_FFFF,
        (10 << 16) | 10,
        0x00FF_00FF,
        (10 << 16) | 310,
        0x0000_FFFF,
        (230 << 16) | 310,
        0x5555_5555,
    ]);
    // Full drawing area again, then a 4x2 upload and a copy of the
    // top-left block
    words.extend([0xE300_0000, 0xE400_0000 | 1023 | (511 << 10)]);
    words.extend([0xA000_0000, (250 << 16) | 400, (2 << 16) | 4]);
    words.extend([0x7FFF_001F, 0x03E0_7C00, 0x8000_0421, 0x1234_5678]);
    words.extend([0x8000_0000, 0, (300 << 16) | 400, (64 << 16) | 64]);
    words
}
