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

//! Core emulation components
//!
//! This module contains the hardware emulated by this crate:
//! - GPU (VRAM store, pixel pipeline, GP0 command decoder, GP1 control port)
//! - DMA arbiter (bus routing, channel sequencing, completion flags)
//! - Reference bus clients (scratchpad, disc-controller data FIFO, main memory)
//! - Text command stream parsing
//! - System integration

pub mod clients;
pub mod config;
pub mod dma;
pub mod error;
pub mod gpu;
pub mod stream;
pub mod system;

// Re-export commonly used types
pub use config::Config;
pub use dma::DmaArbiter;
pub use error::{DmaError, EmulatorError, GpuError, Result};
pub use gpu::GPU;
pub use system::System;
