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

/// Emulator error types
use thiserror::Error;

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, EmulatorError>;

/// Main error type for the emulator
#[derive(Error, Debug)]
pub enum EmulatorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),

    #[error("DMA error: {0}")]
    Dma(#[from] DmaError),
}

/// GPU-specific error types
#[derive(Error, Debug)]
pub enum GpuError {
    #[error("Invalid GPU register offset: 0x{offset:X}")]
    InvalidRegister { offset: u32 },

    #[error("Unsupported {size}-byte access to GPU register at offset 0x{offset:X}")]
    UnsupportedAccess { offset: u32, size: u8 },
}

/// DMA arbiter error types
#[derive(Error, Debug)]
pub enum DmaError {
    #[error("No bus target for address 0x{address:08X}")]
    AddressError { address: u32 },

    #[error("Unaligned bus access: {size}-byte access at 0x{address:08X}")]
    UnalignedAccess { address: u32, size: u8 },

    #[error("No {client} client bound to the arbiter")]
    ClientNotBound { client: &'static str },

    #[error("{client} client is already bound to the arbiter")]
    ClientAlreadyBound { client: &'static str },

    #[error("Invalid DMA channel: {channel} (valid range: 0-6)")]
    InvalidChannel { channel: usize },
}

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Malformed config file: {0}")]
    Toml(#[from] toml::de::Error),
}
