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

//! Runtime configuration
//!
//! Configuration is read from a TOML file. Every field has a default, so an
//! empty file (or no file at all) yields the stock 1024x512 serial setup.
//!
//! ```toml
//! [gpu]
//! vram_width = 1024
//! vram_height = 512
//! dispatch = "parallel"
//! workers = 4
//!
//! [dma]
//! max_chain_hops = 65536
//!
//! [log]
//! level = "debug"
//! ```

#[cfg(test)]
mod tests;

use super::error::{ConfigError, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default VRAM width in pixels
pub const DEFAULT_VRAM_WIDTH: usize = 1024;

/// Default VRAM height in pixels
pub const DEFAULT_VRAM_HEIGHT: usize = 512;

/// Default linked-list hop limit before a chain is treated as corrupt
pub const DEFAULT_MAX_CHAIN_HOPS: u32 = 0x1_0000;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gpu: GpuConfig,
    pub dma: DmaConfig,
    pub log: LogConfig,
}

/// How the pixel pipeline executes one primitive's worth of pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Single-threaded scanline loop
    #[default]
    Serial,
    /// Row bands handed to scoped worker threads
    Parallel,
}

/// GPU settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpuConfig {
    pub vram_width: usize,
    pub vram_height: usize,
    pub dispatch: DispatchMode,
    /// Worker count for parallel dispatch (ignored when serial)
    pub workers: usize,
}

impl Default for GpuConfig {
    fn default() -> Self {
        Self {
            vram_width: DEFAULT_VRAM_WIDTH,
            vram_height: DEFAULT_VRAM_HEIGHT,
            dispatch: DispatchMode::Serial,
            workers: 4,
        }
    }
}

/// DMA arbiter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DmaConfig {
    pub max_chain_hops: u32,
}

impl Default for DmaConfig {
    fn default() -> Self {
        Self {
            max_chain_hops: DEFAULT_MAX_CHAIN_HOPS,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// One of off, error, warn, info, debug, trace
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    ///
    /// The result is validated before it is returned.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or a configuration
    /// error if it does not parse or fails validation.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loaded config from {}", path.as_ref().display());
        Self::from_toml_str(&text)
    }

    /// Reject settings the emulator cannot run with
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.gpu.vram_width == 0 {
            return Err(ConfigError::InvalidValue {
                field: "gpu.vram_width",
                reason: "must be nonzero".to_string(),
            });
        }
        if self.gpu.vram_height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "gpu.vram_height",
                reason: "must be nonzero".to_string(),
            });
        }
        if self.gpu.workers == 0 {
            return Err(ConfigError::InvalidValue {
                field: "gpu.workers",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.dma.max_chain_hops == 0 {
            return Err(ConfigError::InvalidValue {
                field: "dma.max_chain_hops",
                reason: "must be at least 1".to_string(),
            });
        }
        self.log_filter()?;
        Ok(())
    }

    /// Parsed log level
    pub fn log_filter(&self) -> std::result::Result<LevelFilter, ConfigError> {
        self.log
            .level
            .parse::<LevelFilter>()
            .map_err(|_| ConfigError::InvalidValue {
                field: "log.level",
                reason: format!("unknown level '{}'", self.log.level),
            })
    }
}
