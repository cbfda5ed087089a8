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

//! Text command streams
//!
//! A stream file holds 32-bit words in hexadecimal, separated by any
//! whitespace. `#` starts a comment that runs to the end of the line.
//!
//! ```text
//! # red fill over the top-left 16x16 block
//! 0x020000FF 00000000
//! 00100010
//! ```


use super::error::{EmulatorError, Result};
use std::path::Path;

/// Parse stream text into words
///
/// # Examples
///
/// ```
/// use psx_gpu::core::stream::parse_words;
///
/// let words = parse_words("E1000200 # dither on\n0x1F000000").unwrap();
/// assert_eq!(words, vec![0xE100_0200, 0x1F00_0000]);
/// ```
pub fn parse_words(text: &str) -> Result<Vec<u32>> {
    let mut words = Vec::new();

    for (number, line) in text.lines().enumerate() {
        let content = line.split('#').next().unwrap_or("");
        for token in content.split_whitespace() {
            let digits = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token);
            let word = u32::from_str_radix(digits, 16).map_err(|e| {
                EmulatorError::Parse(format!("line {}: '{}': {}", number + 1, token, e))
            })?;
            words.push(word);
        }
    }

    log::debug!("Parsed {} stream words", words.len());
    Ok(words)
}

/// Read and parse a stream file
pub fn load_words<P: AsRef<Path>>(path: P) -> Result<Vec<u32>> {
    let text = std::fs::read_to_string(path.as_ref())?;
    log::info!("Loaded stream from {}", path.as_ref().display());
    parse_words(&text)
}
