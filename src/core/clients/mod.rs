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

//! Reference bus clients
//!
//! Small devices that fill the arbiter's CPU and disc-controller slots so
//! the system can be assembled and driven end to end.

pub mod scratchpad;
pub mod sector_buffer;

#[cfg(test)]
mod tests;

pub use scratchpad::Scratchpad;
pub use sector_buffer::SectorBuffer;
