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

//! GP1 control port
//!
//! - 0x00-0x04: control (reset, command buffer reset, IRQ ack, display
//!   enable, DMA direction)
//! - 0x05-0x08: display configuration
//! - 0x10-0x1F: GPU info readback through GPUREAD

mod control;
mod display;
