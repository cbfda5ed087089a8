// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Unit tests for the DMA arbiter organized by category

mod arbitration;
mod helpers;
