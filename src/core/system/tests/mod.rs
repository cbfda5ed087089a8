// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! System tests
//!
//! - `basic`: Construction and bus access
//! - `gpu_integration`: GP0 over the bus and over DMA
//! - `dma_integration`: Other channels and the interrupt line

mod dma_integration;
