// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Shared helpers for integration tests

pub mod assertions;
pub mod fixtures;
