// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Reference client tests
