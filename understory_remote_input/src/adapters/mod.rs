// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ready-made [`PointerTargets`](crate::targets::PointerTargets) implementations.

pub mod target_tree;
