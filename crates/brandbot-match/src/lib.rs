// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Variant matching and category filtering of brand assets.

pub mod matcher;
pub mod metadata;

pub use matcher::filter_candidates;
pub use metadata::AssetMetadata;
