// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Asset delivery: fetch, render, and post assets through the chat
//! platform with a three-tier fallback for files.

mod fetch;
pub mod render;
mod pipeline;
mod summary;

pub use fetch::{AssetFetcher, FetchedAsset};
pub use pipeline::{DeliveryPipeline, DeliveryRequest};
pub use summary::{DeliveryOutcome, format_summary};
