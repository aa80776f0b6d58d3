// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the external collaborators.

pub mod assets;
pub mod audit;
pub mod chat;
pub mod classify;
pub mod clock;

pub use assets::{AssetStore, DownloadOptions};
pub use audit::AuditSink;
pub use chat::{ChatClient, CommandResponder};
pub use classify::IntentClassifier;
pub use clock::{Clock, SystemClock};
