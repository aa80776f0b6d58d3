// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Brandbot integration tests.
//!
//! Mock implementations of every adapter seam plus a manually advanced
//! clock, so pipeline behavior can be tested deterministically with no
//! network, no real chat platform, and no wall clock.

pub mod clock;
pub mod mock_assets;
pub mod mock_audit;
pub mod mock_chat;
pub mod mock_classifier;

pub use clock::ManualClock;
pub use mock_assets::MockAssets;
pub use mock_audit::MockAuditSink;
pub use mock_chat::{ChatCall, MockChat, MockResponder, ScriptedFailure};
pub use mock_classifier::MockClassifier;
