// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Brandbot's command orchestrator: intake, intent, quota, confirmation,
//! and delivery wired together behind the platform adapter seams.

pub mod confirm;
pub mod handler;
pub mod token;

pub use confirm::{DELIVER_ACTION_PREFIX, DeliveryScope};
pub use handler::CommandHandler;
pub use token::ContinuationToken;
