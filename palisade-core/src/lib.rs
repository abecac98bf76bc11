//! Core functionality for the palisade project
//!
//! This crate contains the domain types and decision logic for login
//! protection: the append-only attempt ledger abstraction, the credential
//! verifier, the lockout policy engine, the login orchestrator, and the
//! batch report builder.
//!
//! Lock and ban state is never stored: it is always derived from the
//! attempt ledger plus a [`LockoutConfig`], so it cannot go stale.
//!
//! Storage backends implement the traits in [`repositories`]; application
//! code normally goes through the `palisade` facade crate rather than using
//! this crate directly.

pub mod account;
pub mod attempt;
pub mod config;
pub mod crypto;
pub mod error;
pub mod repositories;
pub mod services;

pub use account::{Account, AccountId, NewAccount};
pub use attempt::{AttemptRecord, NewAttempt};
pub use config::LockoutConfig;
pub use error::Error;
pub use services::login::{LoginOutcome, RejectionReason};
pub use services::report::LockoutReport;
