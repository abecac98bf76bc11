//! Service layer for the login engine's decision logic
//!
//! Services encapsulate policy: the lockout engine, the login orchestrator,
//! and the batch report builder. They are generic over the repository
//! traits and hold no mutable state of their own, so they are thread-safe
//! and every decision is derived freshly from ledger contents.

pub mod lockout;
pub mod login;
pub mod report;

pub use lockout::LockoutService;
pub use login::LoginService;
pub use report::ReportService;

#[cfg(test)]
pub(crate) mod testing;
