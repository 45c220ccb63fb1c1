//! Application layer orchestrating the simulated backend.
//!
//! Requests pass through the `AuthorizationChain` first; the resolved caller
//! is then handed to the `SessionManager` or the `JobEngine`. `BankingServer`
//! ties these together behind one operation surface.

pub mod authorization;
pub mod jobs;
pub mod server;
pub mod session;
