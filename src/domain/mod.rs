//! Domain model: identities, provider accesses, authentication jobs and the
//! storage ports the application layer is written against.

pub mod access;
pub mod identity;
pub mod job;
pub mod ports;
