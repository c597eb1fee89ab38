//! Storage backends
//!
//! The crate ships one reference backend: concurrent in-memory maps, suited
//! to tests and single-process deployments. Production deployments implement
//! the repository traits over their own stores (the counter store maps
//! directly onto a Redis `INCR` + `EXPIRE NX` pair or equivalent).

pub mod memory;

pub use memory::{MemoryAttemptCounterRepository, MemoryPasswordRepository, MemoryUserRepository};
