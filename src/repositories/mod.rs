//! Repository traits for data access layer
//!
//! These traits are the storage seam of the crate. The services hold no
//! persistent state of their own; everything durable lives behind a
//! repository, which keeps the guard safely replicable across processes and
//! makes test doubles trivial to supply.

pub mod attempts;
pub mod password;
pub mod user;

pub use attempts::AttemptCounterRepository;
pub use password::PasswordRepository;
pub use user::UserRepository;
