//! LMDB storage backend for the Agora governance ledger.
//!
//! Implements the storage traits from `agora-store` using the `heed` LMDB
//! bindings. Each logical store maps to one database within a single
//! environment.

pub mod environment;
pub mod error;
pub mod governance;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use governance::LmdbGovernanceStore;
