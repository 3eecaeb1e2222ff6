//! Abstract storage traits for the Agora governance ledger.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the workspace depends only on the traits. Records
//! are opaque byte slabs — callers own the encoding, so backends stay
//! schema-free.

pub mod error;
pub mod meta;
pub mod proposal;
pub mod timelock;
pub mod vote;

pub use error::StoreError;
pub use meta::MetaStore;
pub use proposal::ProposalStore;
pub use timelock::TimelockStore;
pub use vote::VoteStore;
