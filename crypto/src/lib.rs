//! Hashing for the Agora governance engine.
//!
//! Proposal identifiers and description hashes are Blake2b-256 digests, so
//! content addressing is a pure function of the hashed bytes.

pub mod hash;

pub use hash::{blake2b_256, blake2b_256_multi, hash_description};
