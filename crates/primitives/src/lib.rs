//! # NeoFS Primitives
//!
//! Fundamental types shared by the NeoFS morph governance contracts.
//!
//! - [`PublicKey`]: 33-byte compressed public key identifying inner ring
//!   members and storage nodes
//! - [`Hash256`]: 32-byte SHA-256 digest used as a ballot decision identifier
//!
//! ## Design Principles
//!
//! - **Zero dependencies on other neofs-* crates**
//! - **Byte-exact**: keys and digests keep the wire representation the morph
//!   chain contracts operate on
//!
//! ## Example
//!
//! ```rust
//! use neofs_primitives::{Hash256, PublicKey};
//!
//! let key = PublicKey::parse(
//!     "02b3622bf4017bdfe317c58aed5f4c753f206b7db896046fa7d774bbc4bf7f8dc2",
//! ).unwrap();
//! assert_eq!(key.as_bytes()[0], 0x02);
//!
//! let digest = Hash256::sha256(b"epoch");
//! assert!(!digest.is_zero());
//! ```

pub mod constants;
pub mod error;
pub mod hash;
pub mod public_key;

// Re-exports
pub use constants::*;
pub use error::{PrimitiveError, PrimitiveResult};
pub use hash::Hash256;
pub use public_key::PublicKey;
