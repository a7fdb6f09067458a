//! # Shared Crypto - Symmetric Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `kdf` | HKDF-SHA256 | Sub-key derivation from key material |
//! | `symmetric` | AES-128 (single block), AES-128-CTR | Identifier encryption, metadata keystream |
//!
//! ## Security Properties
//!
//! - **Sub-keys** are zeroized on drop and never printed.
//! - **AES-128** is used in single-block mode only; no chaining state is kept
//!   between blocks.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod kdf;
pub mod symmetric;

// Re-exports
pub use errors::CryptoError;
pub use kdf::{derive_subkey, hkdf_sha256, SubKey, SUBKEY_LENGTH};
pub use symmetric::{apply_ctr_keystream, BlockCipher, BLOCK_LENGTH};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
