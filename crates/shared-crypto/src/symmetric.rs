//! # Symmetric Encryption
//!
//! AES-128 in two shapes:
//!
//! - **Single block**: one 16-byte block encrypted independently (ECB on a
//!   single block), used for identifier derivation.
//! - **CTR keystream**: AES-128-CTR with a full 128-bit big-endian counter
//!   block as IV, used for metadata encryption.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit, KeyIvInit, StreamCipher};
use aes::Aes128;

use crate::SubKey;

/// AES block length in bytes.
pub const BLOCK_LENGTH: usize = 16;

type Aes128Ctr = ctr::Ctr128BE<Aes128>;

/// AES-128 keyed once, encrypting independent blocks.
#[derive(Clone)]
pub struct BlockCipher {
    cipher: Aes128,
}

impl BlockCipher {
    /// Expand the key schedule for `key`.
    pub fn new(key: &SubKey) -> Self {
        Self {
            cipher: Aes128::new(GenericArray::from_slice(key.as_bytes())),
        }
    }

    /// Encrypt a single block.
    pub fn encrypt_block(&self, block: &[u8; BLOCK_LENGTH]) -> [u8; BLOCK_LENGTH] {
        let mut buf = aes::Block::clone_from_slice(block);
        self.cipher.encrypt_block(&mut buf);
        let mut out = [0u8; BLOCK_LENGTH];
        out.copy_from_slice(&buf);
        out
    }
}

impl std::fmt::Debug for BlockCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BlockCipher(..)")
    }
}

/// XOR `buf` in place with the AES-128-CTR keystream for (`key`, `iv`).
///
/// Encryption and decryption are the same operation.
pub fn apply_ctr_keystream(key: &SubKey, iv: &[u8; BLOCK_LENGTH], buf: &mut [u8]) {
    let mut cipher = Aes128Ctr::new(
        GenericArray::from_slice(key.as_bytes()),
        GenericArray::from_slice(iv),
    );
    cipher.apply_keystream(buf);
}
