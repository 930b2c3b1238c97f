//! AES-128-CBC decryption with the container's compiled-in key/IV.

use aes::Aes128;
use cbc::cipher::{block_padding::NoPadding, BlockDecryptMut, KeyIvInit};

use crate::constants::{AES_IV, AES_KEY};
use crate::error::DecodeError;

type Decryptor = cbc::Decryptor<Aes128>;

/// Decrypts `ciphertext` in place and returns the plaintext.
///
/// The container never strips PKCS padding — the compressor that runs after
/// this stage encodes its own length — so `ciphertext.len()` must already be
/// a multiple of the AES block size (16 bytes), and `ciphertext.len()` is
/// also the plaintext length.
pub fn decrypt(ciphertext: &[u8]) -> Result<Vec<u8>, DecodeError> {
    if ciphertext.is_empty() || ciphertext.len() % 16 != 0 {
        return Err(DecodeError::CryptoAlignment(ciphertext.len()));
    }

    let mut buf = ciphertext.to_vec();
    Decryptor::new(&AES_KEY.into(), &AES_IV.into())
        .decrypt_padded_mut::<NoPadding>(&mut buf)
        .map_err(|_| DecodeError::CryptoAlignment(ciphertext.len()))?;
    Ok(buf)
}
