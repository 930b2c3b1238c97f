//! Cryptographic and compression primitives used by the transform stage.
//!
//! Each primitive is a pure function over byte slices: no shared state, no
//! allocation beyond its output buffer. The container dispatcher composes
//! these per the per-tag pipeline table (AES-CBC, then optionally LZO or
//! Zstd, or neither).

mod aes_cbc;
mod lzo;
mod zstd_frame;

pub use aes_cbc::decrypt;
pub use lzo::decompress as lzo_decompress;
pub use zstd_frame::decompress as zstd_decompress;
