// Copyright 2025 Dustin McAfee
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! # pixelbean
//!
//! Decoder and encoder for pixel-bean animation containers: a
//! self-describing binary format produced by a pixel-display cloud service,
//! combining AES-CBC, LZO1X, Zstandard, a hierarchical palette-bitstream
//! tile codec, and embedded JPEG/GIF/WebP payloads behind a single one-byte
//! format tag.
//!
//! ## Quick start
//!
//! ```no_run
//! let payload: Vec<u8> = std::fs::read("animation.bean").unwrap();
//! let bean = pixelbean::decode(&payload).unwrap();
//!
//! println!("{bean}");
//! let webp_bytes = pixelbean::encode_webp(&bean).unwrap();
//! let gif_bytes = pixelbean::encode_gif(&bean).unwrap();
//! # let _ = (webp_bytes, gif_bytes);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! decode(bytes)
//!       │
//!       ▼
//! ┌───────────────────────────┐
//! │   container dispatcher    │  reads length + format tag, closed match
//! └─────────────┬─────────────┘
//!               │
//!     ┌─────────┼─────────────────────────┐
//!     ▼                                   ▼
//! ┌────────────────────┐        ┌─────────────────────┐
//! │ transform layer     │        │ embedded-image path  │
//! │ AES-CBC / LZO / Zstd│        │ JPEG / GIF / WebP    │
//! └─────────┬───────────┘        └──────────┬──────────┘
//!           ▼                               │
//! ┌────────────────────┐                    │
//! │ palette-bitstream   │                    │
//! │ or tile-grid (fmt26)│                    │
//! └─────────┬───────────┘                    │
//!           └───────────────┬────────────────┘
//!                           ▼
//!                       PixelBean
//!                           │
//!              ┌────────────┴────────────┐
//!              ▼                         ▼
//!        encode_webp()              encode_gif()
//! ```
//!
//! Every stage is a pure function over byte slices or an owned buffer — no
//! shared caches, no process-wide mutable state. See [`DecodeOptions`] for
//! the cooperative, between-frame cancellation hook.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod bean;
mod bitreader;
mod codec;
pub mod constants;
mod container;
mod encode;
pub mod error;
mod palette;
mod riff;
mod transform;

pub use bean::{Frame, PixelBean};
pub use container::{decode, decode_with, DecodeOptions};
pub use encode::{encode_gif, encode_webp};
pub use error::{DecodeError, EncodeError, Result};
