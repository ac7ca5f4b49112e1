// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

//! Canonical fingerprints of structured object graphs.
//!
//! A caller walks its data depth-first through the [`GraphWriter`]
//! protocol. The [`CanonicalEncoder`] turns that walk into a fixed
//! byte layout and streams it into a [`DigestEngine`], producing a
//! [`Fingerprint`] that only changes when the walk changes. This is
//! used to skip expensive resolution when its inputs are unchanged.

mod config;
mod digest;
mod encoder;
mod error;
mod fingerprint;
mod json;
pub mod prelude;
mod writer;

pub use config::{Config, FingerprintConfig, get_config, load_config, load_config_from_env};
pub use digest::{DigestAlgorithm, DigestEngine, RingDigest};
pub use encoder::{CanonicalEncoder, DEFAULT_BUFFER_SIZE, NULL_MARKER};
pub use error::{Error, Result};
pub use fingerprint::{Fingerprint, Fingerprintable};
pub use json::JsonWriter;
pub use writer::{Frame, GraphWriter};
