// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

use data_encoding::BASE64;
use ring::digest::{Context, SHA256, SHA384, SHA512, SHA512_256};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[cfg(test)]
#[path = "./digest_test.rs"]
mod digest_test;

/// A digest engine accumulates bytes and produces a textual digest of them.
///
/// Engines are single-use: once [`DigestEngine::finalize`] has been called
/// any further call must fail with [`Error::DigestFinalized`] rather than
/// produce a digest of partial or mixed input.
pub trait DigestEngine {
    /// The name of the algorithm, for logging
    fn algorithm(&self) -> &str;

    /// Append the given bytes to the running digest computation.
    fn absorb(&mut self, bytes: &[u8]) -> Result<()>;

    /// Complete the computation and return the encoded digest.
    fn finalize(&mut self) -> Result<String>;

    /// Release any underlying cryptographic state.
    ///
    /// This is called when the owning session is dropped, whether
    /// or not the digest was finalized, and must be safe to call
    /// more than once.
    fn release(&mut self) {}
}

impl<T> DigestEngine for Box<T>
where
    T: DigestEngine + ?Sized,
{
    fn algorithm(&self) -> &str {
        (**self).algorithm()
    }

    fn absorb(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).absorb(bytes)
    }

    fn finalize(&mut self) -> Result<String> {
        (**self).finalize()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// The hash algorithms available through [`RingDigest`]
#[derive(
    Debug,
    Default,
    Deserialize,
    Serialize,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
pub enum DigestAlgorithm {
    #[serde(rename = "sha256")]
    #[strum(serialize = "sha256")]
    Sha256,
    #[serde(rename = "sha384")]
    #[strum(serialize = "sha384")]
    Sha384,
    #[default]
    #[serde(rename = "sha512")]
    #[strum(serialize = "sha512")]
    Sha512,
    #[serde(rename = "sha512-256")]
    #[strum(serialize = "sha512-256")]
    Sha512_256,
}

impl DigestAlgorithm {
    fn ring_algorithm(self) -> &'static ring::digest::Algorithm {
        match self {
            Self::Sha256 => &SHA256,
            Self::Sha384 => &SHA384,
            Self::Sha512 => &SHA512,
            Self::Sha512_256 => &SHA512_256,
        }
    }

    /// The number of raw bytes in a digest produced by this algorithm
    pub fn output_len(self) -> usize {
        self.ring_algorithm().output_len()
    }
}

/// A [`DigestEngine`] backed by ring, producing base64 text.
pub struct RingDigest {
    algorithm: DigestAlgorithm,
    ctx: Option<Context>,
}

impl RingDigest {
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        Self {
            algorithm,
            ctx: Some(Context::new(algorithm.ring_algorithm())),
        }
    }

    /// A SHA-512 engine, the default for fingerprints
    pub fn sha512() -> Self {
        Self::new(DigestAlgorithm::Sha512)
    }

    /// True once this engine has been finalized or released
    pub fn is_finalized(&self) -> bool {
        self.ctx.is_none()
    }
}

impl Default for RingDigest {
    fn default() -> Self {
        Self::new(DigestAlgorithm::default())
    }
}

impl std::fmt::Debug for RingDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingDigest")
            .field("algorithm", &self.algorithm)
            .field("finalized", &self.is_finalized())
            .finish()
    }
}

impl DigestEngine for RingDigest {
    fn algorithm(&self) -> &str {
        self.algorithm.into()
    }

    fn absorb(&mut self, bytes: &[u8]) -> Result<()> {
        let ctx = self.ctx.as_mut().ok_or(Error::DigestFinalized)?;
        ctx.update(bytes);
        Ok(())
    }

    fn finalize(&mut self) -> Result<String> {
        let ctx = self.ctx.take().ok_or(Error::DigestFinalized)?;
        Ok(BASE64.encode(ctx.finish().as_ref()))
    }

    fn release(&mut self) {
        self.ctx = None;
    }
}
