// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{CanonicalEncoder, Error, FingerprintConfig, GraphWriter, JsonWriter, Result};

#[cfg(test)]
#[path = "./fingerprint_test.rs"]
mod fingerprint_test;

/// The digest of a canonically encoded object graph.
///
/// Two fingerprints are equal when the same sequence of
/// writes was made to produce them. The text form depends
/// on the digest engine, and is base64 for the default.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint(String);

impl Fingerprint {
    pub(crate) fn new_unchecked(digest: String) -> Self {
        Self(digest)
    }

    /// Parse a previously stored fingerprint.
    pub fn parse<S: Into<String>>(source: S) -> Result<Self> {
        let source = source.into();
        if source.is_empty() {
            return Err(Error::EmptyFingerprint);
        }
        Ok(Self(source))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Fingerprint {
    type Err = Error;

    fn from_str(source: &str) -> Result<Self> {
        Self::parse(source)
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = Error;

    fn try_from(source: String) -> Result<Self> {
        Self::parse(source)
    }
}

impl From<Fingerprint> for String {
    fn from(fingerprint: Fingerprint) -> Self {
        fingerprint.0
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Fingerprint {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Fingerprint {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Fingerprintable is a type that can walk itself into a [`GraphWriter`]
pub trait Fingerprintable {
    /// Write this object depth-first into the given writer.
    fn write_graph<W: GraphWriter>(&self, writer: &mut W) -> Result<()>;

    /// Compute the fingerprint of this instance using the current config.
    fn fingerprint(&self) -> Result<Fingerprint> {
        let config = crate::get_config()?;
        self.fingerprint_with(&config.fingerprint)
    }

    /// Compute the fingerprint of this instance with the given settings.
    fn fingerprint_with(&self, config: &FingerprintConfig) -> Result<Fingerprint> {
        let mut encoder = CanonicalEncoder::from_config(config)?;
        self.write_graph(&mut encoder)?;
        encoder.finalize()
    }

    /// Render the graph of this instance as json, for debugging.
    fn to_json(&self) -> Result<serde_json::Value> {
        let mut writer = JsonWriter::new();
        self.write_graph(&mut writer)?;
        Ok(writer.into_value())
    }
}

impl<T> Fingerprintable for &T
where
    T: Fingerprintable + ?Sized,
{
    fn write_graph<W: GraphWriter>(&self, writer: &mut W) -> Result<()> {
        (**self).write_graph(writer)
    }
}

impl<T> Fingerprintable for Box<T>
where
    T: Fingerprintable + ?Sized,
{
    fn write_graph<W: GraphWriter>(&self, writer: &mut W) -> Result<()> {
        (**self).write_graph(writer)
    }
}
