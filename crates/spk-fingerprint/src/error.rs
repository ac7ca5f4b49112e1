// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

use miette::Diagnostic;
use thiserror::Error;

use crate::Frame;

#[derive(Diagnostic, Debug, Error)]
#[diagnostic(
    url(
        "https://spkenv.dev/error_codes#{}",
        self.code().unwrap_or_else(|| Box::new("spk::generic"))
    )
)]
pub enum Error {
    #[error("Fingerprint buffer size must be at least one byte, got {0}")]
    #[diagnostic(
        code("spk::fingerprint::invalid_buffer_size"),
        help("Check the fingerprint.buffer_size setting or SPK_FINGERPRINT_BUFFER_SIZE")
    )]
    InvalidBufferSize(usize),
    #[error("A fingerprint cannot be an empty string")]
    EmptyFingerprint,

    #[error("Fingerprint session is already sealed, no further writes are allowed")]
    #[diagnostic(code("spk::fingerprint::sealed"))]
    Sealed,
    #[error("Cannot close {0}, nothing is open")]
    #[diagnostic(code("spk::fingerprint::nothing_open"))]
    NothingOpen(Frame),
    #[error("Cannot close {expected}, the innermost open value is {found}")]
    #[diagnostic(code("spk::fingerprint::mismatched_close"))]
    MismatchedClose { expected: Frame, found: Frame },
    #[error("Named value '{0}' cannot be written directly inside an array")]
    #[diagnostic(
        code("spk::fingerprint::named_value_in_array"),
        help("Array members are written as elements, or wrapped in an element object")
    )]
    NamedValueInArray(String),
    #[error("Name '{0}' was already written in this object")]
    #[diagnostic(
        code("spk::fingerprint::duplicate_name"),
        help("Each member of an object needs a distinct name to be rendered as json")
    )]
    DuplicateName(String),
    #[error("Array elements can only be written inside an open array")]
    #[diagnostic(code("spk::fingerprint::element_outside_array"))]
    ElementOutsideArray,
    #[error("Digest has already been finalized")]
    #[diagnostic(code("spk::fingerprint::digest_finalized"))]
    DigestFinalized,
    #[error("Digest failed: {0}")]
    Digest(String),

    #[error("Cannot load config, lock has been poisoned: {0}")]
    LockPoisonedRead(String),
    #[error("Cannot update config, lock has been poisoned: {0}")]
    LockPoisonedWrite(String),
    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
