// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

use crate::writer::FrameStack;
use crate::{
    DigestEngine, Error, Fingerprint, FingerprintConfig, Frame, GraphWriter, Result, RingDigest,
};

#[cfg(test)]
#[path = "./encoder_test.rs"]
mod encoder_test;

/// The default number of bytes buffered before they are digested
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

const OBJECT_START: u8 = b'{';
const OBJECT_END: u8 = b'}';
const ARRAY_START: u8 = b'[';
const ARRAY_END: u8 = b']';
const QUOTE: u8 = b'"';
const COLON: u8 = b':';
const SEPARATOR: u8 = b',';
/// Written in place of a string or array that is not present
pub const NULL_MARKER: u8 = 0x00;

// disjoint from NULL_MARKER and QUOTE
const TRUE_BYTE: u8 = b't';
const FALSE_BYTE: u8 = b'f';

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum State {
    Writing,
    Sealed,
}

/// Encodes a graph into its canonical byte form and digests it.
///
/// Bytes are collected in a fixed-size buffer and handed to the
/// digest engine each time it fills, so memory use does not grow
/// with the size of the graph. The canonical form is:
///
/// - names and strings: `"` + utf-8 bytes + `"` (no escaping)
/// - null strings and arrays: a single [`NULL_MARKER`] byte
/// - integers: 8 raw big-endian bytes
/// - booleans: a single `t` or `f` byte
/// - objects: `"name":{` ... `},`
/// - arrays: `"name":[` + each element followed by `,` + `],`
///
/// Every named value is followed by `,`, including the outermost object.
/// This layout must not change, or every previously stored
/// fingerprint is invalidated.
pub struct CanonicalEncoder<D = RingDigest>
where
    D: DigestEngine,
{
    digest: D,
    buffer: Vec<u8>,
    cursor: usize,
    frames: FrameStack,
    state: State,
    bytes_written: u64,
}

impl CanonicalEncoder<RingDigest> {
    /// Create an encoder with the given settings.
    pub fn from_config(config: &FingerprintConfig) -> Result<Self> {
        Self::with_buffer_size(RingDigest::new(config.algorithm), config.buffer_size)
    }
}

impl Default for CanonicalEncoder<RingDigest> {
    fn default() -> Self {
        Self::new(RingDigest::default())
    }
}

impl<D> CanonicalEncoder<D>
where
    D: DigestEngine,
{
    pub fn new(digest: D) -> Self {
        Self {
            digest,
            buffer: vec![0; DEFAULT_BUFFER_SIZE],
            cursor: 0,
            frames: FrameStack::default(),
            state: State::Writing,
            bytes_written: 0,
        }
    }

    /// Create an encoder that buffers `buffer_size` bytes between digest updates.
    pub fn with_buffer_size(digest: D, buffer_size: usize) -> Result<Self> {
        if buffer_size == 0 {
            return Err(Error::InvalidBufferSize(buffer_size));
        }
        let mut encoder = Self::new(digest);
        encoder.buffer = vec![0; buffer_size];
        Ok(encoder)
    }

    /// The number of objects and arrays currently open
    pub fn depth(&self) -> usize {
        self.frames.depth()
    }

    pub fn is_sealed(&self) -> bool {
        self.state == State::Sealed
    }

    /// The total number of canonical bytes produced so far
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    /// Flush remaining bytes and produce the fingerprint of everything written.
    pub fn finalize(mut self) -> Result<Fingerprint> {
        self.finalize_mut()
    }

    /// Like [`Self::finalize`], but leaves the sealed encoder in place.
    ///
    /// Any call after the first returns [`Error::Sealed`].
    pub fn finalize_mut(&mut self) -> Result<Fingerprint> {
        self.ensure_writing()?;
        // a failed flush or digest still leaves the session sealed
        self.state = State::Sealed;
        if self.depth() > 0 {
            tracing::warn!(
                depth = self.depth(),
                "fingerprint finalized with unbalanced nesting"
            );
        }
        self.flush()?;
        let digest = self.digest.finalize()?;
        tracing::debug!(
            algorithm = self.digest.algorithm(),
            bytes = self.bytes_written,
            "fingerprint finalized"
        );
        Ok(Fingerprint::new_unchecked(digest))
    }

    fn ensure_writing(&self) -> Result<()> {
        match self.state {
            State::Writing => Ok(()),
            State::Sealed => Err(Error::Sealed),
        }
    }

    fn flush(&mut self) -> Result<()> {
        if self.cursor == 0 {
            return Ok(());
        }
        tracing::trace!(bytes = self.cursor, "flushing fingerprint buffer");
        let cursor = std::mem::take(&mut self.cursor);
        self.digest.absorb(&self.buffer[..cursor])
    }

    fn write(&mut self, mut bytes: &[u8]) -> Result<()> {
        let total = bytes.len() as u64;
        while !bytes.is_empty() {
            let available = self.buffer.len() - self.cursor;
            let count = available.min(bytes.len());
            self.buffer[self.cursor..self.cursor + count].copy_from_slice(&bytes[..count]);
            self.cursor += count;
            bytes = &bytes[count..];
            if self.cursor == self.buffer.len() {
                self.flush()?;
            }
        }
        self.bytes_written += total;
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.write(&[byte])
    }

    fn write_string(&mut self, value: Option<&str>) -> Result<()> {
        match value {
            None => self.write_byte(NULL_MARKER),
            Some(value) => {
                self.write_byte(QUOTE)?;
                self.write(value.as_bytes())?;
                self.write_byte(QUOTE)
            }
        }
    }

    fn write_name(&mut self, name: &str) -> Result<()> {
        self.write_string(Some(name))?;
        self.write_byte(COLON)
    }

    /// Validate and write the name for a value at the current position.
    fn start_named(&mut self, name: &str) -> Result<()> {
        self.ensure_writing()?;
        self.frames.check_named(name)?;
        self.write_name(name)
    }

    fn close(&mut self, frame: Frame, marker: u8) -> Result<()> {
        self.ensure_writing()?;
        self.frames.check_close(frame)?;
        self.write(&[marker, SEPARATOR])?;
        self.frames.pop();
        Ok(())
    }
}

impl<D> GraphWriter for CanonicalEncoder<D>
where
    D: DigestEngine,
{
    fn begin_object(&mut self, name: &str) -> Result<()> {
        self.start_named(name)?;
        self.write_byte(OBJECT_START)?;
        self.frames.push(Frame::Object);
        Ok(())
    }

    fn end_object(&mut self) -> Result<()> {
        self.close(Frame::Object, OBJECT_END)
    }

    fn begin_array(&mut self, name: &str) -> Result<()> {
        self.start_named(name)?;
        self.write_byte(ARRAY_START)?;
        self.frames.push(Frame::Array);
        Ok(())
    }

    fn end_array(&mut self) -> Result<()> {
        self.close(Frame::Array, ARRAY_END)
    }

    fn begin_element_object(&mut self) -> Result<()> {
        self.ensure_writing()?;
        self.frames.check_element()?;
        self.write_byte(OBJECT_START)?;
        self.frames.push(Frame::Object);
        Ok(())
    }

    fn write_int(&mut self, name: &str, value: i64) -> Result<()> {
        self.start_named(name)?;
        self.write(&value.to_be_bytes())?;
        self.write_byte(SEPARATOR)
    }

    fn write_bool(&mut self, name: &str, value: bool) -> Result<()> {
        self.start_named(name)?;
        let byte = if value { TRUE_BYTE } else { FALSE_BYTE };
        self.write(&[byte, SEPARATOR])
    }

    fn write_str(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        self.start_named(name)?;
        self.write_string(value)?;
        self.write_byte(SEPARATOR)
    }

    fn write_element(&mut self, value: Option<&str>) -> Result<()> {
        self.ensure_writing()?;
        self.frames.check_element()?;
        self.write_string(value)?;
        self.write_byte(SEPARATOR)
    }
}

impl<D> Drop for CanonicalEncoder<D>
where
    D: DigestEngine,
{
    fn drop(&mut self) {
        if !self.is_sealed() {
            tracing::trace!("fingerprint session dropped before being finalized");
        }
        self.digest.release();
    }
}

impl<D> std::fmt::Debug for CanonicalEncoder<D>
where
    D: DigestEngine,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanonicalEncoder")
            .field("algorithm", &self.digest.algorithm())
            .field("buffer_size", &self.buffer.len())
            .field("buffered", &self.cursor)
            .field("depth", &self.depth())
            .field("state", &self.state)
            .finish()
    }
}
