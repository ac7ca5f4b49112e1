// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

use crate::{Error, Result};

/// The kind of structure that is currently open in a [`GraphWriter`]
#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Frame {
    Object,
    Array,
}

/// A GraphWriter receives a depth-first walk of a structured object graph.
///
/// Names are always written before their value. Inside an array
/// the members have no names, and are instead written with
/// [`GraphWriter::write_element`] or [`GraphWriter::begin_element_object`].
///
/// Code that walks a graph should be generic over this trait
/// so that the same walk can be hashed, or rendered for humans.
pub trait GraphWriter {
    /// Open a named object.
    fn begin_object(&mut self, name: &str) -> Result<()>;

    /// Close the innermost object.
    fn end_object(&mut self) -> Result<()>;

    /// Open a named array.
    fn begin_array(&mut self, name: &str) -> Result<()>;

    /// Close the innermost array.
    fn end_array(&mut self) -> Result<()>;

    /// Open an unnamed object as the next element of the innermost array.
    fn begin_element_object(&mut self) -> Result<()>;

    fn write_int(&mut self, name: &str, value: i64) -> Result<()>;

    fn write_bool(&mut self, name: &str, value: bool) -> Result<()>;

    /// Write a named string, where `None` is written as null.
    fn write_str(&mut self, name: &str, value: Option<&str>) -> Result<()>;

    /// Write a string as the next element of the innermost array.
    fn write_element(&mut self, value: Option<&str>) -> Result<()>;

    /// Write a named array of strings, where `None` is written as null.
    ///
    /// A null array is written exactly like a null string, and
    /// is distinct from an empty one.
    fn write_str_array<I, S>(&mut self, name: &str, values: Option<I>) -> Result<()>
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(values) = values else {
            return self.write_str(name, None);
        };
        self.begin_array(name)?;
        for value in values {
            self.write_element(Some(value.as_ref()))?;
        }
        self.end_array()
    }
}

impl<W> GraphWriter for &mut W
where
    W: GraphWriter + ?Sized,
{
    fn begin_object(&mut self, name: &str) -> Result<()> {
        (**self).begin_object(name)
    }

    fn end_object(&mut self) -> Result<()> {
        (**self).end_object()
    }

    fn begin_array(&mut self, name: &str) -> Result<()> {
        (**self).begin_array(name)
    }

    fn end_array(&mut self) -> Result<()> {
        (**self).end_array()
    }

    fn begin_element_object(&mut self) -> Result<()> {
        (**self).begin_element_object()
    }

    fn write_int(&mut self, name: &str, value: i64) -> Result<()> {
        (**self).write_int(name, value)
    }

    fn write_bool(&mut self, name: &str, value: bool) -> Result<()> {
        (**self).write_bool(name, value)
    }

    fn write_str(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        (**self).write_str(name, value)
    }

    fn write_element(&mut self, value: Option<&str>) -> Result<()> {
        (**self).write_element(value)
    }
}

/// Tracks the open frames of a writer and validates each call against them.
///
/// Shared by writers so that every implementation rejects the same misuse.
#[derive(Debug, Default, Clone)]
pub(crate) struct FrameStack(Vec<Frame>);

impl FrameStack {
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn top(&self) -> Option<Frame> {
        self.0.last().copied()
    }

    /// Validate that a named value may be written here.
    pub fn check_named(&self, name: &str) -> Result<()> {
        match self.top() {
            Some(Frame::Array) => Err(Error::NamedValueInArray(name.to_string())),
            _ => Ok(()),
        }
    }

    /// Validate that an array element may be written here.
    pub fn check_element(&self) -> Result<()> {
        match self.top() {
            Some(Frame::Array) => Ok(()),
            _ => Err(Error::ElementOutsideArray),
        }
    }

    pub fn push(&mut self, frame: Frame) {
        self.0.push(frame);
    }

    /// Validate that the innermost frame is the expected one, without removing it.
    pub fn check_close(&self, expected: Frame) -> Result<()> {
        match self.top() {
            None => Err(Error::NothingOpen(expected)),
            Some(found) if found != expected => Err(Error::MismatchedClose { expected, found }),
            Some(_) => Ok(()),
        }
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.0.pop()
    }
}
