// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

use serde_json::{Map, Value};

use crate::writer::FrameStack;
use crate::{Error, Frame, GraphWriter, Result};

#[cfg(test)]
#[path = "./json_test.rs"]
mod json_test;

/// A partially built structure, waiting to be closed
#[derive(Debug)]
enum Open {
    Object { name: Option<String>, map: Map<String, Value> },
    Array { name: String, items: Vec<Value> },
}

/// Renders a graph walk as human-readable json.
///
/// This accepts exactly the same calls as the
/// [`crate::CanonicalEncoder`], so it can show what would be
/// hashed when a fingerprint changes unexpectedly. Values written
/// outside of any object are collected into an implicit root object.
///
/// Members keep the order they were written in. Json objects cannot
/// hold the same key twice, so writing a name that the enclosing
/// object already holds fails with [`crate::Error::DuplicateName`].
#[derive(Debug, Default)]
pub struct JsonWriter {
    root: Map<String, Value>,
    open: Vec<Open>,
    frames: FrameStack,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of objects and arrays currently open
    pub fn depth(&self) -> usize {
        self.frames.depth()
    }

    /// Return the document written so far.
    ///
    /// Anything still open is closed first.
    pub fn into_value(mut self) -> Value {
        while let Some(open) = self.open.pop() {
            self.frames.pop();
            self.insert_closed(open);
        }
        Value::Object(self.root)
    }

    /// Render the document written so far as indented json.
    pub fn into_pretty_string(self) -> String {
        // serializing a Value into memory cannot fail
        serde_json::to_string_pretty(&self.into_value()).unwrap_or_default()
    }

    /// The object that named values are currently written into
    fn current_map(&self) -> &Map<String, Value> {
        match self.open.last() {
            Some(Open::Object { map, .. }) => map,
            Some(Open::Array { .. }) | None => &self.root,
        }
    }

    /// Validate a name for a value at the current position.
    fn start_named(&self, name: &str) -> Result<()> {
        self.frames.check_named(name)?;
        if self.current_map().contains_key(name) {
            return Err(Error::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    fn insert_named(&mut self, name: &str, value: Value) {
        let map = match self.open.last_mut() {
            Some(Open::Object { map, .. }) => map,
            // arrays are rejected by the frame checks before we get here
            Some(Open::Array { .. }) | None => &mut self.root,
        };
        map.insert(name.to_string(), value);
    }

    fn push_element(&mut self, value: Value) {
        if let Some(Open::Array { items, .. }) = self.open.last_mut() {
            items.push(value);
        }
    }

    fn insert_closed(&mut self, open: Open) {
        match open {
            Open::Object {
                name: Some(name),
                map,
            } => self.insert_named(&name, Value::Object(map)),
            Open::Object { name: None, map } => self.push_element(Value::Object(map)),
            Open::Array { name, items } => self.insert_named(&name, Value::Array(items)),
        }
    }

    fn close(&mut self, frame: Frame) -> Result<()> {
        self.frames.check_close(frame)?;
        self.frames.pop();
        if let Some(open) = self.open.pop() {
            self.insert_closed(open);
        }
        Ok(())
    }
}

impl GraphWriter for JsonWriter {
    fn begin_object(&mut self, name: &str) -> Result<()> {
        self.start_named(name)?;
        self.frames.push(Frame::Object);
        self.open.push(Open::Object {
            name: Some(name.to_string()),
            map: Map::new(),
        });
        Ok(())
    }

    fn end_object(&mut self) -> Result<()> {
        self.close(Frame::Object)
    }

    fn begin_array(&mut self, name: &str) -> Result<()> {
        self.start_named(name)?;
        self.frames.push(Frame::Array);
        self.open.push(Open::Array {
            name: name.to_string(),
            items: Vec::new(),
        });
        Ok(())
    }

    fn end_array(&mut self) -> Result<()> {
        self.close(Frame::Array)
    }

    fn begin_element_object(&mut self) -> Result<()> {
        self.frames.check_element()?;
        self.frames.push(Frame::Object);
        self.open.push(Open::Object {
            name: None,
            map: Map::new(),
        });
        Ok(())
    }

    fn write_int(&mut self, name: &str, value: i64) -> Result<()> {
        self.start_named(name)?;
        self.insert_named(name, Value::from(value));
        Ok(())
    }

    fn write_bool(&mut self, name: &str, value: bool) -> Result<()> {
        self.start_named(name)?;
        self.insert_named(name, Value::Bool(value));
        Ok(())
    }

    fn write_str(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        self.start_named(name)?;
        self.insert_named(name, value.map(Value::from).unwrap_or(Value::Null));
        Ok(())
    }

    fn write_element(&mut self, value: Option<&str>) -> Result<()> {
        self.frames.check_element()?;
        self.push_element(value.map(Value::from).unwrap_or(Value::Null));
        Ok(())
    }
}
