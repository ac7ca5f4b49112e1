// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

use rstest::rstest;
use serde_json::json;

use super::JsonWriter;
use crate::{Error, Frame, GraphWriter};

#[rstest]
fn test_json_writer_renders_walk() {
    let mut writer = JsonWriter::new();
    writer.begin_object("project").unwrap();
    writer.write_int("version", 2).unwrap();
    writer.write_bool("locked", true).unwrap();
    writer.write_str("name", Some("my-pkg")).unwrap();
    writer.write_str("description", None).unwrap();
    writer.write_str_array("sources", Some(["a", "b"])).unwrap();
    writer.write_str_array::<Vec<&str>, _>("targets", None).unwrap();
    writer.begin_array("dependencies").unwrap();
    writer.begin_element_object().unwrap();
    writer.write_str("name", Some("python")).unwrap();
    writer.end_object().unwrap();
    writer.write_element(Some("raw")).unwrap();
    writer.end_array().unwrap();
    writer.end_object().unwrap();
    writer.write_int("top", -1).unwrap();
    assert_eq!(writer.depth(), 0);

    let expected = json!({
        "project": {
            "version": 2,
            "locked": true,
            "name": "my-pkg",
            "description": null,
            "sources": ["a", "b"],
            "targets": null,
            "dependencies": [{"name": "python"}, "raw"],
        },
        "top": -1,
    });
    assert_eq!(writer.into_value(), expected);
}

#[rstest]
fn test_json_writer_closes_open_values() {
    let mut writer = JsonWriter::new();
    writer.begin_object("outer").unwrap();
    writer.begin_array("items").unwrap();
    writer.write_element(Some("x")).unwrap();
    assert_eq!(writer.depth(), 2);
    assert_eq!(
        writer.into_value(),
        json!({"outer": {"items": ["x"]}})
    );
}

#[rstest]
fn test_json_writer_pretty() {
    let mut writer = JsonWriter::new();
    writer.write_str("name", Some("value")).unwrap();
    assert_eq!(writer.into_pretty_string(), "{\n  \"name\": \"value\"\n}");
}

#[rstest]
fn test_json_writer_rejects_misuse() {
    let mut writer = JsonWriter::new();
    assert!(matches!(
        writer.end_object(),
        Err(Error::NothingOpen(Frame::Object))
    ));
    assert!(matches!(
        writer.write_element(None),
        Err(Error::ElementOutsideArray)
    ));
    writer.begin_array("list").unwrap();
    assert!(matches!(
        writer.write_str("x", None),
        Err(Error::NamedValueInArray(_))
    ));
    assert!(matches!(
        writer.end_object(),
        Err(Error::MismatchedClose {
            expected: Frame::Object,
            found: Frame::Array
        })
    ));
    writer.end_array().unwrap();
    assert_eq!(writer.into_value(), json!({"list": []}));
}

#[rstest]
fn test_json_writer_keeps_write_order() {
    let mut writer = JsonWriter::new();
    writer.write_int("z", 1).unwrap();
    writer.begin_object("m").unwrap();
    writer.write_bool("y", true).unwrap();
    writer.write_bool("b", false).unwrap();
    writer.end_object().unwrap();
    writer.write_int("a", 2).unwrap();
    assert_eq!(
        writer.into_pretty_string(),
        "{\n  \"z\": 1,\n  \"m\": {\n    \"y\": true,\n    \"b\": false\n  },\n  \"a\": 2\n}"
    );
}

#[rstest]
#[case::scalar_then_scalar(|w: &mut JsonWriter| {
    w.write_int("a", 1)?;
    w.write_str("a", Some("x"))
})]
#[case::object_then_scalar(|w: &mut JsonWriter| {
    w.begin_object("a")?;
    w.end_object()?;
    w.write_bool("a", true)
})]
#[case::scalar_then_array(|w: &mut JsonWriter| {
    w.write_int("a", 1)?;
    w.begin_array("a")
})]
#[case::nested(|w: &mut JsonWriter| {
    w.begin_object("outer")?;
    w.write_int("a", 1)?;
    w.begin_object("a")
})]
#[case::element_object(|w: &mut JsonWriter| {
    w.begin_array("list")?;
    w.begin_element_object()?;
    w.write_str("a", None)?;
    w.write_int("a", 2)
})]
fn test_json_writer_rejects_duplicate_names(
    #[case] walk: fn(&mut JsonWriter) -> crate::Result<()>,
) {
    let mut writer = JsonWriter::new();
    let result = walk(&mut writer);
    assert!(
        matches!(&result, Err(Error::DuplicateName(name)) if name == "a"),
        "expected a duplicate name error, got {result:?}"
    );
}

#[rstest]
fn test_json_writer_allows_same_name_in_sibling_objects() {
    let mut writer = JsonWriter::new();
    writer.begin_array("list").unwrap();
    for value in [1, 2] {
        writer.begin_element_object().unwrap();
        writer.write_int("a", value).unwrap();
        writer.end_object().unwrap();
    }
    writer.end_array().unwrap();
    writer.begin_object("inner").unwrap();
    writer.write_int("list", 3).unwrap();
    writer.end_object().unwrap();
    assert_eq!(
        writer.into_value(),
        json!({"list": [{"a": 1}, {"a": 2}], "inner": {"list": 3}})
    );
}
