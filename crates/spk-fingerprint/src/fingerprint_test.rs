// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0
// https://github.com/spkenv/spk

use rstest::{fixture, rstest};
use serde_json::json;

use super::Fingerprint;
use crate::prelude::*;
use crate::{DigestAlgorithm, Error, FingerprintConfig, Result};

#[derive(Clone, Debug)]
struct Dependency {
    name: String,
    version: Option<String>,
    include: Option<Vec<String>>,
}

#[derive(Clone, Debug)]
struct Project {
    name: String,
    format: i64,
    frozen: bool,
    dependencies: Vec<Dependency>,
}

impl Fingerprintable for Project {
    fn write_graph<W: GraphWriter>(&self, writer: &mut W) -> Result<()> {
        writer.begin_object("project")?;
        writer.write_str("name", Some(&self.name))?;
        writer.write_int("format", self.format)?;
        writer.write_bool("frozen", self.frozen)?;
        writer.begin_array("dependencies")?;
        for dep in self.dependencies.iter() {
            writer.begin_element_object()?;
            writer.write_str("name", Some(&dep.name))?;
            writer.write_str("version", dep.version.as_deref())?;
            writer.write_str_array("include", dep.include.as_ref())?;
            writer.end_object()?;
        }
        writer.end_array()?;
        writer.end_object()
    }
}

#[fixture]
fn project() -> Project {
    Project {
        name: "my-tool".into(),
        format: 3,
        frozen: false,
        dependencies: vec![
            Dependency {
                name: "python".into(),
                version: Some("3.10".into()),
                include: None,
            },
            Dependency {
                name: "zlib".into(),
                version: None,
                include: Some(vec!["run".into(), "build".into()]),
            },
        ],
    }
}

#[rstest]
fn test_fingerprint_is_stable(project: Project) {
    let config = FingerprintConfig::default();
    let first = project.fingerprint_with(&config).unwrap();
    let second = project.clone().fingerprint_with(&config).unwrap();
    assert_eq!(first, second);
    assert_eq!((&project).fingerprint_with(&config).unwrap(), first);
    assert_eq!(Box::new(project).fingerprint_with(&config).unwrap(), first);
}

#[rstest]
fn test_fingerprint_uses_current_config(project: Project) {
    // only the algorithm changes the output, not the buffering
    let expected = project
        .fingerprint_with(&FingerprintConfig::default())
        .unwrap();
    assert_eq!(project.fingerprint().unwrap(), expected);
}

#[rstest]
fn test_fingerprint_buffer_size_does_not_matter(project: Project) {
    let small = FingerprintConfig {
        buffer_size: 1,
        ..Default::default()
    };
    assert_eq!(
        project.fingerprint_with(&small).unwrap(),
        project
            .fingerprint_with(&FingerprintConfig::default())
            .unwrap()
    );
}

#[rstest]
fn test_fingerprint_algorithm_matters(project: Project) {
    let sha256 = FingerprintConfig {
        algorithm: DigestAlgorithm::Sha256,
        ..Default::default()
    };
    assert_ne!(
        project.fingerprint_with(&sha256).unwrap(),
        project
            .fingerprint_with(&FingerprintConfig::default())
            .unwrap()
    );
}

#[rstest]
fn test_fingerprint_zero_buffer(project: Project) {
    let config = FingerprintConfig {
        buffer_size: 0,
        ..Default::default()
    };
    assert!(matches!(
        project.fingerprint_with(&config),
        Err(Error::InvalidBufferSize(0))
    ));
}

#[rstest]
#[case::renamed(|p: &mut Project| p.name.push('2'))]
#[case::format(|p: &mut Project| p.format += 1)]
#[case::frozen(|p: &mut Project| p.frozen = true)]
#[case::null_version(|p: &mut Project| p.dependencies[0].version = None)]
#[case::empty_version(|p: &mut Project| p.dependencies[0].version = Some(String::new()))]
#[case::empty_include(|p: &mut Project| p.dependencies[0].include = Some(Vec::new()))]
#[case::include_order(|p: &mut Project| {
    if let Some(include) = p.dependencies[1].include.as_mut() {
        include.reverse();
    }
})]
#[case::dependency_order(|p: &mut Project| p.dependencies.reverse())]
#[case::removed_dependency(|p: &mut Project| { p.dependencies.pop(); })]
fn test_fingerprint_detects_change(project: Project, #[case] change: fn(&mut Project)) {
    let config = FingerprintConfig::default();
    let mut changed = project.clone();
    change(&mut changed);
    assert_ne!(
        project.fingerprint_with(&config).unwrap(),
        changed.fingerprint_with(&config).unwrap()
    );
}

#[rstest]
fn test_to_json(project: Project) {
    let expected = json!({
        "project": {
            "name": "my-tool",
            "format": 3,
            "frozen": false,
            "dependencies": [
                {"name": "python", "version": "3.10", "include": null},
                {"name": "zlib", "version": null, "include": ["run", "build"]},
            ],
        }
    });
    assert_eq!(project.to_json().unwrap(), expected);
}

#[rstest]
fn test_fingerprint_parse() {
    assert!(matches!(
        Fingerprint::parse(""),
        Err(Error::EmptyFingerprint)
    ));
    let parsed: Fingerprint = "abc=".parse().unwrap();
    assert_eq!(parsed.as_str(), "abc=");
    assert_eq!(parsed, "abc=");
    assert_eq!(parsed.to_string(), "abc=");
}

#[rstest]
fn test_fingerprint_serde(project: Project) {
    let fingerprint = project
        .fingerprint_with(&FingerprintConfig::default())
        .unwrap();
    let serialized = serde_json::to_string(&fingerprint).unwrap();
    assert_eq!(serialized, format!("\"{fingerprint}\""));
    let deserialized: Fingerprint = serde_json::from_str(&serialized).unwrap();
    assert_eq!(deserialized, fingerprint);
    assert!(serde_json::from_str::<Fingerprint>("\"\"").is_err());
}
