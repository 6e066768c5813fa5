// Copyright 2024 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Reader for the JSON build graph printed by `gn desc --format=json`.
//!
//! Only the handful of fields needed to emit rust modules are deserialized;
//! everything else in the description is ignored.

use std::{collections::BTreeMap, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

/// A GN target type.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    RustLibrary,
    RustProcMacro,
    Executable,
    StaticLibrary,
    SharedLibrary,
    #[serde(other)]
    Other,
}

impl TargetType {
    /// Returns the Soong module type to emit for a rust target of this type,
    /// or `None` if such targets are not supported.
    pub fn soong_module_type(&self) -> Option<&'static str> {
        match self {
            TargetType::RustLibrary => Some("rust_library"),
            TargetType::RustProcMacro => Some("rust_proc_macro"),
            TargetType::Executable => Some("rust_binary"),
            TargetType::StaticLibrary => Some("rust_ffi_static"),
            TargetType::SharedLibrary => Some("rust_ffi_shared"),
            TargetType::Other => None,
        }
    }
}

/// A single target of the build graph.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Target {
    #[serde(rename = "type")]
    pub target_type: TargetType,
    #[serde(default)]
    pub crate_name: Option<String>,
    #[serde(default)]
    pub crate_root: Option<String>,
    #[serde(default)]
    pub rustflags: Vec<String>,
}

impl Target {
    pub fn is_rust(&self) -> bool {
        self.crate_name.is_some()
    }
}

/// Targets of a build graph, keyed by GN label (e.g. `//net:net_rs`).
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(transparent)]
pub struct BuildGraph {
    targets: BTreeMap<String, Target>,
}

impl BuildGraph {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse the build graph description")
    }

    /// Loads a build graph description from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Failed to load {}", path.display()))
    }

    pub fn get(&self, label: &str) -> Option<&Target> {
        self.targets.get(label)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Iterates over rust crate targets in label order.
    pub fn rust_targets(&self) -> impl Iterator<Item = (&str, &Target)> {
        self.targets
            .iter()
            .filter(|(_, target)| target.is_rust())
            .map(|(label, target)| (label.as_str(), target))
    }
}
