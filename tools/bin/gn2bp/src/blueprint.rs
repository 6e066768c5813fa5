// Copyright 2024 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use itertools::Itertools;
use lazy_static::lazy_static;
use serde::Serialize;
use tera::Tera;

use crate::{
    desc::Target,
    rust_flags::{normalize_rust_flags, FlagValues, RustFlags},
};

/// Prefix prepended to every generated module name by default.
pub const DEFAULT_MODULE_PREFIX: &str = "cronet_aml_";

/// Flags whose values become dedicated module properties.
const CFG_FLAG: &str = "--cfg";
const EDITION_FLAG: &str = "--edition";

/// Flags Soong sets on its own, so they are never copied into `flags`.
const IGNORED_FLAGS: &[&str] = &["--target"];

lazy_static! {
    static ref TEMPLATES: Tera = {
        let mut tera: Tera = Default::default();
        tera.add_raw_template("rust_modules.bp", include_str!("templates/rust_modules.bp"))
            .expect("embedded template must parse");
        tera
    };
}

/// A rust module in an Android.bp file.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct RustModule {
    pub module_type: String,
    pub name: String,
    pub crate_name: Option<String>,
    pub srcs: Vec<String>,
    pub edition: Option<String>,
    pub cfgs: Vec<String>,
    pub features: Vec<String>,
    pub flags: Vec<String>,
}

/// Escapes a string for use inside a double-quoted Blueprint literal.
fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Turns a GN label such as `//net/third_party:quiche` into a module name.
pub fn module_name(prefix: &str, label: &str) -> String {
    let sanitized = label
        .trim_start_matches("//")
        .replace(['/', ':', '.', '-'], "_");
    format!("{prefix}{sanitized}")
}

/// Returns the feature name if `cfg` is a `feature=...` cfg.
///
/// `feature=x` and `feature="x"` name the same feature.
fn feature_name(cfg: &str) -> Option<&str> {
    cfg.strip_prefix("feature=").map(|name| name.trim_matches('"'))
}

fn is_dropped(key: &str) -> bool {
    key.starts_with('@') || IGNORED_FLAGS.contains(&key)
}

impl RustModule {
    /// Builds the module for a rust target of the build graph.
    pub fn from_target(prefix: &str, label: &str, target: &Target) -> Result<Self> {
        let module_type = target
            .target_type
            .soong_module_type()
            .with_context(|| format!("{label}: unsupported target type {:?}", target.target_type))?;
        let flags = normalize_rust_flags(&target.rustflags)
            .with_context(|| format!("{label}: failed to normalize rustflags"))?;

        let mut module = Self::from_flags(&flags).with_context(|| format!("{label}: bad rustflags"))?;
        module.module_type = module_type.to_owned();
        module.name = module_name(prefix, label);
        module.crate_name = target.crate_name.as_deref().map(escape);
        module.srcs = target
            .crate_root
            .iter()
            .map(|root| escape(root.trim_start_matches("//")))
            .collect();
        Ok(module)
    }

    /// Fills in the flag-derived properties from a normalized flag table.
    ///
    /// `--cfg feature=...` values become `features`, other `--cfg` values
    /// become `cfgs`, and `--edition` becomes `edition`. Both lists are sorted
    /// and deduplicated, and empty feature names are skipped. Response files and
    /// flags Soong manages itself are dropped; the rest goes to `flags`.
    pub fn from_flags(flags: &RustFlags) -> Result<Self> {
        let (features, cfgs): (Vec<_>, Vec<_>) = flags
            .values(CFG_FLAG)
            .partition(|cfg| feature_name(cfg).is_some());
        let features = features
            .into_iter()
            .filter_map(feature_name)
            .filter(|name| !name.is_empty())
            .map(escape)
            .sorted()
            .dedup()
            .collect_vec();
        let cfgs = cfgs.into_iter().map(escape).sorted().dedup().collect_vec();

        let edition = match flags.values(EDITION_FLAG).collect_vec().as_slice() {
            [] => None,
            [edition] => Some(escape(edition)),
            editions => bail!("conflicting editions: {}", editions.join(", ")),
        };

        let mut remaining = BTreeMap::<String, FlagValues>::new();
        for (key, values) in flags {
            if key == CFG_FLAG || key == EDITION_FLAG {
                continue;
            }
            if is_dropped(key) {
                tracing::debug!("Dropping rust flag {key}");
                continue;
            }
            remaining.insert(key.clone(), values.clone());
        }
        let flags = RustFlags::from(remaining)
            .to_flag_list()
            .iter()
            .map(|flag| escape(flag))
            .collect();

        Ok(Self {
            edition,
            cfgs,
            features,
            flags,
            ..Default::default()
        })
    }
}

#[derive(Serialize, Debug)]
struct BlueprintContext<'a> {
    modules: &'a [RustModule],
}

/// Renders modules into the contents of an Android.bp file.
pub fn render_blueprint(modules: &[RustModule]) -> Result<String> {
    let context = BlueprintContext { modules };
    Ok(TEMPLATES.render(
        "rust_modules.bp",
        &tera::Context::from_serialize(context)?,
    )?)
}
