// Copyright 2024 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use anyhow::{bail, Context, Result};

use crate::{blueprint::RustModule, desc::BuildGraph};

/// Builds modules for the requested labels, or for every supported rust
/// target of the graph if no label is given.
///
/// Explicitly requested labels must name supported rust targets. When
/// scanning the whole graph, targets of unsupported types are skipped.
pub fn generate_modules(
    graph: &BuildGraph,
    prefix: &str,
    labels: &[String],
) -> Result<Vec<RustModule>> {
    let mut modules = Vec::new();

    if labels.is_empty() {
        for (label, target) in graph.rust_targets() {
            if target.target_type.soong_module_type().is_none() {
                tracing::warn!(
                    "Skipping {label}: unsupported target type {:?}",
                    target.target_type
                );
                continue;
            }
            modules.push(RustModule::from_target(prefix, label, target)?);
        }
    } else {
        for label in labels {
            let target = graph
                .get(label)
                .with_context(|| format!("Unknown target {label}"))?;
            if !target.is_rust() {
                bail!("{label} is not a rust target");
            }
            modules.push(RustModule::from_target(prefix, label, target)?);
        }
    }

    tracing::info!("Generated {} rust modules", modules.len());
    Ok(modules)
}
