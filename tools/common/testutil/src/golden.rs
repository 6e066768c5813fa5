// Copyright 2024 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::{path::Path, process::Command};

use anyhow::{bail, ensure, Result};

/// The name of the environment variable controlling whether to regenerate
/// golden data.
pub const REGENERATE_VAR_NAME: &str = "BP_TOOLS_REGENERATE_GOLDEN";

fn should_regenerate() -> bool {
    std::env::var(REGENERATE_VAR_NAME).unwrap_or_default() != ""
}

fn regenerate(output: &Path, golden: &Path) -> Result<()> {
    if golden.is_dir() {
        std::fs::remove_dir_all(golden)?;
    } else if golden.is_file() {
        std::fs::remove_file(golden)?;
    } else {
        ensure!(!golden.try_exists()?, "Unknown file type");
    }
    let status = Command::new("cp")
        .args(["--recursive", "--dereference", "--"])
        .arg(output)
        .arg(golden)
        .status()?;
    ensure!(
        status.success(),
        "Failed to update golden data: {:?}",
        status
    );
    Ok(())
}

/// Compares a generated file or directory with checked-in golden data and
/// returns an error if there is any mismatch.
///
/// `golden` should be an absolute path, usually built from the caller's
/// `CARGO_MANIFEST_DIR`.
///
/// # Updating golden data
///
/// The golden data is overwritten with the output data if the environment
/// variable `BP_TOOLS_REGENERATE_GOLDEN` is set to a non-empty value:
///
/// ```sh
/// BP_TOOLS_REGENERATE_GOLDEN=1 cargo test
/// ```
pub fn compare_with_golden_data(output: &Path, golden: &Path) -> Result<()> {
    if should_regenerate() {
        return regenerate(output, golden);
    }

    ensure!(
        golden.try_exists()?,
        "The golden data {golden:?} doesn't exist. Maybe you had a typo, or maybe you \
        just need to regenerate it with {REGENERATE_VAR_NAME}=1"
    );
    let status = Command::new("diff")
        .args(["-Naru", "--"])
        .arg(golden)
        .arg(output)
        .status()?;
    if !status.success() {
        bail!(
            "Found mismatch with golden data; \
            consider regenerating them with: {}=1 cargo test",
            REGENERATE_VAR_NAME
        );
    }
    Ok(())
}

/// Like [`compare_with_golden_data`], but for output held in memory.
pub fn compare_str_with_golden_data(output: &str, golden: &Path) -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let output_file = dir.path().join("output");
    std::fs::write(&output_file, output)?;
    compare_with_golden_data(&output_file, golden)
}
