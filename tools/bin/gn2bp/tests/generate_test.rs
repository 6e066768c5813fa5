// Copyright 2024 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::{
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{ensure, Result};
use gn2bp::{
    blueprint::{render_blueprint, DEFAULT_MODULE_PREFIX},
    desc::BuildGraph,
    generate::generate_modules,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use testutil::{compare_str_with_golden_data, compare_with_golden_data};

fn testdata(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/testdata")
        .join(name)
}

fn gn2bp() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_gn2bp"));
    command.env("BP_TOOLS_LOG_CONSOLE", "0");
    command
}

#[test]
fn test_generate_golden() -> Result<()> {
    let graph = BuildGraph::load(&testdata("desc.json"))?;
    let modules = generate_modules(&graph, DEFAULT_MODULE_PREFIX, &[])?;
    let content = render_blueprint(&modules)?;

    compare_str_with_golden_data(&content, &testdata("Android.bp.golden"))
}

#[test]
fn test_cli_generate() -> Result<()> {
    let dir = TempDir::new()?;
    let output = dir.path().join("Android.bp");

    let status = gn2bp()
        .arg("generate")
        .arg("--desc")
        .arg(testdata("desc.json"))
        .arg("--output")
        .arg(&output)
        .status()?;
    ensure!(status.success(), "gn2bp failed: {status:?}");

    compare_with_golden_data(&output, &testdata("Android.bp.golden"))
}

#[test]
fn test_cli_generate_selected_target() -> Result<()> {
    let output = gn2bp()
        .args(["generate", "--module-prefix", "test_", "--target"])
        .arg("//net:net_unittests")
        .arg("--desc")
        .arg(testdata("desc.json"))
        .output()?;
    ensure!(output.status.success(), "gn2bp failed: {output:?}");

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("name: \"test_net_net_unittests\""), "{stdout}");
    assert!(!stdout.contains("cronet_rs"), "{stdout}");
    Ok(())
}

#[test]
fn test_cli_normalize_flags() -> Result<()> {
    let output = gn2bp()
        .args([
            "normalize-flags",
            "--",
            "-Aunused-imports",
            "-Cforce-unwind-tables=no",
            "--target=aarch64-linux-android",
            "--cfg",
            "feature=X",
            "--cfg=feature2=Y",
        ])
        .output()?;
    ensure!(output.status.success(), "gn2bp failed: {output:?}");

    let table: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        table,
        serde_json::json!({
            "-Aunused-imports": null,
            "-Cforce-unwind-tables": ["no"],
            "--target": ["aarch64-linux-android"],
            "--cfg": ["feature2=Y", "feature=X"],
        })
    );
    Ok(())
}

#[test]
fn test_cli_reports_bad_flags() -> Result<()> {
    let output = gn2bp()
        .args(["normalize-flags", "feature=float_roundtrip"])
        .output()?;
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr)?;
    assert!(
        stderr.contains("Field feature=float_roundtrip does not relate to any key"),
        "{stderr}"
    );
    Ok(())
}
