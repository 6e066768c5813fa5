// Copyright 2024 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use anyhow::{bail, Context, Result};
use itertools::Itertools;
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    time::SystemTime,
};
use tracing_chrome::{ChromeLayerBuilder, FlushGuard};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::Layer;

/// Name of the environment variable containing the trace directory and file respectively.
/// If both are provided, an error is thrown.
/// If neither is provided, no tracing is performed.
pub const TRACE_DIR_ENV: &str = "BP_TOOLS_TRACE_DIR";
pub const TRACE_FILE_ENV: &str = "BP_TOOLS_TRACE_FILE";

/// Name of the environment variable containing the log directory and file respectively.
/// If both are provided, an error is thrown.
/// If neither is provided, no logging to files is performed.
pub const LOG_DIR_ENV: &str = "BP_TOOLS_LOG_DIR";
pub const LOG_FILE_ENV: &str = "BP_TOOLS_LOG_FILE";

/// An environment variable choosing whether to log to the console.
/// If "0", don't log to the console.
/// Otherwise, do log to the console.
pub const CONSOLE_LOG_ENV: &str = "BP_TOOLS_LOG_CONSOLE";

/// A guard object to perform cleanups with RAII.
pub struct LogGuard {
    _span_guard: tracing::span::EnteredSpan,
    _flush_guard: Option<FlushGuard>,
}

/// The configuration for the logger.
pub struct LoggingConfig {
    /// The path to dump the Chrome trace json file to.
    pub trace_file: Option<PathBuf>,
    /// The path to dump the logs to, and a filter for which logs should be dumped there.
    /// If None, logs will not be written to a file.
    pub log_file: Option<(PathBuf, EnvFilter)>,
    /// A filter for which logs should be written to the console.
    /// If None, logs will not be written to the console.
    pub console_logger: Option<EnvFilter>,
}

fn default_filter() -> Result<EnvFilter> {
    Ok(EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?)
}

/// Resolves an output file from a pair of environment variables, one naming
/// the file itself and one naming a directory to create it in.
fn resolve_output_file(dir_env: &str, file_env: &str, ext: &str) -> Result<Option<PathBuf>> {
    let timestamp = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();

    Ok(
        match (std::env::var_os(file_env), std::env::var_os(dir_env)) {
            (Some(_), Some(_)) => bail!("You can't have both {file_env} and {dir_env} set"),
            (Some(file), None) => {
                // Subprocesses shouldn't share a log file.
                std::env::remove_var(file_env);
                Some(PathBuf::from(file))
            }
            (None, Some(dir)) => {
                let name = format!("{}.{timestamp}.{ext}", crate::get_current_process_name());
                Some(Path::new(&dir).join(name))
            }
            (None, None) => None,
        },
    )
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self> {
        let trace_file = resolve_output_file(TRACE_DIR_ENV, TRACE_FILE_ENV, "json")?;
        let log_file = resolve_output_file(LOG_DIR_ENV, LOG_FILE_ENV, "log")?;

        let console_logger = match std::env::var_os(CONSOLE_LOG_ENV).as_deref() {
            Some(value) if value == OsStr::new("0") => None,
            _ => Some(default_filter()?),
        };

        let log_file = match log_file {
            Some(log_file) => Some((log_file, default_filter()?)),
            None => None,
        };

        Ok(Self {
            trace_file,
            log_file,
            console_logger,
        })
    }

    /// A config that only logs warnings and errors to the console.
    pub fn quiet() -> Self {
        Self {
            trace_file: None,
            log_file: None,
            console_logger: Some(EnvFilter::new("warn")),
        }
    }

    /// Sets up the standard tracing subscriber in accordance with the config, and starts a span
    /// named "main".
    pub fn setup(self) -> Result<LogGuard> {
        // Logs and traces share the single global subscriber, so every output
        // is a layer on the same registry.
        let mut layers = Vec::new();

        let flush_guard = if let Some(trace_file) = &self.trace_file {
            let f = std::fs::File::create(trace_file)
                .with_context(|| format!("Failed to open trace file {trace_file:?}"))?;
            let (chrome_layer, flush_guard) = ChromeLayerBuilder::new()
                .writer(f)
                .include_args(true)
                .build();
            layers.push(chrome_layer.boxed());
            Some(flush_guard)
        } else {
            None
        };

        if let Some(filter) = self.console_logger {
            layers.push(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stderr)
                    .with_filter(filter)
                    .boxed(),
            );
        }

        if let Some((log_file, filter)) = self.log_file {
            let f = std::fs::File::create(&log_file)
                .with_context(|| format!("Failed to open log file {log_file:?}"))?;
            layers.push(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(f)
                    .with_filter(filter)
                    .boxed(),
            );
        }

        tracing_subscriber::registry()
            .with(layers)
            .try_init()
            .context("Failed to start tracing. Is another subscriber already running?")?;

        let span_guard = tracing::trace_span!("main", args = crate::escaped_command_line()).entered();

        Ok(LogGuard {
            _span_guard: span_guard,
            _flush_guard: flush_guard,
        })
    }
}
