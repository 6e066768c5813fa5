// Copyright 2024 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Startup and shutdown logic shared by the build-file tools.

use itertools::Itertools;
use std::{
    ffi::OsStr,
    fmt::Debug,
    process::{ExitCode, Termination},
};

mod config;
mod logging;

pub use crate::config::*;
pub use crate::logging::*;

/// Wraps a CLI main function to provide the common startup/cleanup logic.
///
/// Call this at the very beginning of `main`. Logging is set up before `main`
/// runs and flushed after it returns, and an error result is reported on
/// stderr with a non-zero exit code.
pub fn cli_main<F, T, E>(main: F, config: Config) -> ExitCode
where
    F: FnOnce() -> Result<T, E>,
    T: Termination,
    E: Debug,
{
    let _log_guard = match config.logging.setup() {
        Ok(guard) => guard,
        Err(error) => return handle_top_level_result::<(), _>(Err(error)),
    };
    if config.log_command_line {
        log_current_command_line();
    }
    handle_top_level_result(main())
}

/// Logs the command line of the current process.
///
/// You don't need this function if you use [`cli_main`] because it calls this
/// function for you.
pub fn log_current_command_line() {
    tracing::info!("COMMAND: {}", escaped_command_line());
}

fn escaped_command_line() -> String {
    std::env::args()
        .map(|s| shell_escape::escape(s.into()))
        .join(" ")
}

/// Handles the top-level [`Result`] and returns [`ExitCode`] to be returned.
///
/// You don't need this function if you use [`cli_main`].
pub fn handle_top_level_result<T: Termination, E: Debug>(result: Result<T, E>) -> ExitCode {
    match result {
        Err(error) => {
            eprintln!("FATAL: {}: {:?}", get_current_process_name(), error);
            ExitCode::FAILURE
        }
        Ok(value) => value.report(),
    }
}

/// Returns the current process name, or `__unknown__` if it failed to get one.
fn get_current_process_name() -> String {
    let current_exe = std::env::current_exe().unwrap_or_default();
    current_exe
        .file_name()
        .unwrap_or(OsStr::new("__unknown__"))
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compared through Debug output.
    fn same_exit_code(a: ExitCode, b: ExitCode) -> bool {
        format!("{a:?}") == format!("{b:?}")
    }

    #[test]
    fn top_level_error_fails() {
        let result: Result<(), &str> = Err("boom");
        assert!(same_exit_code(
            handle_top_level_result(result),
            ExitCode::FAILURE
        ));
    }

    #[test]
    fn top_level_success_reports_value() {
        let result: Result<(), &str> = Ok(());
        assert!(same_exit_code(
            handle_top_level_result(result),
            ExitCode::SUCCESS
        ));
    }

    #[test]
    fn process_name_is_not_empty() {
        assert!(!get_current_process_name().is_empty());
    }
}
