// Copyright 2024 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::LoggingConfig;
use anyhow::Result;

/// Builds the process-wide [`Config`] consumed by [`crate::cli_main`].
#[derive(Default)]
pub struct ConfigBuilder {
    logging: Option<LoggingConfig>,

    log_command_line: bool,
}

// Manually mark as inline, because rust doesn't like inlining across crate boundaries.
impl ConfigBuilder {
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            logging: None,
            log_command_line: true,
        }
    }

    #[inline(always)]
    /// Overrides the logging config. If this isn't called, it defaults to
    /// `LoggingConfig::from_env()`.
    pub fn logging(mut self, cfg: LoggingConfig) -> Self {
        self.logging = Some(cfg);
        self
    }

    #[inline(always)]
    /// `enable` controls whether to log the command-line of the current process.
    pub fn log_command_line(mut self, enable: bool) -> Self {
        self.log_command_line = enable;
        self
    }

    #[inline(always)]
    /// Builds a Config suitable for use with cli_main.
    pub fn build(self) -> Result<Config> {
        let logging = match self.logging {
            Some(logging) => logging,
            None => LoggingConfig::from_env()?,
        };
        Ok(Config {
            logging,
            log_command_line: self.log_command_line,
        })
    }
}

/// The configs after applying defaults for unset values.
/// Build it with `cliutil::ConfigBuilder::new().<field>(...).build()`.
pub struct Config {
    pub(crate) logging: LoggingConfig,
    pub(crate) log_command_line: bool,
}
