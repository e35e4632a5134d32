// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

/// Initializes the logging framework to capture logs from the crates specified with a minimum
/// [`log::Level`] of [`Info`](log::Level::Info) on debug builds and [`Warn`](log::Level::Warn) on
/// release builds.  On desktop platforms, these defaults can be overridden by setting the
/// `RUST_LOG` environment variable.
pub struct Logging {
    crates: Vec<&'static str>,
    level: log::LevelFilter,
}

impl Logging {
    /// Creates a new [`Logging`] instance with the specified list of crates to capture logs
    /// from, at the default level for the build profile.
    pub fn new(crates: Vec<&'static str>) -> Self {
        Self {
            crates,
            level: if cfg!(debug_assertions) {
                log::LevelFilter::Info
            } else {
                log::LevelFilter::Warn
            },
        }
    }

    /// Overrides the default level, e.g. from a `--verbose` command line flag.
    pub fn with_level(mut self, level: log::LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn level(&self) -> log::LevelFilter {
        self.level
    }

    /// Installs the global logger.  `RUST_LOG`, when set, takes precedence over the level
    /// configured here.
    pub fn init(&self) {
        crate::platform_impl::init_with_level(&self.crates, self.level);
    }
}

/// Builds the filter string that would have been set in `RUST_LOG`, e.g.
/// `mdview=info,simulation_import=info`.
pub fn filter_string(crates: &[&'static str], log_level: log::LevelFilter) -> String {
    let level_str = match log_level {
        log::LevelFilter::Off => "off",
        log::LevelFilter::Error => "error",
        log::LevelFilter::Warn => "warn",
        log::LevelFilter::Info => "info",
        log::LevelFilter::Debug => "debug",
        log::LevelFilter::Trace => "trace",
    };
    crates
        .iter()
        .map(|&pkg_name| format!("{}={}", pkg_name, level_str))
        .collect::<Vec<_>>()
        .join(",")
}


// End of File
