// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! # mdview's Logging Framework
//!
//! This crate initializes the logging framework for mdview.  Library crates only ever talk to
//! the [`log`] facade; this crate wires up [`env_logger`] on desktop platforms so that the
//! configuration can be read from the environment.
//!
//! By default, the logging level is set to [`Info`](log::Level::Info) for debug builds, and
//! [`Warn`](log::Level::Warn) for release builds. This can be overridden by setting the `RUST_LOG`
//! environment variable, like so:
//!
//! ```sh
//! $> RUST_LOG=simulation_import=debug cargo run -- --config run.yaml info
//! ```

mod platform;
mod platform_impl;
pub use platform::{filter_string, Logging};

/// A module which is typically glob imported.
pub mod prelude {
    pub use super::Logging;
}

// End of File
