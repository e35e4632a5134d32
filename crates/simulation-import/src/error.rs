// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use timestep::TimestepError;

/// Everything that can go wrong between a directory of node files and a [`Timestep`].
///
/// None of these are recovered from inside the crate: a failed node read aborts the whole
/// assembly and no partial timestep is ever returned.
///
/// [`Timestep`]: timestep::Timestep
#[derive(Debug, Error)]
pub enum ImportError {
    /// A node file (or output directory) is missing or unreadable.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A node file does not follow the record layout.
    #[error("Malformed node file {}: {message}", path.display())]
    Format { path: PathBuf, message: String },

    /// The decomposition does not match the data on disk.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error(transparent)]
    Timestep(#[from] TimestepError),
}

impl ImportError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn format(path: &Path, message: impl Into<String>) -> Self {
        Self::Format {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;

// End of File
