// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use thiserror::Error;

pub type Result<T, E = LoggingError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("could not configure logging: {0}")]
    Configuration(String),

    #[error("logging has already been initialized")]
    AlreadyInitialized,
}
