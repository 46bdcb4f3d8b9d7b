// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use thiserror::Error;

pub type Result<T, E = CrawlerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error(transparent)]
    Network(#[from] kadmesh_networking::NetworkError),
}
