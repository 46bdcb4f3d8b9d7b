// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use file_rotate::compression::Compression;
use file_rotate::suffix::{AppendTimestamp, FileLimit};
use file_rotate::{ContentLimit, FileRotate};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};

const MAX_LOG_BYTES: usize = 20 * 1024 * 1024;
const UNCOMPRESSED_FILES: usize = 5;
const MAX_LOG_FILES: usize = 50;

/// A rotating file writer under `dir`, named after the running binary.
/// Rotates at `MAX_LOG_BYTES`, compresses everything past the newest
/// `UNCOMPRESSED_FILES`, and deletes the oldest past `MAX_LOG_FILES`.
pub(super) fn file_rotater(dir: &Path) -> (NonBlocking, WorkerGuard) {
    let binary_name = env::current_exe()
        .map(|path| {
            path.file_stem()
                .unwrap_or(OsStr::new("kadmesh"))
                .to_string_lossy()
                .into_owned()
        })
        .unwrap_or_else(|_| "kadmesh".to_string());

    let log_path: PathBuf = dir.join(format!("{binary_name}.log"));
    let rotate = FileRotate::new(
        log_path,
        AppendTimestamp::default(FileLimit::MaxFiles(MAX_LOG_FILES)),
        ContentLimit::BytesSurpassed(MAX_LOG_BYTES),
        Compression::OnRotate(UNCOMPRESSED_FILES),
        None,
    );

    tracing_appender::non_blocking(rotate)
}
