// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data directory resolution.

use std::ffi::OsString;
use std::path::PathBuf;

use tracing::warn;

pub const APP_DIR: &str = "docscan";

/// Return the application data directory, creating it if needed.
///
/// On mobile the platform bridge should provide the documents directory
/// instead.
pub fn data_dir() -> PathBuf {
    let base = base_dir(std::env::var_os("XDG_DATA_HOME"), std::env::var_os("HOME"));
    let dir = base.join(APP_DIR);
    if let Err(e) = std::fs::create_dir_all(&dir) {
        warn!(path = %dir.display(), error = %e, "could not create data directory");
    }
    dir
}

fn base_dir(xdg_data_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
    if let Some(xdg) = xdg_data_home.filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg);
    }
    if let Some(home) = home.filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".local").join("share");
    }
    PathBuf::from("/tmp")
}
