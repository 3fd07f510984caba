// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanner settings persisted as JSON in the data directory.

use std::path::Path;

use docscan_core::ScanConfig;
use docscan_core::error::Result;
use tracing::{debug, warn};

pub const CONFIG_FILE: &str = "config.json";

/// Environment variable that overrides the stored licence token.
pub const LICENSE_ENV: &str = "DOCSCAN_LICENSE";

/// Read the stored settings. `None` when there are none or they do not parse.
pub fn load_config(data_dir: &Path) -> Option<ScanConfig> {
    let path = data_dir.join(CONFIG_FILE);
    let data = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&data) {
        Ok(config) => {
            debug!(path = %path.display(), "configuration loaded");
            Some(config)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable configuration");
            None
        }
    }
}

pub fn persist_config(data_dir: &Path, config: &ScanConfig) -> Result<()> {
    let path = data_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}

/// Replace the licence with `license` when it is set and non-blank.
pub fn apply_license_override(config: &mut ScanConfig, license: Option<String>) {
    if let Some(license) = license.map(|l| l.trim().to_owned()).filter(|l| !l.is_empty()) {
        config.license = license;
    }
}
