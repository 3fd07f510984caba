// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document Scanner — headless scan flow runner
//
// Entry point. Initialises logging and configuration, builds the scan
// orchestrator on the platform reader bridge, runs one scan flow and prints
// the resulting record as JSON.
//
// Usage: docscan [passport | id-card | driver | document]

mod services;

use std::collections::BTreeMap;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;

use docscan_bridge::platform_bridge;
use docscan_core::error::{Result, ScanError};
use docscan_core::types::{DataGroup, DocumentKind, ImageType, MrzCredentials, ScanSession, SessionId};
use docscan_session::{LogSink, ScanOrchestrator};
use serde::Serialize;

use services::config_store::{self, LICENSE_ENV};
use services::data_dir::data_dir;

/// How the session's credentials are captured before the chip read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Mrz(DocumentKind),
    Document,
}

impl FromStr for Flow {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "passport" => Ok(Self::Mrz(DocumentKind::Passport)),
            "id-card" | "id" => Ok(Self::Mrz(DocumentKind::IdCard)),
            "driver" | "driver-license" => Ok(Self::Mrz(DocumentKind::DriverLicense)),
            "document" => Ok(Self::Document),
            other => Err(format!(
                "unknown flow {other:?} (expected passport, id-card, driver or document)"
            )),
        }
    }
}

/// What the binary prints after a completed flow.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanReport {
    session_id: SessionId,
    session: ScanSession,
    credentials: MrzCredentials,
    images: Vec<ImageType>,
    fingerprints: BTreeMap<DataGroup, String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let flow = match std::env::args().nth(1).as_deref().unwrap_or("passport").parse::<Flow>() {
        Ok(flow) => flow,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };
    tracing::info!(?flow, "Document Scanner starting");

    match run(flow).await {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "could not render the scan report");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "scan flow failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(flow: Flow) -> Result<ScanReport> {
    let dir = data_dir();
    let mut config = match config_store::load_config(&dir) {
        Some(config) => config,
        None => {
            let config = docscan_core::ScanConfig::default();
            if let Err(e) = config_store::persist_config(&dir, &config) {
                tracing::warn!(error = %e, "could not write default configuration");
            }
            config
        }
    };
    config_store::apply_license_override(&mut config, std::env::var(LICENSE_ENV).ok());

    let orchestrator = ScanOrchestrator::new(Arc::from(platform_bridge()), Arc::new(LogSink), config);
    orchestrator.initialize().await?;

    match flow {
        Flow::Mrz(kind) => orchestrator.begin_mrz_scan(kind).await?,
        Flow::Document => orchestrator.scan_document().await?,
    };
    let session = orchestrator.begin_nfc_read().await?;

    let credentials = orchestrator.credentials().ok_or(ScanError::MrzRequired)?;
    Ok(ScanReport {
        session_id: orchestrator.session_id(),
        session,
        credentials,
        images: orchestrator.images().iter().map(|i| i.image_type).collect(),
        fingerprints: orchestrator.fingerprints(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_names() {
        assert_eq!("passport".parse::<Flow>(), Ok(Flow::Mrz(DocumentKind::Passport)));
        assert_eq!("id-card".parse::<Flow>(), Ok(Flow::Mrz(DocumentKind::IdCard)));
        assert_eq!("driver".parse::<Flow>(), Ok(Flow::Mrz(DocumentKind::DriverLicense)));
        assert_eq!("document".parse::<Flow>(), Ok(Flow::Document));
        assert!("visa".parse::<Flow>().is_err());
    }

    #[tokio::test]
    async fn desktop_bridge_cannot_activate() {
        let orchestrator = ScanOrchestrator::new(
            Arc::from(platform_bridge()),
            Arc::new(LogSink),
            docscan_core::ScanConfig::default(),
        );
        let err = orchestrator.initialize().await.unwrap_err();
        assert!(matches!(err, ScanError::Initialization(_)));
        assert!(!orchestrator.is_initialized());
    }
}
