// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docscan-session — scan session orchestration.
//
// Owns the session state (credentials, images, NFC progress), drives the
// reader bridge through activation, MRZ, NFC and document detection, and
// folds chip data groups back into the credentials.

pub mod images;
pub mod normalizer;
pub mod notify;
pub mod orchestrator;
pub mod state;

#[cfg(test)]
mod testing;

pub use images::ImageCollection;
pub use normalizer::{CredentialsPatch, DataGroupNormalizer, Normalized};
pub use notify::{LogSink, MessageSink, Notifier};
pub use orchestrator::ScanOrchestrator;
