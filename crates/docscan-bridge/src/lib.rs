// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docscan-bridge — Contracts of the native document reader SDK.
//
// The scan session talks to the reader only through the traits defined
// here. Native builds provide an implementation backed by the vendor SDK;
// everywhere else the stub answers `PlatformUnavailable`.

pub mod events;
pub mod stub;
pub mod traits;

pub use events::{NfcEvent, NfcEventReceiver, NfcEventSender, ReadErrorEvent, progress_percent};
pub use traits::{
    Activation, DocumentDetector, DocumentScan, DocumentScanRequest, FaceCamera, Jp2Decoder,
    MrzScanOptions, MrzScanner, NfcReader, NfcScanRequest, ReaderBridge, SdkActivation,
};

/// The reader bridge for the target platform.
pub fn platform_bridge() -> Box<dyn ReaderBridge> {
    Box::new(stub::StubBridge)
}
