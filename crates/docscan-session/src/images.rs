// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ordered image collection of a scan session.

use docscan_core::types::{Image, ImageType};
use serde::Serialize;

/// Insertion-ordered images with per-tag eviction.
///
/// Holds at most one `VERIFIED_FACE` and one `UNVERIFIED_FACE`. A verified
/// face also evicts the unverified one and is placed first. `FRONT` and
/// `BACK` are appended as they come.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ImageCollection {
    images: Vec<Image>,
}

impl ImageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, image: Image) {
        match image.image_type {
            ImageType::VerifiedFace => {
                self.images.retain(|i| {
                    !matches!(
                        i.image_type,
                        ImageType::VerifiedFace | ImageType::UnverifiedFace
                    )
                });
                self.images.insert(0, image);
            }
            ImageType::UnverifiedFace => {
                self.images
                    .retain(|i| i.image_type != ImageType::UnverifiedFace);
                self.images.push(image);
            }
            ImageType::Front | ImageType::Back => self.images.push(image),
        }
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    pub fn count(&self, image_type: ImageType) -> usize {
        self.images
            .iter()
            .filter(|i| i.image_type == image_type)
            .count()
    }

    pub fn first_of(&self, image_type: ImageType) -> Option<&Image> {
        self.images.iter().find(|i| i.image_type == image_type)
    }

    pub fn as_slice(&self) -> &[Image] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
