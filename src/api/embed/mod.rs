// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding API Module
//!
//! This module provides the POST /embed/image and POST /embed/caption
//! endpoints, both returning one L2-normalized CLIP embedding.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{caption_handler, image_handler, IMAGE_FIELD};
pub use request::CaptionRequest;
pub use response::EmbedResponse;
