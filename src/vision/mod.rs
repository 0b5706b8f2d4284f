// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image handling for the CLIP vision encoder
//!
//! This module provides:
//! - Decoding of uploaded image bytes (PNG, JPEG, WebP, GIF, BMP, TIFF)
//! - The fixed CLIP transform (resize, center-crop, normalize, NCHW)

pub mod image_utils;
pub mod preprocessing;

pub use image_utils::{
    decode_image_bytes, detect_format, ImageError, ImageInfo, DEFAULT_MAX_IMAGE_BYTES,
};
pub use preprocessing::{crop_window, ClipPreprocessor, CLIP_INPUT_SIZE, CLIP_MEAN, CLIP_STD};
