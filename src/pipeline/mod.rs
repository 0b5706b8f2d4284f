// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Request pipelines
//!
//! Each pipeline is one linear pass: raw input -> encoder tensor ->
//! [`ModelHost`](crate::embeddings::ModelHost) forward pass ->
//! [`normalize`](crate::embeddings::normalize). Both are blocking and
//! must be called from `spawn_blocking` inside async handlers.

pub mod image;
pub mod text;

pub use image::embed_image;
pub use text::embed_text;
