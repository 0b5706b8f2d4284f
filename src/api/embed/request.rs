// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Request body for POST /embed/caption

use serde::{Deserialize, Serialize};

/// Request body for POST /embed/caption
///
/// The caption is passed to the tokenizer unchanged. Length is enforced in
/// tokens (the model's context length), not characters, and the empty
/// string is a valid caption.
///
/// # Example
/// ```json
/// {
///   "caption": "a dog on the beach"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionRequest {
    pub caption: String,
}
