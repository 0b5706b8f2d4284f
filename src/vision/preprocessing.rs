// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the CLIP vision encoder

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use ndarray::Array4;

/// Input resolution of the ViT-B/32 vision encoder
pub const CLIP_INPUT_SIZE: u32 = 224;

/// Mean values for normalization (CLIP training set)
pub const CLIP_MEAN: [f32; 3] = [0.481_454_66, 0.457_827_5, 0.408_210_73];

/// Std values for normalization (CLIP training set)
pub const CLIP_STD: [f32; 3] = [0.268_629_54, 0.261_302_58, 0.275_777_11];

/// The fixed transform paired with a CLIP vision encoder
///
/// Steps:
/// 1. Convert to RGB (alpha dropped, grayscale expanded)
/// 2. Keep the window a shortest-side resize plus center crop would keep
///    (see [`crop_window`])
/// 3. Resize that window to `input_size` x `input_size` (bicubic)
/// 4. Normalize: (pixel / 255 - mean) / std
/// 5. Lay out as NCHW with a batch dimension of 1
#[derive(Debug, Clone)]
pub struct ClipPreprocessor {
    input_size: u32,
    mean: [f32; 3],
    std: [f32; 3],
}

impl Default for ClipPreprocessor {
    fn default() -> Self {
        Self::new(CLIP_INPUT_SIZE)
    }
}

impl ClipPreprocessor {
    pub fn new(input_size: u32) -> Self {
        Self {
            input_size: input_size.max(1),
            mean: CLIP_MEAN,
            std: CLIP_STD,
        }
    }

    /// Side length of the square tensor produced by [`preprocess`](Self::preprocess)
    pub fn input_size(&self) -> u32 {
        self.input_size
    }

    /// Shape of the tensor handed to the vision encoder
    pub fn tensor_shape(&self) -> [usize; 4] {
        let size = self.input_size as usize;
        [1, 3, size, size]
    }

    pub fn preprocess(&self, image: &DynamicImage) -> Array4<f32> {
        let size = self.input_size;
        let (x, y, w, h) = crop_window(image.dimensions(), size);

        // Crop first: resize cost must not scale with the aspect ratio
        let window = DynamicImage::ImageRgb8(image.crop_imm(x, y, w, h).to_rgb8());
        let cropped = window
            .resize_exact(size, size, FilterType::CatmullRom)
            .to_rgb8();

        let mut tensor = Array4::zeros(self.tensor_shape());

        for (x, y, pixel) in cropped.enumerate_pixels() {
            for c in 0..3 {
                tensor[[0, c, y as usize, x as usize]] =
                    (pixel[c] as f32 / 255.0 - self.mean[c]) / self.std[c];
            }
        }

        tensor
    }
}

/// Source-space `(x, y, width, height)` of the square a shortest-side
/// resize to `target` followed by a center crop would keep
///
/// The resized long side is truncated the way torchvision's `Resize(int)`
/// does before the crop offset is taken.
pub fn crop_window(dimensions: (u32, u32), target: u32) -> (u32, u32, u32, u32) {
    let (width, height) = (dimensions.0.max(1), dimensions.1.max(1));
    if width <= height {
        let (start, len) = long_axis_window(width, height, target);
        (0, start, width, len)
    } else {
        let (start, len) = long_axis_window(height, width, target);
        (start, 0, len, height)
    }
}

fn long_axis_window(short: u32, long: u32, target: u32) -> (u32, u32) {
    let target = target.max(1);
    let resized = (target as u64 * long as u64 / short as u64).max(target as u64);
    let scale = long as f64 / resized as f64;

    let offset = center_offset(resized, target as u64) as f64;
    let start = ((offset * scale).round() as u32).min(long - 1);
    let len = ((target as f64 * scale).round() as u32).clamp(1, long - start);
    (start, len)
}

fn center_offset(length: u64, crop: u64) -> u64 {
    (length.saturating_sub(crop) as f64 / 2.0).round_ties_even() as u64
}
