// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Compute device selection
//!
//! The device is resolved exactly once, when the model host is built, and
//! the result is stored alongside the encoders. Requests never re-query it.

use crate::embeddings::EmbeddingError;
use clap::ValueEnum;
use ort::execution_providers::{
    CPUExecutionProvider, CUDAExecutionProvider, ExecutionProvider, ExecutionProviderDispatch,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// How the device should be chosen at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStrategy {
    /// CUDA when ONNX Runtime reports it available, CPU otherwise
    #[default]
    Auto,
    /// Always CPU
    Cpu,
    /// CUDA or fail startup
    Cuda,
}

/// The device every encoder call runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Cpu,
    Cuda,
}

impl DeviceStrategy {
    /// Resolves the strategy against the ONNX Runtime build in this process
    pub fn resolve(self) -> Result<Device, EmbeddingError> {
        self.resolve_with(cuda_available)
    }

    /// Resolves the strategy with an explicit CUDA probe
    pub fn resolve_with(self, cuda_probe: impl FnOnce() -> bool) -> Result<Device, EmbeddingError> {
        match self {
            DeviceStrategy::Cpu => Ok(Device::Cpu),
            DeviceStrategy::Cuda => {
                if cuda_probe() {
                    Ok(Device::Cuda)
                } else {
                    Err(EmbeddingError::ModelLoad(
                        "CUDA device requested but the CUDA execution provider is not available"
                            .to_string(),
                    ))
                }
            }
            DeviceStrategy::Auto => {
                if cuda_probe() {
                    Ok(Device::Cuda)
                } else {
                    Ok(Device::Cpu)
                }
            }
        }
    }
}

impl Device {
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Cpu => "cpu",
            Device::Cuda => "cuda",
        }
    }

    pub fn is_accelerator(&self) -> bool {
        matches!(self, Device::Cuda)
    }

    /// Execution providers for an ONNX session pinned to this device.
    /// CUDA registration errors are fatal so a session never silently
    /// lands on the CPU while reporting "cuda".
    pub fn execution_providers(&self) -> Vec<ExecutionProviderDispatch> {
        match self {
            Device::Cpu => vec![CPUExecutionProvider::default().build()],
            Device::Cuda => vec![CUDAExecutionProvider::default().build().error_on_failure()],
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether this ONNX Runtime build can register the CUDA provider
pub fn cuda_available() -> bool {
    match CUDAExecutionProvider::default().is_available() {
        Ok(available) => available,
        Err(e) => {
            debug!("CUDA availability probe failed: {}", e);
            false
        }
    }
}
