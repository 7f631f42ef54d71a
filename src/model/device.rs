use candle_core::Device;
use tracing::{debug, info, warn};

use super::error::ModelError;

/// Opens the device with the given ordinal.
pub(crate) type DeviceOpener = fn(usize) -> candle_core::Result<Device>;

/// A GPU backend and whether this build compiled it in.
pub(crate) struct GpuBackend {
    pub name: &'static str,
    pub compiled: bool,
    pub open: DeviceOpener,
}

const GPU_BACKENDS: &[GpuBackend] = &[
    GpuBackend {
        name: "metal",
        compiled: cfg!(feature = "metal"),
        open: Device::new_metal,
    },
    GpuBackend {
        name: "cuda",
        compiled: cfg!(feature = "cuda"),
        open: Device::new_cuda,
    },
];

/// Picks the device the language model runs on.
///
/// Builds without a GPU feature score on the CPU. A build with `metal` or `cuda` requires that
/// GPU: if none of the compiled backends opens, loading fails with
/// [`ModelError::DeviceUnavailable`] and the service stays unloaded.
pub fn select_device() -> Result<Device, ModelError> {
    select_from(GPU_BACKENDS)
}

pub(crate) fn select_from(backends: &[GpuBackend]) -> Result<Device, ModelError> {
    let compiled: Vec<&GpuBackend> = backends.iter().filter(|b| b.compiled).collect();
    if compiled.is_empty() {
        debug!("No GPU backend compiled, scoring on CPU");
        return Ok(Device::Cpu);
    }

    let mut failures = Vec::with_capacity(compiled.len());
    for backend in &compiled {
        match (backend.open)(0) {
            Ok(device) => {
                info!(backend = backend.name, "Scoring on GPU");
                return Ok(device);
            }
            Err(e) => {
                warn!(backend = backend.name, error = %e, "GPU backend failed to open");
                failures.push(format!("{}: {}", backend.name, e));
            }
        }
    }

    Err(ModelError::DeviceUnavailable {
        device: compiled
            .iter()
            .map(|b| b.name)
            .collect::<Vec<_>>()
            .join("/"),
        reason: failures.join("; "),
    })
}
