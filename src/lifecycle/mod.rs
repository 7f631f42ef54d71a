//! Model lifecycle: the [`ModelHandle`] shared by every request and the one-shot startup load.
//!
//! The handle is built once before the listener binds and never mutated afterwards. A failed
//! load leaves it [`ModelHandle::Unloaded`] for the life of the process; there is no retry.

/// The `Unloaded`/`Ready` handle.
pub mod handle;
/// Startup loading on a blocking worker.
pub mod loader;


pub use handle::{ModelHandle, ModelState};
pub use loader::load_model_handle;
