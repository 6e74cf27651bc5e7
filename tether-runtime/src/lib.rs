pub mod abi;
pub mod config;
mod handle;
mod registry;
mod runtime;

pub use config::TetherConfig;
pub use handle::{TensorHandle, TensorRef};
pub use registry::HandleRegistry;
pub use runtime::Runtime;
pub use tether_common::{Error, Result};
