pub mod config;
pub mod convert;
pub mod dom;
pub mod error;
pub mod handlers;
pub mod overlay;
pub mod scan;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use error::{Error, Result};
