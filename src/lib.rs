pub mod fetch_data;
pub mod model;
pub mod pipeline;
pub mod visualize;

#[cfg(feature = "full")]
pub mod export;
#[cfg(feature = "full")]
pub mod logs;
#[cfg(feature = "wasm")]
pub mod wasm;
