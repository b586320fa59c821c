pub mod async_types;
pub mod bitmap;
pub mod config;
pub mod error;
pub mod frame;
pub mod transit;
pub mod weather;

pub use async_types::*;
pub use bitmap::*;
pub use config::*;
pub use error::*;
pub use frame::*;
pub use transit::*;
pub use weather::*;
