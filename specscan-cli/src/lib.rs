pub mod config;
pub mod error;
pub mod input;
pub mod render;

pub use config::*;
pub use error::*;
pub use input::*;
pub use render::*;
