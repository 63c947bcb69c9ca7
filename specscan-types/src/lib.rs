pub mod channel;
pub mod error;
pub mod kind;
pub mod sample;

pub use channel::*;
pub use error::*;
pub use kind::*;
pub use sample::*;
