//! UODecode Core - Fundamental types shared by the decoder crates

mod error;
mod types;
mod version;

pub use error::*;
pub use types::*;
pub use version::*;
