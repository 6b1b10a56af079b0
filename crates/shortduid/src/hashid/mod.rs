mod codec;
mod config;
mod reorder;

pub use codec::*;
pub use config::*;
