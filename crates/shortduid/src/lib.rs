mod error;
mod generator;
mod hashid;
mod id;
#[cfg(feature = "random")]
mod random;
mod short_duid;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::hashid::*;
pub use crate::id::*;
#[cfg(feature = "random")]
pub use crate::random::*;
pub use crate::short_duid::*;
pub use crate::time::*;
