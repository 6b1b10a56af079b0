mod unique;

pub use unique::*;
