pub mod clean;
pub mod import;

pub use clean::*;
pub use import::*;
