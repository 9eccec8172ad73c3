pub mod containers;
pub mod types;

pub use containers::ContainerRow;
pub use types::*;
