pub mod aggregate;
pub mod trade;

pub use aggregate::*;
pub use trade::*;
