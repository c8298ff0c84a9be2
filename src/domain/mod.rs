mod aggregate;
mod expense;
mod money;

pub use aggregate::*;
pub use expense::*;
pub use money::*;
