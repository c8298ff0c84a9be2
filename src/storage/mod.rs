mod atomic;
mod error;
mod store;
mod table;

pub use atomic::*;
pub use error::*;
pub use store::*;
pub use table::*;
