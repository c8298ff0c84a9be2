// Application layer - the state a front end owns and the use cases it calls.
// Every query re-reads the ledger file; nothing is cached between calls.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
