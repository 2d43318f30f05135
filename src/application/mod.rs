// Application layer - use cases and orchestration:
// - LedgerService owns the ledger state and serializes mutate + save
// - Command/CommandRequest validate what a transport delivers
// - CommandProcessor turns commands into replies

pub mod command;
pub mod error;
pub mod menu;
pub mod processor;
pub mod service;

pub use command::*;
pub use error::*;
pub use processor::*;
pub use service::*;
