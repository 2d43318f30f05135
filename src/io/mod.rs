pub mod chat;
pub mod export;

pub use chat::*;
pub use export::*;
