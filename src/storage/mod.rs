pub mod record;
mod repository;

pub use repository::*;
