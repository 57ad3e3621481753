pub mod board;
pub mod date_serde;
pub mod error;
pub mod ordering;
pub mod predicate;
pub mod priority;
pub mod query;
pub mod remote;
pub mod water;

pub use error::{Error, Result};
