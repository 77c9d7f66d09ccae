pub mod config;
pub mod document;
pub mod error;
pub mod io;
pub mod paths;
pub mod spec;
pub mod task;
pub mod types;

pub use error::{Result, SpecError};
