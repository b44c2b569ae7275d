pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod lang;
pub mod registry;
pub mod scanner;
pub mod store;
pub mod utils;

pub use error::{Error, Result};
