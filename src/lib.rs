pub mod config;
pub mod error;
pub mod identity;
pub mod metadata;
pub mod mint;
pub mod update;
pub mod uploader;
pub mod utils;

pub use error::{Error, Result};
