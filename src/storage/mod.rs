pub mod cache;
pub mod json_backend;

use crate::errors::DojoError;

pub type Result<T> = std::result::Result<T, DojoError>;

pub use cache::ListCache;
pub use json_backend::{JsonStore, Stored};
