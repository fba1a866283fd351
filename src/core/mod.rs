//! Filesystem helpers shared by configuration and storage.

pub mod utils;
