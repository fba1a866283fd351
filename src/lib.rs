#![doc(test(attr(deny(warnings))))]

//! Back-office core for a martial-arts school.
//!
//! The crate holds the draft models and step wizards used to create classes,
//! events and membership plans, the product catalog and finances list views,
//! a JSON-file store, and an interactive shell (`dojo_admin_cli`) on top.
//!
//! Wizards are driven through [`wizard::Sequencer`] and saved with
//! [`wizard::Sequencer::handle_final_step`] against any [`wizard::CatalogClient`];
//! [`storage::JsonStore`] is the bundled client.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod finances;
pub mod storage;
pub mod utils;
pub mod wizard;

pub use errors::{DojoError, Result};

use std::sync::Once;

static STARTUP: Once = Once::new();

/// Installs the tracing subscriber once per process and logs the build.
pub fn init() {
    STARTUP.call_once(|| {
        utils::init_tracing();
        let build = utils::build_info::current();
        tracing::info!(version = build.version, git = build.git_hash, "dojo_admin starting");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn repeated_init_is_harmless() {
        super::init();
        super::init();
    }
}
