pub mod build_info;

use std::sync::Once;

use tracing_subscriber::filter::LevelFilter;

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber, defaulting to `dojo_admin=info`
/// unless `RUST_LOG` says otherwise.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let mut filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy();
        if let Ok(directive) = "dojo_admin=info".parse() {
            filter = filter.add_directive(directive);
        }

        // A subscriber may already be installed by the host (tests, embedders).
        let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
    });
}
