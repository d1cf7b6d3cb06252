use std::sync::OnceLock;

use log::error;
use tracing_subscriber::prelude::*;
use tracing_subscriber::reload::Handle;
use tracing_subscriber::{EnvFilter, Registry};

use crate::commands::Verbosity;

static LOGGER_HANDLE: OnceLock<Handle<EnvFilter, Registry>> = OnceLock::new();

/// Filter directives for a verbosity level.
fn log_filter(verbosity: Verbosity) -> &'static str {
    match verbosity {
        // Show only errors
        Verbosity::Quiet => "off,marquee=error",
        // Only show warnings
        Verbosity::Verbose(0) => "off,marquee=warn,marquee_core=warn,marquee_catalog=warn",
        // Show our own info logs
        Verbosity::Verbose(1) => "off,marquee=info,marquee_core=info,marquee_catalog=info",
        // Also show debug from our libraries
        Verbosity::Verbose(2) => "off,marquee=debug,marquee_core=debug,marquee_catalog=debug",
        // Also show trace from our libraries
        Verbosity::Verbose(3) => "off,marquee=trace,marquee_core=trace,marquee_catalog=trace",
        // Also show debug from dependencies, e.g. the http client
        Verbosity::Verbose(4) => "debug,marquee=trace,marquee_core=trace,marquee_catalog=trace",
        Verbosity::Verbose(_) => "trace",
    }
}

/// Install the global subscriber, or update its filter if already installed.
///
/// `RUST_LOG` takes precedence over the verbosity flags.
pub(crate) fn init_logger(verbosity: Option<Verbosity>) {
    let log_filter = log_filter(verbosity.unwrap_or_default());

    let filter_handle = LOGGER_HANDLE.get_or_init(|| {
        // Start wide open, `log` records are capped by the first filter installed.
        // The actual level is set right below.
        let filter = EnvFilter::new("trace");
        let (filter, reload_handle) = tracing_subscriber::reload::Layer::new(filter);
        let log_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(filter);
        tracing_subscriber::registry().with(log_layer).init();
        reload_handle
    });

    update_filters(filter_handle, log_filter);
}

fn update_filters(filter_handle: &Handle<EnvFilter, Registry>, log_filter: &str) {
    let result = filter_handle.modify(|layer| {
        match EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_filter)) {
            Ok(new_filter) => *layer = new_filter,
            Err(err) => {
                error!("Updating logger filter failed: {}", err);
            },
        };
    });
    if let Err(err) = result {
        error!("Updating logger filter failed: {}", err);
    }
}
