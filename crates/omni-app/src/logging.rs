//! Logging bootstrap with a runtime-switchable filter.
//!
//! The `EnvFilter` sits behind a `reload` layer so the host UI's debug
//! toggle can swap it without restarting.

use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Filter used while debug logging is switched on from the host UI.
pub const DEBUG_DIRECTIVE: &str = "omni=debug";

#[derive(Clone)]
pub struct LogControl {
    handle: reload::Handle<EnvFilter, Registry>,
    base: String,
}

impl LogControl {
    /// Install the global subscriber filtered by `directive`.
    pub fn init(directive: &str) -> Self {
        let (filter, handle) = reload::Layer::new(build_filter(directive));
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
        Self {
            handle,
            base: directive.to_string(),
        }
    }

    /// Replace the base directive (e.g. once the config level is known).
    pub fn set_base(&mut self, directive: &str) {
        self.base = directive.to_string();
        self.apply(directive);
    }

    /// Switch between [`DEBUG_DIRECTIVE`] and the base directive. Returns
    /// whether debug logging is now on.
    pub fn set_debug(&self, enabled: bool) -> bool {
        let directive = active_directive(&self.base, enabled);
        self.apply(directive) && enabled
    }

    fn apply(&self, directive: &str) -> bool {
        match self.handle.reload(build_filter(directive)) {
            Ok(()) => {
                tracing::info!(directive, "log filter updated");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to update log filter");
                false
            }
        }
    }
}

fn active_directive(base: &str, debug: bool) -> &str {
    if debug {
        DEBUG_DIRECTIVE
    } else {
        base
    }
}

fn build_filter(directive: &str) -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    match directive.parse::<Directive>() {
        Ok(d) => filter.add_directive(d),
        Err(e) => {
            eprintln!("invalid log filter {directive:?} ({e}), using info");
            filter.add_directive(LevelFilter::INFO.into())
        }
    }
}
