//! Tracing subscriber setup per [`LogProfile`].

use crate::config::LogProfile;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides the profile's default filter.
pub fn init(profile: LogProfile) -> Result<(), SetGlobalDefaultError> {
    let default_filter = match profile {
        LogProfile::Production => "fresh_server=info,tower_http=info",
        LogProfile::Development => "fresh_server=debug,tower_http=debug",
        LogProfile::Off => return Ok(()),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    match profile {
        LogProfile::Production => tracing::subscriber::set_global_default(
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_current_span(true)
                .finish(),
        ),
        _ => tracing::subscriber::set_global_default(
            tracing_subscriber::fmt().with_env_filter(filter).finish(),
        ),
    }
}
