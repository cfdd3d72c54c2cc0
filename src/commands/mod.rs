//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI
//! args and runs one browse session against the configured source.

pub mod browse;
pub mod export;

// Re-export execute functions for convenience
pub use browse::execute as browse;
pub use export::execute as export;

use tracing::debug;

use crate::UaBrowseError;
use crate::browse::{BrowseConfig, Browser};
use crate::cli::{SecurityArgs, SessionArgs};
use crate::config::UabrowseConfig;
use crate::model::BrowseResult;
use crate::source::connect;

type Result<T> = std::result::Result<T, UaBrowseError>;

/// Resolve the endpoint from CLI args or the configured default
fn resolve_endpoint(session: &SessionArgs, config: &UabrowseConfig) -> Result<String> {
    session
        .server_url
        .clone()
        .or_else(|| config.default_server_url.clone())
        .ok_or_else(|| {
            UaBrowseError::InvalidInput(
                "No server endpoint given. Use -s/--server-url or set default_server_url \
                 in the config file."
                    .into(),
            )
        })
}

/// Build a validated browse configuration from session args
fn browse_config(session: &SessionArgs, config: &UabrowseConfig) -> Result<BrowseConfig> {
    let depth = session.depth.unwrap_or(config.default_depth);
    let browse = BrowseConfig::new(&session.node_id, depth)?
        .include_values(session.include_values)
        .namespace_filter(session.namespace)
        .namespaces_only(session.namespaces_only);
    Ok(browse)
}

/// Run one browse session for the given CLI arguments
///
/// Connection and option validation errors are returned; a session that
/// fails mid-walk comes back as a `success = false` result instead.
fn run_session(
    session: &SessionArgs,
    security: &SecurityArgs,
    config: &UabrowseConfig,
    include_extended: bool,
) -> Result<BrowseResult> {
    let endpoint = resolve_endpoint(session, config)?;
    let browse = browse_config(session, config)?.include_extended(include_extended);
    debug!(endpoint = %endpoint, start = %browse.start_node(), "Session configured");

    let options = security.connect_options(endpoint);
    let source = connect(&options)?;
    Ok(Browser::new(browse).browse(source.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        session: SessionArgs,
    }

    fn session(args: &[&str]) -> SessionArgs {
        let mut argv = vec!["test"];
        argv.extend_from_slice(args);
        Wrapper::parse_from(argv).session
    }

    #[test]
    fn test_endpoint_falls_back_to_config() {
        let config = UabrowseConfig {
            default_server_url: Some("demo".to_string()),
            ..UabrowseConfig::default()
        };
        let endpoint = resolve_endpoint(&session(&[]), &config).unwrap();
        assert_eq!(endpoint, "demo");
    }

    #[test]
    fn test_missing_endpoint_is_invalid_input() {
        let err = resolve_endpoint(&session(&[]), &UabrowseConfig::default()).unwrap_err();
        assert!(matches!(err, UaBrowseError::InvalidInput(_)));
    }

    #[test]
    fn test_cli_endpoint_wins_over_config() {
        let config = UabrowseConfig {
            default_server_url: Some("opc.tcp://configured:4840".to_string()),
            ..UabrowseConfig::default()
        };
        let endpoint = resolve_endpoint(&session(&["-s", "demo"]), &config).unwrap();
        assert_eq!(endpoint, "demo");
    }

    #[test]
    fn test_depth_falls_back_to_config() {
        let config = UabrowseConfig {
            default_depth: 9,
            ..UabrowseConfig::default()
        };
        let browse = browse_config(&session(&[]), &config).unwrap();
        assert_eq!(browse.max_depth(), 9);
        let browse = browse_config(&session(&["-d", "2"]), &config).unwrap();
        assert_eq!(browse.max_depth(), 2);
    }

    #[test]
    fn test_bad_start_node_surfaces_as_node_id_error() {
        let err = browse_config(&session(&["-n", "bogus"]), &UabrowseConfig::default())
            .unwrap_err();
        assert!(matches!(err, UaBrowseError::NodeId(_)));
    }
}
