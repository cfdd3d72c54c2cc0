//! Browse command - walk an address space and print it as a tree

use crate::UaBrowseError;
use crate::cli::{SecurityArgs, SessionArgs};
use crate::config::UabrowseConfig;
use crate::output;

type Result<T> = std::result::Result<T, UaBrowseError>;

/// Execute the browse command
///
/// A session that fails mid-walk still prints everything collected before
/// the failure, then surfaces the failure as an error so the process exits
/// non-zero.
///
/// # Errors
///
/// Returns `UaBrowseError` for invalid arguments, connection failures, or a
/// session that did not complete.
pub fn execute(
    session: &SessionArgs,
    security: &SecurityArgs,
    config: &UabrowseConfig,
    quiet: bool,
) -> Result<()> {
    let result = super::run_session(session, security, config, false)?;

    output::print_result(&result, quiet);

    if result.success {
        Ok(())
    } else {
        Err(UaBrowseError::SessionFailed(
            result
                .error_message
                .unwrap_or_else(|| "browse session failed".to_string()),
        ))
    }
}
