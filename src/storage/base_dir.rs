//! Storage base directory precedence.

use std::path::PathBuf;

/// Environment variable that overrides the configured base directory.
pub const STORE_DIR_ENV: &str = "CHERAMI_STORE";

/// Pick the storage base directory.
///
/// First non-empty value wins: command line, then environment, then
/// declarative config. `None` leaves the choice to the store host.
pub fn resolve_base_dir(cli_arg: &str, env_var: &str, config_value: &str) -> Option<PathBuf> {
    [cli_arg, env_var, config_value]
        .into_iter()
        .find(|candidate| !candidate.is_empty())
        .map(PathBuf::from)
}
