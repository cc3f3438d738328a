// Application state module
// Immutable per-process state shared by every connection

use super::types::Config;
use crate::guard::UrlValidator;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Compiled once from `validation`
    pub validator: UrlValidator,
    /// Cached trigger path, e.g. `/api/smmsg`
    pub function_route: String,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            validator: UrlValidator::from_config(&config.validation),
            function_route: config.function.route(),
        }
    }
}
