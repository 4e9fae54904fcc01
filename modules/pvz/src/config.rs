use serde::{Deserialize, Serialize};

use crate::domain::report::{DEFAULT_LIMIT, DEFAULT_PAGE};

/// Configuration for the pvz module (`modules.pvz` in the app config)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PvzConfig {
    #[serde(default = "default_page")]
    pub default_page: i64,
    #[serde(default = "default_limit")]
    pub default_limit: i64,
}

impl Default for PvzConfig {
    fn default() -> Self {
        Self {
            default_page: default_page(),
            default_limit: default_limit(),
        }
    }
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}
