//! Role administration limits.

use serde::{Deserialize, Serialize};

/// Constraints applied when roles are created or replaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RbacConfig {
    /// Maximum role name length in characters, after trimming.
    #[serde(default = "default_max_name_length")]
    pub max_role_name_length: usize,
}

impl Default for RbacConfig {
    fn default() -> Self {
        Self {
            max_role_name_length: default_max_name_length(),
        }
    }
}

fn default_max_name_length() -> usize {
    100
}
