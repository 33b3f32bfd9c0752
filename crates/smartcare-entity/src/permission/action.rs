//! Actions checked against a module's permission flags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One unit of permission granularity. Identical for every module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Read records.
    View,
    /// Add records.
    Create,
    /// Modify records.
    Update,
    /// Remove records.
    Delete,
}

impl Action {
    /// Every action, in matrix column order.
    pub const ALL: [Action; 4] = [Self::View, Self::Create, Self::Update, Self::Delete];

    /// Return the action as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Exact match on the stored key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == key)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = smartcare_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "view" => Ok(Self::View),
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(smartcare_core::AppError::validation(format!(
                "Invalid action: '{s}'. Expected one of: view, create, update, delete"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("view".parse::<Action>().unwrap(), Action::View);
        assert_eq!("Delete".parse::<Action>().unwrap(), Action::Delete);
        assert!("approve".parse::<Action>().is_err());
        assert_eq!(Action::from_key("Delete"), None);
    }
}
