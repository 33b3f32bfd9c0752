//! Protectable resource areas of the admin panel.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A protectable resource area.
///
/// The set is closed: adding a module means shipping a new build. Data
/// written by a build with a different module set is reconciled by
/// [`PermissionMatrix::normalize`](super::PermissionMatrix::normalize).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    /// Customer records.
    Customers,
    /// Employee accounts and payroll details.
    Employees,
    /// Job positions.
    Positions,
    /// Roles and their permission matrices.
    Permissions,
}

impl Module {
    /// Every module, in display order.
    pub const ALL: [Module; 4] = [
        Self::Customers,
        Self::Employees,
        Self::Positions,
        Self::Permissions,
    ];

    /// Return the module key as stored and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::Employees => "employees",
            Self::Positions => "positions",
            Self::Permissions => "permissions",
        }
    }

    /// Exact match on the stored key. Case and whitespace are significant.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == key)
    }

    /// Label shown in the admin panel.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Customers => "ลูกค้า",
            Self::Employees => "พนักงาน",
            Self::Positions => "ตำแหน่ง",
            Self::Permissions => "สิทธิ์การใช้งาน",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Module {
    type Err = smartcare_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "customers" => Ok(Self::Customers),
            "employees" => Ok(Self::Employees),
            "positions" => Ok(Self::Positions),
            "permissions" => Ok(Self::Permissions),
            _ => Err(smartcare_core::AppError::validation(format!(
                "Invalid module: '{s}'. Expected one of: customers, employees, positions, permissions"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_round_trips_every_module() {
        for module in Module::ALL {
            assert_eq!(module.as_str().parse::<Module>().unwrap(), module);
        }
        assert_eq!("CUSTOMERS".parse::<Module>().unwrap(), Module::Customers);
        assert!("invoices".parse::<Module>().is_err());
    }

    #[test]
    fn test_from_key_is_exact() {
        assert_eq!(Module::from_key("positions"), Some(Module::Positions));
        assert_eq!(Module::from_key("Positions"), None);
        assert_eq!(Module::from_key(" positions"), None);
    }
}
