//! The module x action permission grid owned by a role.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use smartcare_core::error::AppError;
use smartcare_core::result::AppResult;

use super::action::Action;
use super::flags::PermissionFlags;
use super::module::Module;

/// Flags of one module as sent by clients: action key to value.
pub type RawFlags = BTreeMap<String, bool>;

/// Permissions as sent over the wire: module key to action key to value.
///
/// Keys are free-form strings here; they become [`Module`]s and
/// [`Action`]s when the map is turned into a [`PermissionMatrix`].
pub type RawPermissions = BTreeMap<String, RawFlags>;

/// Module to flags mapping.
///
/// A value type: [`set`](Self::set) and [`normalize`](Self::normalize)
/// return new matrices and never touch the receiver. A module without an
/// entry reads as all-false.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionMatrix {
    entries: BTreeMap<Module, PermissionFlags>,
}

impl PermissionMatrix {
    /// An empty matrix (every lookup is `false`).
    pub fn new() -> Self {
        Self::default()
    }

    /// A normalized matrix granting every action on every module.
    pub fn full() -> Self {
        Self {
            entries: Module::ALL
                .into_iter()
                .map(|m| (m, PermissionFlags::ALL))
                .collect(),
        }
    }

    /// Stored flag for `(module, action)`, `false` if the module is absent.
    pub fn get(&self, module: Module, action: Action) -> bool {
        self.flags(module).get(action)
    }

    /// Flags for `module`, all-false if absent.
    pub fn flags(&self, module: Module) -> PermissionFlags {
        self.entries.get(&module).copied().unwrap_or_default()
    }

    /// Return a matrix with exactly one flag changed.
    pub fn set(&self, module: Module, action: Action, value: bool) -> Self {
        self.clone().with(module, action, value)
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, module: Module, action: Action, value: bool) -> Self {
        let flags = self.flags(module).with(action, value);
        self.entries.insert(module, flags);
        self
    }

    /// Return a matrix where every module has an entry (missing ones all-false).
    pub fn normalize(&self) -> Self {
        let entries = Module::ALL
            .into_iter()
            .map(|m| (m, self.flags(m)))
            .collect();
        Self { entries }
    }

    /// Whether every module already has an entry.
    pub fn is_normalized(&self) -> bool {
        Module::ALL.iter().all(|m| self.entries.contains_key(m))
    }

    /// All granted `(module, action)` pairs.
    pub fn grants(&self) -> Vec<(Module, Action)> {
        self.entries
            .iter()
            .flat_map(|(m, flags)| flags.granted().map(move |a| (*m, a)))
            .collect()
    }

    /// Labels of modules with at least one granted action, comma separated.
    pub fn summary(&self) -> String {
        self.entries
            .iter()
            .filter(|(_, flags)| flags.any())
            .map(|(m, _)| m.label())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Decode client input. Every module and action key must be one of the
    /// canonical lowercase names; anything else is a `Validation` error.
    pub fn try_from_raw(raw: RawPermissions) -> AppResult<Self> {
        let mut entries = BTreeMap::new();
        let mut unknown = Vec::new();
        for (key, raw_flags) in raw {
            let Some(module) = Module::from_key(&key) else {
                unknown.push(key);
                continue;
            };
            let mut flags = PermissionFlags::NONE;
            for (action_key, value) in raw_flags {
                match Action::from_key(&action_key) {
                    Some(action) => flags = flags.with(action, value),
                    None => unknown.push(format!("{key}.{action_key}")),
                }
            }
            entries.insert(module, flags);
        }

        if unknown.is_empty() {
            Ok(Self { entries })
        } else {
            Err(AppError::validation(format!(
                "Unknown permission key(s): {}",
                unknown.join(", ")
            )))
        }
    }

    /// Decode a persisted `permissions` document, never failing.
    ///
    /// Rows written by older builds may hold `null`, unknown modules or
    /// actions, or non-boolean flags. Whatever cannot be read as a granted
    /// flag reads as not granted; the returned paths name what was skipped.
    pub fn from_stored(value: &Value) -> (Self, Vec<String>) {
        let mut entries = BTreeMap::new();
        let mut skipped = Vec::new();

        let Some(modules) = value.as_object() else {
            skipped.push(format!("<{}>", json_type(value)));
            return (Self { entries }, skipped);
        };

        for (key, stored_flags) in modules {
            let Some(module) = Module::from_key(key) else {
                skipped.push(key.clone());
                continue;
            };
            let Some(stored_flags) = stored_flags.as_object() else {
                skipped.push(format!("{key}: <{}>", json_type(stored_flags)));
                continue;
            };

            let mut flags = PermissionFlags::NONE;
            for (action_key, flag) in stored_flags {
                match (Action::from_key(action_key), flag) {
                    (Some(action), Value::Bool(granted)) => flags = flags.with(action, *granted),
                    (Some(_), other) => {
                        skipped.push(format!("{key}.{action_key}: <{}>", json_type(other)))
                    }
                    (None, _) => skipped.push(format!("{key}.{action_key}")),
                }
            }
            entries.insert(module, flags);
        }

        (Self { entries }, skipped)
    }

    /// Encode as the persisted map shape, all four actions per module.
    pub fn to_raw(&self) -> RawPermissions {
        self.entries
            .iter()
            .map(|(m, flags)| {
                let raw_flags = Action::ALL
                    .into_iter()
                    .map(|a| (a.as_str().to_string(), flags.get(a)))
                    .collect();
                (m.as_str().to_string(), raw_flags)
            })
            .collect()
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Serialize for PermissionMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PermissionMatrix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|value| Self::from_stored(&value).0)
    }
}
