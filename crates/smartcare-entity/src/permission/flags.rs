//! The four per-module permission flags.

use serde::Serialize;

use super::action::Action;

/// View/create/update/delete flags for a single module.
///
/// Flags are independent: `update` does not imply `view`. Decoding goes
/// through [`PermissionMatrix`](super::PermissionMatrix), which decides how
/// strict to be about the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct PermissionFlags {
    /// May read records.
    pub view: bool,
    /// May add records.
    pub create: bool,
    /// May modify records.
    pub update: bool,
    /// May remove records.
    pub delete: bool,
}

impl PermissionFlags {
    /// Nothing granted.
    pub const NONE: PermissionFlags = PermissionFlags {
        view: false,
        create: false,
        update: false,
        delete: false,
    };

    /// Everything granted.
    pub const ALL: PermissionFlags = PermissionFlags {
        view: true,
        create: true,
        update: true,
        delete: true,
    };

    /// Read the flag for `action`.
    pub fn get(&self, action: Action) -> bool {
        match action {
            Action::View => self.view,
            Action::Create => self.create,
            Action::Update => self.update,
            Action::Delete => self.delete,
        }
    }

    /// Return a copy with the flag for `action` replaced.
    pub fn with(mut self, action: Action, value: bool) -> Self {
        match action {
            Action::View => self.view = value,
            Action::Create => self.create = value,
            Action::Update => self.update = value,
            Action::Delete => self.delete = value,
        }
        self
    }

    /// Whether any action is granted.
    pub fn any(&self) -> bool {
        Action::ALL.iter().any(|a| self.get(*a))
    }

    /// Granted actions, in column order.
    pub fn granted(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(|a| self.get(*a))
    }
}
