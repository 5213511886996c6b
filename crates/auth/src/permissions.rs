use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Closed set of permissions the system understands.
///
/// The grant tables (role → permission, user → permission) are open and
/// data-driven, but the names they can meaningfully carry are fixed here.
/// Rows naming anything else are skipped during resolution.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "stock.read")]
    StockRead,
    #[serde(rename = "stock.adjust")]
    StockAdjust,
    #[serde(rename = "production.read")]
    ProductionRead,
    #[serde(rename = "production.run")]
    ProductionRun,
    #[serde(rename = "invoices.read")]
    InvoicesRead,
    #[serde(rename = "invoices.status")]
    InvoicesStatus,
    #[serde(rename = "users.manage")]
    UsersManage,
}

impl Permission {
    pub const ALL: [Permission; 7] = [
        Permission::StockRead,
        Permission::StockAdjust,
        Permission::ProductionRead,
        Permission::ProductionRun,
        Permission::InvoicesRead,
        Permission::InvoicesStatus,
        Permission::UsersManage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::StockRead => "stock.read",
            Permission::StockAdjust => "stock.adjust",
            Permission::ProductionRead => "production.read",
            Permission::ProductionRun => "production.run",
            Permission::InvoicesRead => "invoices.read",
            Permission::InvoicesStatus => "invoices.status",
            Permission::UsersManage => "users.manage",
        }
    }

    /// Parse a grant-table name. Unknown names yield `None` (callers skip
    /// them rather than failing resolution).
    pub fn parse(name: &str) -> Option<Self> {
        Permission::ALL.into_iter().find(|p| p.as_str() == name)
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effective permission set for a user, snapshotted at login.
///
/// Union of role-granted and individually-granted permissions. The snapshot
/// is embedded in the token and not re-queried per request; it is valid for
/// the session's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every permission the system knows (admin snapshot).
    pub fn all() -> Self {
        Self(Permission::ALL.into_iter().collect())
    }

    /// Resolve a list of grant-table names, skipping unknown ones.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut set = BTreeSet::new();
        for name in names {
            match Permission::parse(name) {
                Some(p) => {
                    set.insert(p);
                }
                None => {
                    tracing::warn!(permission = name, "skipping unknown permission grant");
                }
            }
        }
        Self(set)
    }

    pub fn insert(&mut self, permission: Permission) {
        self.0.insert(permission);
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    pub fn union(mut self, other: &PermissionSet) -> Self {
        self.0.extend(other.0.iter().copied());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_permission() {
        for p in Permission::ALL {
            assert_eq!(Permission::parse(p.as_str()), Some(p));
        }
    }

    #[test]
    fn unknown_grant_names_are_skipped() {
        let set = PermissionSet::from_names(["stock.read", "reports.export", "stock.adjust"]);
        assert!(set.contains(Permission::StockRead));
        assert!(set.contains(Permission::StockAdjust));
        assert_eq!(set.iter().count(), 2);
    }

    #[test]
    fn union_merges_role_and_user_grants() {
        let role = PermissionSet::from_names(["stock.read"]);
        let user = PermissionSet::from_names(["production.run"]);
        let effective = role.union(&user);
        assert!(effective.contains(Permission::StockRead));
        assert!(effective.contains(Permission::ProductionRun));
    }

    #[test]
    fn serializes_as_dotted_names() {
        let set = PermissionSet::from_names(["invoices.status"]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["invoices.status"]"#);
    }
}
