//! Admin registry - in-memory cache of admin-group membership

use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

use crate::domain::traits::Gateway;

/// Pseudo-group holding individually configured admins. Always present,
/// never touched by subteam updates.
pub const STATIC_GROUP: &str = "NONE";

/// Caches which users belong to the configured admin groups.
///
/// Populated once at startup from the gateway; afterwards the platform
/// pushes membership changes via [`AdminRegistry::handle_group_update`].
/// The registry never re-queries on its own, so reads may be stale during
/// an in-flight update but never observe a partially written member set.
pub struct AdminRegistry {
    groups: RwLock<HashMap<String, HashSet<String>>>,
}

impl AdminRegistry {
    pub fn new(static_admins: HashSet<String>) -> Self {
        let mut groups = HashMap::new();
        groups.insert(STATIC_GROUP.to_string(), static_admins);
        Self {
            groups: RwLock::new(groups),
        }
    }

    /// Build the registry by querying each configured group's members.
    ///
    /// A failed lookup is logged and skipped: that group contributes no
    /// members and is not retried. Partial admin coverage beats failing
    /// to boot.
    pub async fn initialize<G>(
        gateway: &G,
        group_ids: &HashSet<String>,
        static_admins: HashSet<String>,
    ) -> Self
    where
        G: Gateway + ?Sized,
    {
        let registry = Self::new(static_admins);
        for group in group_ids {
            let group = group.trim();
            if group.is_empty() {
                continue;
            }
            match gateway.list_group_members(group).await {
                Ok(users) => {
                    let mut groups = registry.groups.write().await;
                    groups.insert(group.to_string(), users);
                }
                Err(err) => {
                    tracing::error!("failed to list users for group '{}': {}", group, err);
                }
            }
        }
        registry
    }

    /// True iff the user appears in any tracked group, the static
    /// pseudo-group included. First match wins.
    pub async fn is_admin(&self, user: &str) -> bool {
        let groups = self.groups.read().await;
        groups.values().any(|members| members.contains(user))
    }

    /// Apply a pushed membership change for a tracked group.
    ///
    /// Returns false and changes nothing when the group is empty, not
    /// tracked, or the new member set is empty; otherwise replaces the
    /// old member set wholesale and returns true.
    pub async fn handle_group_update(&self, group: &str, users: HashSet<String>) -> bool {
        if group.is_empty() || group == STATIC_GROUP || users.is_empty() {
            return false;
        }
        let mut groups = self.groups.write().await;
        if !groups.contains_key(group) {
            return false;
        }
        tracing::debug!("subteam_updated subteam={}", group);
        groups.insert(group.to_string(), users);
        true
    }

    /// Current members of a group, for diagnostics and tests.
    pub async fn members(&self, group: &str) -> Option<HashSet<String>> {
        let groups = self.groups.read().await;
        groups.get(group).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(users: &[&str]) -> HashSet<String> {
        users.iter().map(|u| u.to_string()).collect()
    }

    fn registry_with(group: &str, users: &[&str]) -> AdminRegistry {
        let registry = AdminRegistry::new(set(&["root"]));
        {
            let mut groups = registry.groups.try_write().unwrap();
            groups.insert(group.to_string(), set(users));
        }
        registry
    }

    #[tokio::test]
    async fn static_admins_are_admins() {
        let registry = AdminRegistry::new(set(&["root"]));
        assert!(registry.is_admin("root").await);
        assert!(!registry.is_admin("bob").await);
    }

    #[tokio::test]
    async fn group_members_are_admins() {
        let registry = registry_with("eng", &["alice"]);
        assert!(registry.is_admin("alice").await);
        assert!(registry.is_admin("root").await);
        assert!(!registry.is_admin("bob").await);
    }

    #[tokio::test]
    async fn update_replaces_membership_wholesale() {
        let registry = registry_with("eng", &["alice"]);
        assert!(registry.handle_group_update("eng", set(&["carol", "dave"])).await);
        assert!(!registry.is_admin("alice").await);
        assert!(registry.is_admin("carol").await);
        assert_eq!(registry.members("eng").await, Some(set(&["carol", "dave"])));
    }

    #[tokio::test]
    async fn update_ignores_untracked_group() {
        let registry = registry_with("eng", &["alice"]);
        assert!(!registry.handle_group_update("sales", set(&["eve"])).await);
        assert!(!registry.is_admin("eve").await);
    }

    #[tokio::test]
    async fn update_ignores_empty_member_set() {
        let registry = registry_with("eng", &["alice"]);
        assert!(!registry.handle_group_update("eng", HashSet::new()).await);
        assert_eq!(registry.members("eng").await, Some(set(&["alice"])));
    }

    #[tokio::test]
    async fn update_never_touches_static_group() {
        let registry = AdminRegistry::new(set(&["root"]));
        assert!(!registry.handle_group_update(STATIC_GROUP, set(&["eve"])).await);
        assert!(registry.is_admin("root").await);
        assert!(!registry.is_admin("eve").await);
    }

    #[tokio::test]
    async fn empty_group_id_is_rejected() {
        let registry = registry_with("eng", &["alice"]);
        assert!(!registry.handle_group_update("", set(&["eve"])).await);
    }
}
