//! 权限模型 (Abilities)
//!
//! Abilities are a plain set of `(action, subject)` pairs built once per
//! session from the navigation list and the user's roles.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;
use zatca_shared::{NavigationEntry, UserRecord};

use crate::route::AppRoute;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Read,
    /// Implies every other action.
    Manage,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Capability {
    pub action: Action,
    pub subject: String,
}

impl Capability {
    pub fn manage(subject: impl Into<String>) -> Self {
        Self {
            action: Action::Manage,
            subject: subject.into(),
        }
    }

    pub fn read(subject: impl Into<String>) -> Self {
        Self {
            action: Action::Read,
            subject: subject.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AbilitySet {
    managed: HashSet<String>,
}

impl AbilitySet {
    /// Denies everything.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Grants `manage` on every navigation subject the user's roles allow.
    /// No user yields the empty set.
    pub fn for_user(navigation: &[NavigationEntry], user: Option<&UserRecord>) -> Self {
        let Some(user) = user else {
            return Self::empty();
        };
        let managed = navigation
            .iter()
            .filter(|entry| entry.grants(&user.admin_roles))
            .filter_map(|entry| entry.subject)
            .map(str::to_string)
            .collect();
        Self { managed }
    }

    pub fn can(&self, capability: &Capability) -> bool {
        match capability.action {
            Action::Manage | Action::Read => self.managed.contains(&capability.subject),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.managed.is_empty()
    }

    /// Navigation entries the sidebar shows.
    pub fn visible<'a>(
        &'a self,
        navigation: &'a [NavigationEntry],
    ) -> impl Iterator<Item = &'a NavigationEntry> + 'a {
        navigation.iter().filter(|entry| {
            entry
                .subject
                .is_some_and(|subject| self.can(&Capability::read(subject)))
        })
    }
}

/// Memoizes the ability set on the user's role list.
#[derive(Debug, Default)]
pub struct AbilityCache {
    key: Option<Vec<String>>,
    set: Arc<AbilitySet>,
    builds: usize,
}

impl AbilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &mut self,
        navigation: &[NavigationEntry],
        user: Option<&UserRecord>,
    ) -> Arc<AbilitySet> {
        let key = user.map(|u| u.admin_roles.clone());
        if self.builds == 0 || self.key != key {
            debug!(roles = ?key, "rebuilding ability set");
            self.set = Arc::new(AbilitySet::for_user(navigation, user));
            self.key = key;
            self.builds += 1;
        }
        Arc::clone(&self.set)
    }

    /// Number of times the set was rebuilt.
    pub fn builds(&self) -> usize {
        self.builds
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityDecision {
    Allow,
    Deny,
}

/// Guest and error pages always pass; everything else needs its capability.
pub fn ability_guard(route: &AppRoute, abilities: &AbilitySet) -> AbilityDecision {
    if route.guest_only() || route.is_error_page() {
        return AbilityDecision::Allow;
    }
    match route.required_capability() {
        Some(cap) if abilities.can(&cap) => AbilityDecision::Allow,
        Some(_) => AbilityDecision::Deny,
        None => AbilityDecision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{admin, user_with_roles};
    use zatca_shared::{EntityKind, NAVIGATION};

    #[test]
    fn test_super_admin_manages_everything_in_navigation() {
        let set = AbilitySet::for_user(NAVIGATION, Some(&admin()));
        for kind in EntityKind::ALL {
            assert!(set.can(&Capability::manage(kind.subject())), "{kind:?}");
        }
        assert!(set.can(&Capability::manage("home")));
        assert!(!set.can(&Capability::manage("billing-internals")));
    }

    #[test]
    fn test_roles_restrict_subjects() {
        let finance = user_with_roles(&["FINANCE"]);
        let set = AbilitySet::for_user(NAVIGATION, Some(&finance));
        assert!(set.can(&Capability::manage("currency")));
        assert!(set.can(&Capability::manage("invoice")));
        assert!(!set.can(&Capability::manage("city")));

        let visible: Vec<_> = set.visible(NAVIGATION).map(|e| e.path).collect();
        assert!(visible.contains(&"/promotions"));
        assert!(!visible.contains(&"/country"));
    }

    #[test]
    fn test_no_user_denies_everything() {
        let set = AbilitySet::for_user(NAVIGATION, None);
        assert!(set.is_empty());
        assert_eq!(
            ability_guard(&AppRoute::List(EntityKind::City), &set),
            AbilityDecision::Deny
        );
        assert_eq!(ability_guard(&AppRoute::Home, &set), AbilityDecision::Deny);
    }

    #[test]
    fn test_guest_and_error_pages_always_pass() {
        let set = AbilitySet::empty();
        assert_eq!(ability_guard(&AppRoute::Login, &set), AbilityDecision::Allow);
        assert_eq!(ability_guard(&AppRoute::Signup, &set), AbilityDecision::Allow);
        assert_eq!(ability_guard(&AppRoute::NotFound, &set), AbilityDecision::Allow);
        assert_eq!(ability_guard(&AppRoute::NotAuthorized, &set), AbilityDecision::Allow);
    }

    #[test]
    fn test_cache_rebuilds_only_when_roles_change() {
        let mut cache = AbilityCache::new();
        let user = admin();

        let first = cache.get(NAVIGATION, Some(&user));
        let second = cache.get(NAVIGATION, Some(&user));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.builds(), 1);

        let coach = user_with_roles(&["COACH_MANAGER"]);
        cache.get(NAVIGATION, Some(&coach));
        assert_eq!(cache.builds(), 2);

        let none = cache.get(NAVIGATION, None);
        assert!(none.is_empty());
        assert_eq!(cache.builds(), 3);
    }
}
