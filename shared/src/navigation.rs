//! Static navigation configuration.
//!
//! The list drives both the sidebar and the capability universe: a
//! subject is grantable only if some entry carries it.

/// One sidebar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationEntry {
    pub path: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    /// Capability subject; `None` for purely decorative entries.
    pub subject: Option<&'static str>,
    /// Heading rendered above this entry when it opens a section.
    pub section_title: Option<&'static str>,
    /// Admin roles allowed to manage the subject. Empty means any admin role.
    pub roles: &'static [&'static str],
}

pub const ROLE_SUPER_ADMIN: &str = "SUPER_ADMIN";
pub const ROLE_FINANCE: &str = "FINANCE";
pub const ROLE_COACH_MANAGER: &str = "COACH_MANAGER";

const FINANCE_ROLES: &[&str] = &[ROLE_SUPER_ADMIN, ROLE_FINANCE];
const TRAINING_ROLES: &[&str] = &[ROLE_SUPER_ADMIN, ROLE_COACH_MANAGER];
const SUPER_ONLY: &[&str] = &[ROLE_SUPER_ADMIN];

const fn entry(
    path: &'static str,
    title: &'static str,
    icon: &'static str,
    subject: &'static str,
    roles: &'static [&'static str],
) -> NavigationEntry {
    NavigationEntry {
        path,
        title,
        icon,
        subject: Some(subject),
        section_title: None,
        roles,
    }
}

const fn section(mut e: NavigationEntry, title: &'static str) -> NavigationEntry {
    e.section_title = Some(title);
    e
}

pub static NAVIGATION: &[NavigationEntry] = &[
    entry("/", "Home", "home", "home", &[]),
    section(
        entry("/country", "Countries", "flag", "country", SUPER_ONLY),
        "Settings",
    ),
    entry("/city", "Cities", "map-pin", "city", SUPER_ONLY),
    entry("/currency", "Currencies", "coins", "currency", FINANCE_ROLES),
    entry("/language", "Languages", "languages", "language", SUPER_ONLY),
    section(entry("/user", "Users", "users", "user", &[]), "Users"),
    entry("/usertype", "User types", "id-card", "usertype", SUPER_ONLY),
    section(
        entry(
            "/muscle-group",
            "Muscle groups",
            "activity",
            "muscle-group",
            TRAINING_ROLES,
        ),
        "Training",
    ),
    entry("/equipements", "Equipment", "dumbbell", "equipment", TRAINING_ROLES),
    entry("/exercises", "Exercises", "person-running", "exercise", TRAINING_ROLES),
    entry(
        "/workout/categories",
        "Workout categories",
        "folder",
        "workout-category",
        TRAINING_ROLES,
    ),
    entry(
        "/workout/groups",
        "Workout groups",
        "layers",
        "workout-group",
        TRAINING_ROLES,
    ),
    entry(
        "/workout/programmes-day",
        "Programme days",
        "calendar",
        "programme-day",
        TRAINING_ROLES,
    ),
    entry(
        "/questionnaires",
        "Questionnaires",
        "clipboard",
        "questionnaire",
        TRAINING_ROLES,
    ),
    section(
        entry("/promotions", "Promotions", "tag", "promotion", FINANCE_ROLES),
        "Commerce",
    ),
    entry("/invoices/add", "New invoice", "receipt", "invoice", FINANCE_ROLES),
];

impl NavigationEntry {
    /// Whether a user holding `roles` may manage this entry's subject.
    pub fn grants(&self, roles: &[String]) -> bool {
        if roles.is_empty() {
            return false;
        }
        self.roles.is_empty() || roles.iter().any(|r| self.roles.contains(&r.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntityKind;

    #[test]
    fn test_every_entity_has_a_subject_entry() {
        for kind in EntityKind::ALL {
            assert!(
                NAVIGATION.iter().any(|e| e.subject == Some(kind.subject())),
                "missing navigation entry for {kind:?}"
            );
        }
    }

    #[test]
    fn test_grants() {
        let cities = NAVIGATION.iter().find(|e| e.path == "/city").unwrap();
        assert!(cities.grants(&["SUPER_ADMIN".to_string()]));
        assert!(!cities.grants(&["FINANCE".to_string()]));
        assert!(!cities.grants(&[]));

        let home = NAVIGATION.iter().find(|e| e.path == "/").unwrap();
        assert!(home.grants(&["FINANCE".to_string()]));
    }
}
