//! Field lock registry

use std::collections::BTreeSet;

use shared_types::form_name_for;

/// Set of form field names the server refuses to update for a record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldLocks {
    locked: BTreeSet<String>,
}

impl FieldLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut locks = Self::new();
        locks.add_all(names);
        locks
    }

    pub fn is_locked(&self, field: &str) -> bool {
        self.locked.contains(field)
    }

    /// Wholesale replacement, used after a load and after a successful save.
    pub fn replace_all<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.locked.clear();
        self.add_all(names);
    }

    /// Merge-in, used when a save is rejected because of newly locked fields.
    pub fn add_all<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.locked.extend(
            names
                .into_iter()
                .filter_map(|name| normalize_lock_name(name.as_ref())),
        );
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.locked.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.locked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locked.is_empty()
    }
}

/// Servers may report API names (`phone`); the registry keys on form names.
fn normalize_lock_name(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(form_name_for(name).unwrap_or(name).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{FIELD_ADDRESS, FIELD_PHONE, FIELD_TAGS};

    #[test]
    fn test_membership_uses_form_names() {
        let locks = FieldLocks::from_names(["phone", "address", "tags"]);
        assert!(locks.is_locked(FIELD_PHONE));
        assert!(locks.is_locked(FIELD_ADDRESS));
        assert!(locks.is_locked(FIELD_TAGS));
        assert!(!locks.is_locked("phone"));
        assert!(!locks.is_locked("email"));
    }

    #[test]
    fn test_form_names_pass_through() {
        let locks = FieldLocks::from_names(["phone_number", "  ", "custom_flag"]);
        assert!(locks.is_locked(FIELD_PHONE));
        assert!(locks.is_locked("custom_flag"));
        assert_eq!(locks.len(), 2);
    }

    #[test]
    fn test_replace_all_drops_stale_locks() {
        let mut locks = FieldLocks::from_names(["email", "city"]);
        locks.replace_all(["city"]);
        assert!(!locks.is_locked("email"));
        assert!(locks.is_locked("city"));

        locks.replace_all(Vec::<String>::new());
        assert!(locks.is_empty());
    }

    #[test]
    fn test_add_all_merges() {
        let mut locks = FieldLocks::from_names(["email"]);
        locks.add_all(["city", "email"]);
        assert_eq!(locks.iter().collect::<Vec<_>>(), vec!["city", "email"]);
    }
}
