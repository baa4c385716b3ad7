//! Mention resolution against the roster of known users.

use std::collections::HashSet;

use crate::message::UserProfile;

/// Canonical display names of the users a message can mention.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    names: HashSet<String>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from directory records using the display-name rule.
    pub fn from_profiles<'a>(profiles: impl IntoIterator<Item = &'a UserProfile>) -> Self {
        profiles.into_iter().map(UserProfile::display_name).collect()
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Roster {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Check whether `candidate` (the text after `@`) names a known user.
///
/// Exact, case-sensitive comparison with canonical display names. Since the
/// mention token never contains whitespace, users whose display name is
/// `firstname lastname` cannot be mentioned this way.
pub fn resolve(candidate: &str, known_users: &Roster) -> bool {
    !candidate.is_empty() && known_users.contains(candidate)
}
