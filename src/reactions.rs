//! Reaction counts and "did the viewer react" flags.

use serde::Serialize;

use crate::message::Reaction;

/// A reaction ready for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReactionSummary {
    pub emoji: String,
    pub count: usize,
    pub viewer_reacted: bool,
    /// Comma-separated user names, `None` when nobody reacted.
    pub tooltip: Option<String>,
}

/// Lowercase, then drop everything that is not a letter or digit.
fn normalize_name(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Annotate each reaction with its user count and whether `viewer` is among
/// its users. Names are compared after normalization, so `"jane doe"` matches
/// `"Jane Doe"` and `"Jane-Doe"`. Repeated user names count once.
pub fn annotate(reactions: &[Reaction], viewer: Option<&str>) -> Vec<ReactionSummary> {
    let viewer = viewer.map(normalize_name).filter(|v| !v.is_empty());

    reactions
        .iter()
        .map(|reaction| {
            let mut users: Vec<&str> = Vec::with_capacity(reaction.users.len());
            for user in &reaction.users {
                if !users.contains(&user.as_str()) {
                    users.push(user);
                }
            }

            let viewer_reacted = viewer
                .as_deref()
                .is_some_and(|v| users.iter().any(|u| normalize_name(u) == v));

            ReactionSummary {
                emoji: reaction.emoji.clone(),
                count: users.len(),
                viewer_reacted,
                tooltip: (!users.is_empty()).then(|| users.join(", ")),
            }
        })
        .collect()
}
