//! Lightweight markup tokenizer for message text.
//!
//! Recognized forms, in priority order when two start at the same offset:
//! `__bold__`, `''italic''`, `--strike--`, `` `code` ``, `http(s)://` links
//! and `@mentions`. Everything else is plain text.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::mentions::{resolve, Roster};
use crate::config::FormatConfig;

/// One typed span of a tokenized message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Segment {
    Text { content: String },
    Bold { content: String },
    Italic { content: String },
    Strike { content: String },
    Code { content: String },
    Link { url: String, display: String },
    Mention { content: String },
}

impl Segment {
    pub fn text(content: impl Into<String>) -> Self {
        Segment::Text { content: content.into() }
    }

    /// The segment as it appeared in the source text, delimiters included.
    pub fn raw(&self) -> String {
        match self {
            Segment::Text { content } => content.clone(),
            Segment::Bold { content } => format!("__{}__", content),
            Segment::Italic { content } => format!("''{}''", content),
            Segment::Strike { content } => format!("--{}--", content),
            Segment::Code { content } => format!("`{}`", content),
            Segment::Link { url, .. } => url.clone(),
            Segment::Mention { content } => format!("@{}", content),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RuleKind {
    Bold,
    Italic,
    Strike,
    Code,
    Link,
    Mention,
}

struct MatchRule {
    kind: RuleKind,
    pattern: Regex,
}

impl MatchRule {
    fn new(kind: RuleKind, pattern: &str) -> Self {
        Self {
            kind,
            pattern: Regex::new(pattern).expect("markup regex pattern is valid"),
        }
    }

    fn find_from(&self, text: &str, pos: usize) -> Option<Range<usize>> {
        self.pattern.find_at(text, pos).map(|m| m.range())
    }

    /// Build the segment for a matched slice. Delimiters are ASCII so byte
    /// slicing stays on char boundaries.
    fn segment(&self, matched: &str, known_users: &Roster, config: &FormatConfig) -> Segment {
        let inner = |delim: usize| matched[delim..matched.len() - delim].to_string();
        match self.kind {
            RuleKind::Bold => Segment::Bold { content: inner(2) },
            RuleKind::Italic => Segment::Italic { content: inner(2) },
            RuleKind::Strike => Segment::Strike { content: inner(2) },
            RuleKind::Code => Segment::Code { content: inner(1) },
            RuleKind::Link => Segment::Link {
                url: matched.to_string(),
                display: link_display(matched, config),
            },
            RuleKind::Mention => {
                let name = &matched[1..];
                if resolve(name, known_users) {
                    Segment::Mention { content: name.to_string() }
                } else {
                    tracing::trace!("Unknown mention {:?} kept as text", name);
                    Segment::text(matched)
                }
            }
        }
    }
}

/// Earlier entries win ties at the same start offset.
static RULES: Lazy<Vec<MatchRule>> = Lazy::new(|| {
    vec![
        MatchRule::new(RuleKind::Bold, r"__(.+?)__"),
        MatchRule::new(RuleKind::Italic, r"''(.+?)''"),
        MatchRule::new(RuleKind::Strike, r"--(.+?)--"),
        MatchRule::new(RuleKind::Code, r"`([^`]+)`"),
        MatchRule::new(RuleKind::Link, r"https?://[^\s<>\[\]]+"),
        MatchRule::new(RuleKind::Mention, r"@([A-Za-z0-9_.-]+)"),
    ]
});

/// Shorten a URL for display: longer than `link_display_max` characters
/// keeps the first `link_display_keep` and appends `...`.
pub fn link_display(url: &str, config: &FormatConfig) -> String {
    if url.chars().count() > config.link_display_max {
        let kept: String = url.chars().take(config.link_display_keep).collect();
        format!("{}...", kept)
    } else {
        url.to_string()
    }
}

/// Tokenize with the default display settings.
pub fn tokenize(text: &str, known_users: &Roster) -> Vec<Segment> {
    tokenize_with(text, known_users, &FormatConfig::default())
}

/// Split `text` into typed segments, scanning left to right.
///
/// At each step every rule reports its leftmost match at or after the cursor;
/// the earliest start wins, ties going to the rule listed first. Never returns
/// an empty list.
pub fn tokenize_with(text: &str, known_users: &Roster, config: &FormatConfig) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut pos = 0;

    // Next match per rule, refreshed only once the cursor has passed its start
    let mut pending: Vec<Option<Range<usize>>> = RULES.iter().map(|rule| rule.find_from(text, 0)).collect();

    loop {
        for (rule, slot) in RULES.iter().zip(pending.iter_mut()) {
            if slot.as_ref().is_some_and(|r| r.start < pos) {
                *slot = rule.find_from(text, pos);
            }
        }

        let Some((idx, range)) = pending
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.clone().map(|r| (i, r)))
            .min_by_key(|(i, r)| (r.start, *i))
        else {
            break;
        };

        if range.start > pos {
            segments.push(Segment::text(&text[pos..range.start]));
        }
        segments.push(RULES[idx].segment(&text[range.clone()], known_users, config));
        pos = range.end;
    }

    if pos < text.len() {
        segments.push(Segment::text(&text[pos..]));
    }

    if segments.is_empty() {
        segments.push(Segment::text(text));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(names: &[&str]) -> Roster {
        names.iter().copied().collect()
    }

    fn rebuild(segments: &[Segment]) -> String {
        segments.iter().map(Segment::raw).collect()
    }

    #[test]
    fn test_empty_text_yields_single_empty_segment() {
        assert_eq!(tokenize("", &Roster::new()), vec![Segment::text("")]);
    }

    #[test]
    fn test_plain_text_is_one_segment() {
        assert_eq!(
            tokenize("just words here", &Roster::new()),
            vec![Segment::text("just words here")]
        );
    }

    #[test]
    fn test_each_markup_form() {
        let segs = tokenize("a __b__ ''i'' --s-- `c` end", &Roster::new());
        assert_eq!(
            segs,
            vec![
                Segment::text("a "),
                Segment::Bold { content: "b".into() },
                Segment::text(" "),
                Segment::Italic { content: "i".into() },
                Segment::text(" "),
                Segment::Strike { content: "s".into() },
                Segment::text(" "),
                Segment::Code { content: "c".into() },
                Segment::text(" end"),
            ]
        );
    }

    #[test]
    fn test_link_segment_and_truncation() {
        let segs = tokenize("see https://example.com/x now", &Roster::new());
        assert_eq!(
            segs[1],
            Segment::Link {
                url: "https://example.com/x".into(),
                display: "https://example.com/x".into(),
            }
        );
        assert_eq!(segs[2], Segment::text(" now"));

        let long = format!("https://example.com/{}", "a".repeat(40));
        let segs = tokenize(&long, &Roster::new());
        match &segs[0] {
            Segment::Link { url, display } => {
                assert_eq!(url, &long);
                assert_eq!(display.chars().count(), 50);
                assert!(display.ends_with("..."));
                assert_eq!(&display[..47], &long[..47]);
            }
            other => panic!("expected link, got {:?}", other),
        }
    }

    #[test]
    fn test_link_exactly_at_limit_not_truncated() {
        let url = format!("http://{}", "b".repeat(43));
        assert_eq!(url.len(), 50);
        assert_eq!(link_display(&url, &FormatConfig::default()), url);
    }

    #[test]
    fn test_link_stops_at_whitespace_and_brackets() {
        let segs = tokenize("[https://a.io/p] x", &Roster::new());
        assert_eq!(segs[0], Segment::text("["));
        assert_eq!(
            segs[1],
            Segment::Link {
                url: "https://a.io/p".into(),
                display: "https://a.io/p".into(),
            }
        );
        assert_eq!(segs[2], Segment::text("] x"));
    }

    #[test]
    fn test_unknown_mention_stays_text() {
        let segs = tokenize("@bob hi", &roster(&["Alice Smith"]));
        assert_eq!(segs, vec![Segment::text("@bob"), Segment::text(" hi")]);
    }

    #[test]
    fn test_known_mention_resolved() {
        let segs = tokenize("ping @bob.k, please", &roster(&["bob.k"]));
        assert_eq!(
            segs,
            vec![
                Segment::text("ping "),
                Segment::Mention { content: "bob.k".into() },
                Segment::text(", please"),
            ]
        );
    }

    #[test]
    fn test_multi_word_display_name_is_not_mentionable() {
        // Only "@Alice" is a mention candidate, and "Alice" alone is unknown
        let segs = tokenize("@Alice Smith hi", &roster(&["Alice Smith"]));
        assert_eq!(segs, vec![Segment::text("@Alice"), Segment::text(" Smith hi")]);

        let segs = tokenize("@Alice Smith hi", &roster(&["Alice Smith", "Alice"]));
        assert_eq!(segs[0], Segment::Mention { content: "Alice".into() });
    }

    #[test]
    fn test_outer_markup_wins_inner_is_literal() {
        let segs = tokenize("__''x''__", &Roster::new());
        assert_eq!(segs, vec![Segment::Bold { content: "''x''".into() }]);

        let segs = tokenize("''__x__''", &Roster::new());
        assert_eq!(segs, vec![Segment::Italic { content: "__x__".into() }]);
    }

    #[test]
    fn test_earliest_start_wins_over_priority() {
        // Code starts before bold, so it wins even though bold ranks higher
        let segs = tokenize("`a __b` c__", &Roster::new());
        assert_eq!(
            segs,
            vec![Segment::Code { content: "a __b".into() }, Segment::text(" c__")]
        );
    }

    #[test]
    fn test_overlapping_later_match_is_rescanned() {
        // Strike's first candidate "--y__ --" overlaps the bold match and
        // must be searched again after it.
        let segs = tokenize("__x--y__ --z--", &Roster::new());
        assert_eq!(
            segs,
            vec![
                Segment::Bold { content: "x--y".into() },
                Segment::text(" "),
                Segment::Strike { content: "z".into() },
            ]
        );
    }

    #[test]
    fn test_unclosed_delimiters_are_text() {
        let segs = tokenize("__open and `tick", &Roster::new());
        assert_eq!(segs, vec![Segment::text("__open and `tick")]);
    }

    #[test]
    fn test_markup_does_not_span_lines() {
        let segs = tokenize("__a\nb__", &Roster::new());
        assert_eq!(segs, vec![Segment::text("__a\nb__")]);
    }

    #[test]
    fn test_round_trip_reconstructs_input() {
        let known = roster(&["dana"]);
        let inputs = [
            "",
            "hello",
            "__b__''i''--s--`c`",
            "mixed @dana and @nobody at https://x.io/a?b=c#d ok",
            "ünïcödé __fêtes__ `ñ` fin",
            "trailing `code`",
        ];
        for input in inputs {
            assert_eq!(rebuild(&tokenize(input, &known)), input, "input: {:?}", input);
        }
    }

    #[test]
    fn test_deterministic() {
        let known = roster(&["dana"]);
        let text = "@dana __look__ https://example.org";
        assert_eq!(tokenize(text, &known), tokenize(text, &known));
    }

    #[test]
    fn test_custom_link_limits() {
        let config = FormatConfig {
            link_display_max: 20,
            link_display_keep: 10,
            ..FormatConfig::default()
        };
        let segs = tokenize_with("https://example.com/abcdef", &Roster::new(), &config);
        assert_eq!(
            segs[0],
            Segment::Link {
                url: "https://example.com/abcdef".into(),
                display: "https://ex...".into(),
            }
        );
    }

    #[test]
    fn test_segment_serializes_with_type_tag() {
        let json = serde_json::to_value(Segment::Link {
            url: "https://a.io".into(),
            display: "https://a.io".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "link");
        assert_eq!(json["display"], "https://a.io");

        let json = serde_json::to_value(Segment::Strike { content: "x".into() }).unwrap();
        assert_eq!(json["type"], "strike");
        assert_eq!(json["content"], "x");
    }
}
