//! Balance check for the custom dialogue tags (`<w>`, `<s>`, `<r>`, ...).
//!
//! The renderer glitches on unclosed or crossed tags but never fails, so
//! problems are only reported; the text itself is never rewritten.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9_-]*)>").expect("markup tag pattern is valid")
});

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum MarkupIssue {
    /// Opened at `offset` and never closed.
    Unclosed { tag: String, offset: usize },
    /// Closing tag with no matching opener.
    StrayClose { tag: String, offset: usize },
    /// `found` closed while `expected` was still the innermost open tag.
    Misnested {
        expected: String,
        found: String,
        offset: usize,
    },
}

impl fmt::Display for MarkupIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkupIssue::Unclosed { tag, offset } => {
                write!(f, "<{tag}> at byte {offset} is never closed")
            }
            MarkupIssue::StrayClose { tag, offset } => {
                write!(f, "</{tag}> at byte {offset} has no opening tag")
            }
            MarkupIssue::Misnested {
                expected,
                found,
                offset,
            } => write!(
                f,
                "</{found}> at byte {offset} closes across open <{expected}>"
            ),
        }
    }
}

pub fn check_balance(text: &str) -> Vec<MarkupIssue> {
    let mut issues = Vec::new();
    let mut open: Vec<(String, usize)> = Vec::new();

    for captures in TAG.captures_iter(text) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(2)) else {
            continue;
        };
        let closing = captures.get(1).is_some_and(|slash| !slash.as_str().is_empty());
        let tag = name.as_str();
        let offset = whole.start();

        if !closing {
            open.push((tag.to_string(), offset));
            continue;
        }

        match open.iter().rposition(|(name, _)| name == tag) {
            Some(index) if index + 1 == open.len() => {
                open.pop();
            }
            Some(index) => {
                if let Some((expected, _)) = open.last() {
                    issues.push(MarkupIssue::Misnested {
                        expected: expected.clone(),
                        found: tag.to_string(),
                        offset,
                    });
                }
                open.truncate(index);
            }
            None => issues.push(MarkupIssue::StrayClose {
                tag: tag.to_string(),
                offset,
            }),
        }
    }

    issues.extend(
        open.into_iter()
            .map(|(tag, offset)| MarkupIssue::Unclosed { tag, offset }),
    );
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_tags_balance() {
        assert!(check_balance("It's a little...<s><r>unconventional</r></s>.").is_empty());
        assert!(check_balance("Would you believe I'm actually from <w><r>Earth</r></w>?").is_empty());
        assert!(check_balance("plain text, no tags").is_empty());
        assert!(check_balance("a < b and c > d").is_empty());
    }

    #[test]
    fn reports_unclosed_tags() {
        let issues = check_balance("Is it...<s>illegal?");
        assert_eq!(
            issues,
            vec![MarkupIssue::Unclosed {
                tag: "s".into(),
                offset: 8
            }]
        );
    }

    #[test]
    fn reports_stray_close() {
        let issues = check_balance("done</w>");
        assert_eq!(
            issues,
            vec![MarkupIssue::StrayClose {
                tag: "w".into(),
                offset: 4
            }]
        );
    }

    #[test]
    fn reports_crossed_tags() {
        let issues = check_balance("<w><r>Earth</w></r>");
        assert_eq!(
            issues,
            vec![
                MarkupIssue::Misnested {
                    expected: "r".into(),
                    found: "w".into(),
                    offset: 11
                },
                MarkupIssue::StrayClose {
                    tag: "r".into(),
                    offset: 15
                },
            ]
        );
        assert!(issues[0].to_string().contains("</w>"));
    }
}
