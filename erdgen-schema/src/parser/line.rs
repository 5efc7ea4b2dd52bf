//! Line classification.
//!
//! The diagram is line oriented: every trimmed, non-empty line is exactly one
//! of the kinds in [`LineKind`]. Which kinds are possible depends on whether
//! the parser is currently inside an entity block.

use crate::decorator::DecoratorTag;

/// Marker that starts a comment (and every decorator line).
pub const COMMENT_MARKER: &str = "%%";

/// Character that introduces a directive.
pub const DIRECTIVE_INDICATOR: char = '@';

/// Character that opens an entity block.
pub const BLOCK_OPEN: char = '{';

/// Line that closes an entity block.
pub const BLOCK_CLOSE: &str = "}";

/// Infix token of a relationship line.
pub const RELATION_TOKEN: &str = "||--o{";

/// Where the parser currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Between entity blocks.
    Outside,
    /// Inside an entity block.
    Inside,
}

/// The kind of a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `Name {`
    EntityOpen { name: &'a str },
    /// `}`
    EntityClose,
    /// `Source ||--o{ Target : label`
    Relationship { source: &'a str, target: &'a str },
    /// `%% @tag payload`; `text` starts at the directive indicator.
    Decorator { text: &'a str },
    /// `%% @dictionary Name { ... }`; `text` starts at the directive indicator.
    Dictionary { text: &'a str },
    /// `Type name [%% @tag payload ...]`
    Field {
        field_type: &'a str,
        name: &'a str,
        /// Inline directives, starting at the first directive indicator.
        decorators: Option<&'a str>,
    },
    /// A comment, or a commented-out directive with an unrecognized tag.
    Comment,
    /// Anything else; skipped without complaint.
    Ignored,
}

/// Classify one trimmed, non-empty line.
pub fn classify(line: &str, mode: Mode) -> LineKind<'_> {
    if line.starts_with(COMMENT_MARKER) {
        return classify_comment(line);
    }

    match mode {
        Mode::Outside => {
            if let Some((source, target)) = split_relationship(line) {
                return LineKind::Relationship { source, target };
            }
            if let Some(name) = entity_name(line) {
                return LineKind::EntityOpen { name };
            }
            LineKind::Ignored
        }
        Mode::Inside => {
            if line == BLOCK_CLOSE {
                return LineKind::EntityClose;
            }
            if line.contains(RELATION_TOKEN) {
                return LineKind::Ignored;
            }
            let field = split_field(line);
            // A field line whose inline directives end in `{` is a field with a
            // broken payload, not a new block.
            if !matches!(field, Some((_, _, Some(_)))) {
                if let Some(name) = entity_name(line) {
                    return LineKind::EntityOpen { name };
                }
            }
            match field {
                Some((field_type, name, decorators)) => LineKind::Field {
                    field_type,
                    name,
                    decorators,
                },
                None => LineKind::Ignored,
            }
        }
    }
}

/// Return the directive text of a decorator line (`%% @tag ...`) when the tag
/// is recognized.
pub fn directive_text(line: &str) -> Option<(DecoratorTag, &str)> {
    let rest = line.strip_prefix(COMMENT_MARKER)?.trim_start();
    let after = rest.strip_prefix(DIRECTIVE_INDICATOR)?;
    let tag = DecoratorTag::from_name(leading_tag(after))?;
    Some((tag, rest))
}

/// The tag name at the start of `text` (which follows a directive indicator).
pub fn leading_tag(text: &str) -> &str {
    let end = text
        .find(|c: char| c.is_whitespace() || c == BLOCK_OPEN || c == '[' || c == DIRECTIVE_INDICATOR)
        .unwrap_or(text.len());
    &text[..end]
}

fn classify_comment(line: &str) -> LineKind<'_> {
    match directive_text(line) {
        Some((DecoratorTag::Dictionary, text)) => LineKind::Dictionary { text },
        Some((_, text)) => LineKind::Decorator { text },
        None => LineKind::Comment,
    }
}

fn split_relationship(line: &str) -> Option<(&str, &str)> {
    let (source, rest) = line.split_once(RELATION_TOKEN)?;
    let target = match rest.find(':') {
        Some(pos) => &rest[..pos],
        None => rest,
    };
    let (source, target) = (source.trim(), target.trim());
    if source.is_empty() || target.is_empty() {
        return None;
    }
    Some((source, target))
}

fn entity_name(line: &str) -> Option<&str> {
    let head = line.strip_suffix(BLOCK_OPEN)?.trim_end();
    let name = head.split_whitespace().next()?;
    Some(name)
}

fn split_field(line: &str) -> Option<(&str, &str, Option<&str>)> {
    let (field_type, rest) = split_token(line)?;
    let (name, rest) = split_token(rest)?;
    let decorators = rest
        .find(DIRECTIVE_INDICATOR)
        .map(|pos| rest[pos..].trim_end());
    Some((field_type, name, decorators))
}

fn split_token(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    Some((&text[..end], &text[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Outside Entity ====================

    #[test]
    fn test_entity_open() {
        assert_eq!(
            classify("User {", Mode::Outside),
            LineKind::EntityOpen { name: "User" }
        );
        assert_eq!(
            classify("User{", Mode::Outside),
            LineKind::EntityOpen { name: "User" }
        );
    }

    #[test]
    fn test_relationship_with_label() {
        assert_eq!(
            classify(r#"User ||--o{ Account: """#, Mode::Outside),
            LineKind::Relationship {
                source: "User",
                target: "Account"
            }
        );
    }

    #[test]
    fn test_relationship_without_label_is_not_an_entity() {
        assert_eq!(
            classify("User ||--o{ Account", Mode::Outside),
            LineKind::Relationship {
                source: "User",
                target: "Account"
            }
        );
    }

    #[test]
    fn test_relationship_target_stops_at_first_colon() {
        assert_eq!(
            classify("Org ||--o{ Team : has: many", Mode::Outside),
            LineKind::Relationship {
                source: "Org",
                target: "Team"
            }
        );
    }

    #[test]
    fn test_header_is_ignored() {
        assert_eq!(classify("erDiagram", Mode::Outside), LineKind::Ignored);
    }

    #[test]
    fn test_dictionary_line() {
        assert_eq!(
            classify("%% @dictionary Patterns { a: 'b' }", Mode::Outside),
            LineKind::Dictionary {
                text: "@dictionary Patterns { a: 'b' }"
            }
        );
        assert_eq!(
            classify("%%@dictionary P {}", Mode::Inside),
            LineKind::Dictionary {
                text: "@dictionary P {}"
            }
        );
    }

    #[test]
    fn test_commented_entity_open_is_a_comment() {
        assert_eq!(classify("%% Legacy {", Mode::Outside), LineKind::Comment);
    }

    // ==================== Inside Entity ====================

    #[test]
    fn test_entity_close() {
        assert_eq!(classify("}", Mode::Inside), LineKind::EntityClose);
    }

    #[test]
    fn test_decorator_line() {
        assert_eq!(
            classify("%% @abstract", Mode::Inside),
            LineKind::Decorator { text: "@abstract" }
        );
        assert_eq!(
            classify("%%@include BaseEntity", Mode::Inside),
            LineKind::Decorator {
                text: "@include BaseEntity"
            }
        );
    }

    #[test]
    fn test_unrecognized_tag_is_a_comment() {
        assert_eq!(classify("%% @todo fix this", Mode::Inside), LineKind::Comment);
        assert_eq!(classify("%% plain note", Mode::Inside), LineKind::Comment);
    }

    #[test]
    fn test_field_line() {
        assert_eq!(
            classify("String email", Mode::Inside),
            LineKind::Field {
                field_type: "String",
                name: "email",
                decorators: None
            }
        );
    }

    #[test]
    fn test_field_line_with_decorators() {
        assert_eq!(
            classify("String email %% @validate { required: true } @unique", Mode::Inside),
            LineKind::Field {
                field_type: "String",
                name: "email",
                decorators: Some("@validate { required: true } @unique")
            }
        );
    }

    #[test]
    fn test_field_line_with_broken_payload_is_still_a_field() {
        assert!(matches!(
            classify("String email %% @validate {", Mode::Inside),
            LineKind::Field { .. }
        ));
    }

    #[test]
    fn test_short_field_line_is_ignored() {
        assert_eq!(classify("String", Mode::Inside), LineKind::Ignored);
    }

    #[test]
    fn test_relationship_inside_entity_is_ignored() {
        assert_eq!(classify("A ||--o{ B : x", Mode::Inside), LineKind::Ignored);
    }

    // ==================== Helpers ====================

    #[test]
    fn test_leading_tag() {
        assert_eq!(leading_tag("ui{ a: 1 }"), "ui");
        assert_eq!(leading_tag("unique"), "unique");
        assert_eq!(leading_tag("include [A]"), "include");
    }

    #[test]
    fn test_directive_text() {
        let (tag, text) = directive_text("%%   @ui email { widget: 'email' }").unwrap();
        assert_eq!(tag, DecoratorTag::Ui);
        assert_eq!(text, "@ui email { widget: 'email' }");
        assert!(directive_text("%% @nope").is_none());
        assert!(directive_text("%% note").is_none());
    }
}
