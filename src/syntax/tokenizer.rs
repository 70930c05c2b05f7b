//! Rule-string tokenizer.
//!
//! A single left-to-right scan over the rule with three pieces of state: a
//! bracket-nesting depth counter, an "inside tag" toggle, and a one-shot
//! escape flag. Escaped characters are carried into segment text verbatim,
//! backslash included, so the final unescaping pass over finished text can
//! run after expansion.
//!
//! Tokenization is best-effort: malformed input still yields a segment
//! sequence, with the problems reported alongside it.

use crate::errors::WeftError;

// ============================================================================
// SEGMENTS
// ============================================================================

/// One typed slice of a rule string.
///
/// `Tag` and `Action` carry their raw content without the surrounding
/// delimiters. Empty `Text` segments are dropped during tokenization; empty
/// `Tag`/`Action` segments are kept (with an error recorded) so the
/// expansion tree stays well-formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Tag(String),
    Action(String),
}

// ============================================================================
// TOKENIZER
// ============================================================================

/// Splits a rule string into an ordered segment sequence.
///
/// Always returns the best-effort segments; parse problems (unclosed tags,
/// unbalanced brackets, empty tags/actions) are reported in the second
/// element without suppressing any output.
pub fn tokenize(rule: &str) -> (Vec<Segment>, Vec<WeftError>) {
    let mut segments = Vec::new();
    let mut errors = Vec::new();

    let mut buf = String::new();
    let mut depth: i32 = 0;
    let mut in_tag = false;
    let mut escaped = false;
    // Char offset where the current segment began, for diagnostics.
    let mut start = 0usize;

    for (pos, ch) in rule.chars().enumerate() {
        if escaped {
            buf.push(ch);
            escaped = false;
            continue;
        }
        match ch {
            '\\' => {
                // Preserve the backslash so unescaping can happen post-expansion.
                buf.push('\\');
                escaped = true;
            }
            '[' => {
                if depth == 0 && !in_tag {
                    flush_text(&mut buf, &mut segments);
                    start = pos + 1;
                } else {
                    // Nested bracket inside an action's rule text, or a
                    // bracket inside tag content: tracked but not a boundary.
                    buf.push('[');
                }
                depth += 1;
            }
            ']' => {
                depth -= 1;
                if depth == 0 && !in_tag {
                    if buf.is_empty() {
                        errors.push(WeftError::EmptyAction { position: start });
                    }
                    segments.push(Segment::Action(std::mem::take(&mut buf)));
                    start = pos + 1;
                } else {
                    buf.push(']');
                }
            }
            '#' if depth == 0 => {
                if in_tag {
                    if buf.is_empty() {
                        errors.push(WeftError::EmptyTag { position: start });
                    }
                    segments.push(Segment::Tag(std::mem::take(&mut buf)));
                } else {
                    flush_text(&mut buf, &mut segments);
                }
                start = pos + 1;
                in_tag = !in_tag;
            }
            _ => buf.push(ch),
        }
    }

    flush_text(&mut buf, &mut segments);

    if in_tag {
        errors.push(WeftError::UnclosedTag);
    }
    if depth > 0 {
        errors.push(WeftError::UnbalancedOpen);
    }
    if depth < 0 {
        errors.push(WeftError::UnbalancedClose);
    }

    (segments, errors)
}

/// Emits any pending text segment. Zero-length text is silently dropped.
fn flush_text(buf: &mut String, segments: &mut Vec<Segment>) {
    if !buf.is_empty() {
        segments.push(Segment::Text(std::mem::take(buf)));
    }
}
