//! Common types and utilities shared between encoder and decoder

/// Nesting limit used when options are left at their defaults
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Remaining stack below which recursive walks switch to a fresh segment
pub(crate) const STACK_RED_ZONE: usize = 64 * 1024;

/// Size of each stack segment allocated by those walks
pub(crate) const STACK_GROWTH: usize = 1024 * 1024;

/// What the decoder does with a string that starts like JSON but fails to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidEmbedded {
    /// Keep the original string unchanged
    #[default]
    KeepString,
    /// Replace the string with `null`
    Null,
}

/// Returns true when `s` starts with `[` or `{` after leading whitespace.
pub(crate) fn looks_like_json(s: &str) -> bool {
    // \x0b is whitespace for the purposes of this test but not for is_ascii_whitespace
    let rest = s.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b');
    rest.starts_with('[') || rest.starts_with('{')
}

/// Deepest bracket nesting in `text`, ignoring brackets inside string literals.
///
/// Runs before the JSON parser so that over-deep input is rejected without
/// recursing into it. Malformed text still yields a number; the parser reports
/// the syntax error afterwards.
pub(crate) fn nesting_depth(text: &str) -> usize {
    let mut depth = 0usize;
    let mut max = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for b in text.bytes() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                max = max.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    max
}

/// Deepest array/object nesting in an in-memory plain value.
pub(crate) fn plain_depth(value: &serde_json::Value) -> usize {
    let mut max = 0usize;
    let mut stack = vec![(value, 0usize)];

    while let Some((value, depth)) = stack.pop() {
        match value {
            serde_json::Value::Array(items) => {
                max = max.max(depth + 1);
                stack.extend(items.iter().map(|v| (v, depth + 1)));
            }
            serde_json::Value::Object(map) => {
                max = max.max(depth + 1);
                stack.extend(map.values().map(|v| (v, depth + 1)));
            }
            _ => {}
        }
    }

    max
}
