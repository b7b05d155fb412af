//! Four-operator arithmetic for quick calculations.
//!
//! ```text
//! expr   -> term (('+' | '-') term)*
//! term   -> factor (('*' | '/') factor)*
//! factor -> '(' expr ')' | number
//! number -> digits with at most one '.'
//! ```
//!
//! Parsing and evaluation happen in one pass. Each production takes the input
//! and a cursor and returns the value together with the cursor after it, so no
//! parser state is shared between calls. Operators of equal precedence fold
//! left to right. Whitespace between tokens is ignored; anything left over
//! after the outermost expression makes the whole input invalid.
//!
//! Division follows IEEE-754: `1/0` is infinity and `0/0` is NaN.
//!
//! Parentheses nest at most [`MAX_DEPTH`] levels deep; deeper input is
//! treated as invalid.

/// Deepest parenthesis nesting accepted by [`evaluate`].
pub const MAX_DEPTH: usize = 256;

/// Evaluate `input`, returning `None` if it is not a complete expression.
///
/// ```rust
/// use quickphrase_core::calc::evaluate;
///
/// assert_eq!(evaluate("2+3*4"), Some(14.0));
/// assert_eq!(evaluate("1-2-3"), Some(-4.0));
/// assert_eq!(evaluate("(1+2"), None);
/// ```
pub fn evaluate(input: &str) -> Option<f64> {
    let input = input.as_bytes();
    let (value, pos) = expr(input, 0, 0)?;
    (skip_spaces(input, pos) == input.len()).then_some(value)
}

/// Render a result the way it is offered as a candidate.
///
/// Uses the shortest representation that reads back as the same `f64`
/// (`14`, `0.5`, `inf`, `NaN`); negative zero prints as `0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

fn skip_spaces(input: &[u8], mut pos: usize) -> usize {
    while input.get(pos).is_some_and(u8::is_ascii_whitespace) {
        pos += 1;
    }
    pos
}

fn expr(input: &[u8], pos: usize, depth: usize) -> Option<(f64, usize)> {
    let (mut acc, mut pos) = term(input, pos, depth)?;
    loop {
        let at = skip_spaces(input, pos);
        let op = match input.get(at) {
            Some(&op @ (b'+' | b'-')) => op,
            _ => return Some((acc, pos)),
        };
        let (rhs, next) = term(input, at + 1, depth)?;
        acc = if op == b'+' { acc + rhs } else { acc - rhs };
        pos = next;
    }
}

fn term(input: &[u8], pos: usize, depth: usize) -> Option<(f64, usize)> {
    let (mut acc, mut pos) = factor(input, pos, depth)?;
    loop {
        let at = skip_spaces(input, pos);
        let op = match input.get(at) {
            Some(&op @ (b'*' | b'/')) => op,
            _ => return Some((acc, pos)),
        };
        let (rhs, next) = factor(input, at + 1, depth)?;
        acc = if op == b'*' { acc * rhs } else { acc / rhs };
        pos = next;
    }
}

fn factor(input: &[u8], pos: usize, depth: usize) -> Option<(f64, usize)> {
    let pos = skip_spaces(input, pos);
    if *input.get(pos)? == b'(' {
        if depth >= MAX_DEPTH {
            return None;
        }
        let (value, pos) = expr(input, pos + 1, depth + 1)?;
        let pos = skip_spaces(input, pos);
        return (input.get(pos) == Some(&b')')).then_some((value, pos + 1));
    }
    number(input, pos)
}

fn number(input: &[u8], start: usize) -> Option<(f64, usize)> {
    let mut pos = start;
    let mut seen_dot = false;
    while let Some(&b) = input.get(pos) {
        match b {
            b'0'..=b'9' => {}
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        pos += 1;
    }
    if pos == start {
        return None;
    }
    let literal = std::str::from_utf8(&input[start..pos]).ok()?;
    literal.parse().ok().map(|value| (value, pos))
}
