//! Small helpers shared by the relay and the CLI

/// Shorten `s` to at most `max_chars` characters for logs, appending `…`
/// when something was cut. Counts chars, so multi-byte text never splits.
pub fn preview(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…", &s[..cut]),
    }
}
