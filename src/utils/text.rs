use std::borrow::Cow;

/// Upper bound, in characters, for upstream error bodies written to logs or carried
/// inside errors.
pub const ERROR_BODY_LOG_LIMIT: usize = 512;

/// Truncate `text` to at most `max_chars` characters, appending `...` when cut.
///
/// Cuts on a character boundary, so multi-byte UTF-8 input never panics.
pub fn truncate_for_log(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => Cow::Owned(format!("{}...", &text[..byte_idx])),
        None => Cow::Borrowed(text),
    }
}
