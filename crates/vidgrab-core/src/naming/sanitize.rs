//! Filesystem-safe name sanitization.

/// Characters rejected by at least one common desktop filesystem.
pub const RESERVED_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Sanitizes a candidate filename component.
///
/// - Replaces each of `< > : " / \ | ? *` with `_`
/// - Leaves everything else alone (case, whitespace, length)
///
/// The output has the same number of characters as the input, and sanitizing
/// an already sanitized string returns it unchanged.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if RESERVED_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// True if `name` contains none of the reserved characters.
pub fn is_sanitized(name: &str) -> bool {
    !name.chars().any(|c| RESERVED_CHARS.contains(&c))
}
