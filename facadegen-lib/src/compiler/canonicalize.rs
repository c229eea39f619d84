/// Normalize a free-text metric or label name
///
/// Leading and trailing whitespace is trimmed and every remaining space becomes `_`.
/// Nothing else is touched: punctuation and non-ASCII characters pass through so that
/// name validation can report them instead of having them silently disappear.
#[must_use]
pub fn canonicalize(raw: &str) -> String {
    raw.trim().replace(' ', "_")
}
