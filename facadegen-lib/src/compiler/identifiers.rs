/// Words that can only appear in identifier position as raw identifiers
pub const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do", "dyn", "else", "enum", "extern", "false",
    "final", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub",
    "ref", "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use", "virtual", "where",
    "while", "yield",
];

/// Keywords that are not even allowed as raw identifiers
pub const PATH_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];

/// Spelling of `name` in generated code, without any `r#` prefix
///
/// Path keywords get a trailing `_`; every other name is kept as is.
#[must_use]
pub fn escaped_ident(name: &str) -> String {
    if PATH_KEYWORDS.contains(&name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// Whether an escaped name must be emitted as a raw identifier
#[must_use]
pub fn is_raw_keyword(escaped: &str) -> bool {
    KEYWORDS.contains(&escaped)
}

/// Accessor parameter name for the label at `index`
///
/// Labels are used verbatim so the generated signature reads like the declaration; the
/// lone `_` label is a pattern rather than a binding and gets a positional name instead.
#[must_use]
pub fn label_param_name(label: &str, index: usize) -> String {
    if label == "_" {
        format!("label_{index}")
    } else {
        escaped_ident(label)
    }
}
