use crate::compiler::{escaped_ident, is_raw_keyword, label_param_name};
use heck::ToSnakeCase;
use proc_macro2::{Ident, Span};

/// Build an identifier from an already validated name, escaping keywords
#[must_use]
pub fn ident(name: &str) -> Ident {
    let escaped = escaped_ident(name);
    if is_raw_keyword(&escaped) {
        Ident::new_raw(&escaped, Span::call_site())
    } else {
        Ident::new(&escaped, Span::call_site())
    }
}

#[must_use]
pub fn snake_ident(name: &str) -> Ident {
    ident(&name.to_snake_case())
}

/// Parameter for the label at `index`
#[must_use]
pub fn label_param(label: &str, index: usize) -> Ident {
    ident(&label_param_name(label, index))
}

/// Whether any parameter built by [`label_param`] would trip the `non_snake_case` lint
#[must_use]
pub fn needs_non_snake_case_allowance(labels: &[String]) -> bool {
    labels.iter().any(|label| label.to_snake_case() != label.trim_start_matches('_'))
}
