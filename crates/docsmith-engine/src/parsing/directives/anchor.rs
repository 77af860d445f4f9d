use super::DirectiveInput;

/// Validates `{anchor} name` and returns the cross-reference it declares.
pub(super) fn finalize(input: &DirectiveInput<'_>) -> Option<String> {
    let Some(name) = input.arguments else {
        input.error("{anchor} requires an argument naming the anchor");
        return None;
    };
    if !is_valid_anchor(name) {
        input.error(format!(
            "Anchor '{name}' may only contain lowercase letters, digits, '-' and '_'"
        ));
        return None;
    }
    Some(name.to_string())
}

pub fn is_valid_anchor(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}
