use super::DirectiveInput;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MathBlock {
    /// `:label:`, also the block's cross-reference name.
    pub label: Option<String>,
}

impl MathBlock {
    pub(super) fn finalize(&mut self, input: &DirectiveInput<'_>) -> Option<String> {
        if input.body.is_none_or(|body| body.trim().is_empty()) {
            input.error("{math} requires content");
        }
        self.label = input.properties.get(&["label"]).map(str::to_string);
        self.label.clone()
    }
}
