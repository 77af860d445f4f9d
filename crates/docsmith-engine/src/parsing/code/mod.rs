//! Fenced code blocks and their call-out annotations.

pub mod callouts;

pub use callouts::{CallOut, CallOutScan};

use crate::parsing::blocks::kinds::FenceSig;
use crate::parsing::blocks::types::ListItem;
use crate::parsing::context::ParseContext;
use crate::parsing::rope::SourceSpan;
use crate::parsing::substitutions;

/// `key=value` arguments after the language in a fence info string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeArguments {
    pub callouts: bool,
    pub substitutions: bool,
}

impl Default for CodeArguments {
    fn default() -> Self {
        Self {
            callouts: true,
            substitutions: false,
        }
    }
}

impl CodeArguments {
    /// Parses `callouts=false subs=true` style arguments.
    ///
    /// Returns the offending token on failure.
    pub fn parse(arguments: &str) -> Result<Self, String> {
        let mut parsed = Self::default();
        for token in arguments.split([' ', '\t', ',']).filter(|t| !t.is_empty()) {
            let (key, value) = token.split_once('=').ok_or_else(|| token.to_string())?;
            let value = match value.trim_matches('"') {
                "true" => true,
                "false" => false,
                _ => return Err(token.to_string()),
            };
            match key {
                "callouts" => parsed.callouts = value,
                "subs" => parsed.substitutions = value,
                _ => return Err(token.to_string()),
            }
        }
        Ok(parsed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub fence: FenceSig,
    pub language: Option<String>,
    pub arguments: CodeArguments,
    /// Code lines with call-out markers cut off.
    pub lines: Vec<String>,
    pub callouts: Vec<CallOut>,
    /// Call-outs came from trailing comments and render in place.
    pub inline_annotations: bool,
    /// Items of the list bound to the call-outs at finalize.
    pub annotations: Vec<ListItem>,
    /// Span of the opening fence line.
    pub opening: SourceSpan,
    pub closed: bool,
}

impl CodeBlock {
    /// Call-outs are only read from plain three-character fences.
    pub const CALLOUT_FENCE_LEN: usize = 3;

    pub fn build(
        ctx: &ParseContext,
        fence: FenceSig,
        info: &str,
        raw_lines: Vec<String>,
        opening: SourceSpan,
        closed: bool,
    ) -> Self {
        let info = info.trim();
        let (language, rest) = match info.split_once([' ', '\t']) {
            Some((first, rest)) if !first.contains('=') => (Some(first), rest),
            None if !info.is_empty() && !info.contains('=') => (Some(info), ""),
            _ => (None, info),
        };
        let arguments = CodeArguments::parse(rest).unwrap_or_else(|token| {
            ctx.error(
                opening,
                format!("Unable to parse code block arguments: {rest} (at '{token}')"),
            );
            CodeArguments::default()
        });

        let mut block = CodeBlock {
            fence,
            language: language.map(str::to_string),
            arguments,
            lines: raw_lines,
            callouts: Vec::new(),
            inline_annotations: false,
            annotations: Vec::new(),
            opening,
            closed,
        };

        if arguments.substitutions {
            for line in &mut block.lines {
                if let Some(replaced) = substitutions::replace_in(line, &ctx.config.substitutions) {
                    *line = replaced;
                }
            }
        }

        if fence.len == Self::CALLOUT_FENCE_LEN && arguments.callouts {
            let scan = callouts::scan(&block.lines);
            if scan.mixed {
                ctx.error(opening, "Both inline and classic callouts are not supported");
            }
            block.inline_annotations = scan.callouts.iter().any(|c| c.inline);
            block.lines = scan.lines;
            block.callouts = scan.callouts;
        }
        block
    }

    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    /// Classic call-outs that still wait for their list.
    pub fn needs_list_binding(&self) -> bool {
        !self.callouts.is_empty() && !self.inline_annotations && self.annotations.is_empty()
    }
}
