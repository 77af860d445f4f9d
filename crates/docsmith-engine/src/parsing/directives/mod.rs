//! # Directives
//!
//! Colon-fenced container blocks:
//!
//! ```text
//! :::{name} arguments
//! :key: value
//! nested markdown
//! :::
//! ```
//!
//! The block scan opens an [`OpenDirective`] per fence, fills it with
//! properties and children, and closes it into a [`DirectiveBlock`]. After
//! the tree is built, the finalize pass calls
//! [`DirectiveBlock::finalize_and_validate`] once per block, children first.
//! Cross-node rewrites (switch items, table widths, call-out lists) live in
//! [`crate::parsing::finalize`], not here.

pub mod admonition;
pub mod anchor;
pub mod applies_switch;
pub mod math;
pub mod mermaid;
pub mod open;
pub mod properties;
pub mod registry;
pub mod table;

pub use admonition::{AdmonitionBlock, AdmonitionKind};
pub use applies_switch::{AppliesItem, AppliesSwitch, SwitchScope, SwitchSlot};
pub use math::MathBlock;
pub use mermaid::MermaidBlock;
pub use open::OpenDirective;
pub use properties::Properties;
pub use registry::{DirectiveConstructor, DirectiveRegistry};
pub use table::TableDirective;

use crate::diagnostics::Severity;
use crate::parsing::applicability::ApplicableTo;
use crate::parsing::blocks::types::BlockNode;
use crate::parsing::context::ParseContext;
use crate::parsing::rope::SourceSpan;

#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveKind {
    Admonition(AdmonitionBlock),
    Anchor,
    Math(MathBlock),
    Mermaid(MermaidBlock),
    Table(TableDirective),
    AppliesSwitch(AppliesSwitch),
    AppliesItem(AppliesItem),
    /// Unregistered name; kept as a plain container.
    Unknown,
}

impl DirectiveKind {
    /// Raw directives capture their body verbatim instead of parsing it.
    pub fn raw_body(&self) -> bool {
        matches!(self, DirectiveKind::Math(_) | DirectiveKind::Mermaid(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveBlock {
    pub name: String,
    pub kind: DirectiveKind,
    pub arguments: Option<String>,
    pub properties: Properties,
    /// Derived by the directive, or explicit via `:name:`.
    pub cross_reference_name: Option<String>,
    /// From an `:applies_to:` property on any directive.
    pub applies_to: Option<ApplicableTo>,
    pub fence_len: usize,
    /// 1-based line of the opening fence.
    pub line: usize,
    /// Position of the opening fence line, where diagnostics point.
    pub opening: SourceSpan,
    /// Verbatim body of raw directives.
    pub body: Option<String>,
    pub children: Vec<BlockNode>,
    pub finalized: bool,
}

pub trait HasTitle {
    fn title(&self) -> Option<&str>;
}

pub trait HasAppliesTo {
    fn applies_to(&self) -> Option<&ApplicableTo>;
}

impl HasTitle for DirectiveBlock {
    fn title(&self) -> Option<&str> {
        match &self.kind {
            DirectiveKind::Admonition(admonition) => admonition.title.as_deref(),
            DirectiveKind::Table(table) => table.caption.as_deref(),
            DirectiveKind::AppliesItem(item) if !item.definition.is_empty() => {
                Some(item.definition.as_str())
            }
            _ => None,
        }
    }
}

impl HasAppliesTo for DirectiveBlock {
    fn applies_to(&self) -> Option<&ApplicableTo> {
        match &self.kind {
            DirectiveKind::AppliesItem(item) => item.applies_to.as_ref(),
            _ => self.applies_to.as_ref(),
        }
    }
}

/// Read-only view of a directive handed to each kind's finalize step.
pub struct DirectiveInput<'a> {
    pub name: &'a str,
    pub arguments: Option<&'a str>,
    pub properties: &'a Properties,
    pub body: Option<&'a str>,
    pub line: usize,
    pub opening: SourceSpan,
    pub ctx: &'a ParseContext,
}

impl DirectiveInput<'_> {
    pub fn emit(&self, severity: Severity, message: impl Into<String>) {
        self.ctx.emit(severity, self.opening, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(Severity::Error, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.emit(Severity::Warning, message);
    }

    /// A boolean property; a non-boolean value is reported and reads as false.
    pub fn flag(&self, key: &str) -> bool {
        self.properties.try_flag(key).unwrap_or_else(|value| {
            self.error(format!(
                "Invalid value '{value}' for :{key}:, expected true or false"
            ));
            false
        })
    }

    pub fn products(&self) -> &[String] {
        &self.ctx.config.products
    }
}

impl DirectiveBlock {
    pub fn is_item(&self) -> bool {
        matches!(self.kind, DirectiveKind::AppliesItem(_))
    }

    /// Scope a switch hands to its items; `None` for other directives.
    pub fn switch_scope(&self, ctx: &ParseContext) -> Option<SwitchScope> {
        matches!(self.kind, DirectiveKind::AppliesSwitch(_))
            .then(|| SwitchScope::of(&self.input(ctx)))
    }

    fn input<'a>(&'a self, ctx: &'a ParseContext) -> DirectiveInput<'a> {
        DirectiveInput {
            name: &self.name,
            arguments: self.arguments.as_deref(),
            properties: &self.properties,
            body: self.body.as_deref(),
            line: self.line,
            opening: self.opening,
            ctx,
        }
    }

    /// Derives fields from arguments and properties and reports problems.
    ///
    /// Runs once; later calls are no-ops. `slot` is set for an item
    /// directly inside a switch.
    pub fn finalize_and_validate(&mut self, ctx: &ParseContext, slot: Option<&SwitchSlot>) {
        if self.finalized {
            return;
        }
        self.finalized = true;

        // The kind is moved out so the rest of the block can be read through `input`
        let mut kind = std::mem::replace(&mut self.kind, DirectiveKind::Unknown);
        let input = self.input(ctx);

        let derived = match &mut kind {
            DirectiveKind::Admonition(admonition) => {
                admonition.finalize(&input);
                None
            }
            DirectiveKind::Anchor => anchor::finalize(&input),
            DirectiveKind::Math(math) => math.finalize(&input),
            DirectiveKind::Mermaid(mermaid) => {
                mermaid.finalize(&input);
                None
            }
            DirectiveKind::Table(table) => {
                table.finalize(&input);
                None
            }
            DirectiveKind::AppliesSwitch(switch) => {
                switch.finalize(&input);
                None
            }
            DirectiveKind::AppliesItem(item) => {
                item.finalize(&input, slot);
                None
            }
            DirectiveKind::Unknown => None,
        };

        let explicit = input.properties.get(&["name"]).map(str::to_string);
        let parsed_applies_to = match input.properties.get(&["applies_to", "applies-to"]) {
            Some(definition) => {
                let mut problems = Vec::new();
                let parsed = ApplicableTo::parse(definition, input.products(), &mut problems);
                for (severity, message) in problems {
                    input.emit(severity, message);
                }
                if parsed.is_none() {
                    input.error(format!("Unable to parse applies_to definition: {definition}"));
                }
                parsed
            }
            None => None,
        };

        self.kind = kind;
        self.cross_reference_name = explicit.or(derived);
        self.applies_to = parsed_applies_to;
    }
}
