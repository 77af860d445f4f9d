use crate::parsing::rope::{SourceSpan, span::Span};
use crate::parsing::roles::RoleKind;

/// A parsed inline node with byte spans into the rope.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineNode {
    /// Plain text that isn't part of any special construct.
    Text(Span),
    /// A code span (backtick-delimited). This is a raw zone: no parsing inside.
    CodeSpan {
        /// Full span including backticks.
        full: Span,
        /// Content between backticks.
        inner: Span,
    },
    Role(RoleLeaf),
    IrregularSpace(IrregularSpace),
    Link(Link),
    Substitution(SubstitutionLeaf),
}

impl InlineNode {
    pub fn span(&self) -> Span {
        match self {
            InlineNode::Text(sp) => *sp,
            InlineNode::CodeSpan { full, .. } => *full,
            InlineNode::Role(role) => role.span,
            InlineNode::IrregularSpace(space) => space.span,
            InlineNode::Link(link) => link.span,
            InlineNode::Substitution(sub) => sub.span,
        }
    }
}

/// A `{name}`content`` role, created fully formed in one step.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleLeaf {
    pub role: String,
    pub content: String,
    /// Length of the opening `{` run.
    pub delimiter_count: usize,
    /// Full span from `{` to the closing backtick.
    pub span: Span,
    pub position: SourceSpan,
    pub kind: RoleKind,
}

/// Which class an irregular whitespace char falls in. Both render as the
/// same space marker; the class only shapes the hint text and fixers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceAction {
    /// Visible but non-standard spacing, to be replaced by a space.
    Replace,
    /// Invisible or zero-width, to be removed from the source.
    Remove,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IrregularSpace {
    pub span: Span,
    pub ch: char,
    pub action: SpaceAction,
}

impl IrregularSpace {
    /// The space marker: one ASCII space whatever the class.
    pub fn rendered(&self) -> &'static str {
        " "
    }
}

/// An inline `[text](destination)` link or `![alt](src)` image.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub span: Span,
    pub text: Span,
    pub destination: String,
    pub image: bool,
    pub position: SourceSpan,
    /// Target URL once a cross-link has been resolved.
    pub resolved: Option<String>,
}

/// A `{{key}}` substitution, resolved when parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutionLeaf {
    pub span: Span,
    /// Lowercased key without mutations.
    pub key: String,
    /// Value with mutations applied; `None` renders the source as written.
    pub replacement: Option<String>,
    pub position: SourceSpan,
}
