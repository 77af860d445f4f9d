//! # Inline Kinds
//!
//! Inline-specific types that own their syntax delimiters. The parser uses
//! these constants; it never hardcodes `{` or `` ` ``.

pub mod code_span;
pub mod irregular_space;
pub mod link;
pub mod role_delimiters;
pub mod substitution;

pub use code_span::CodeSpan;
pub use irregular_space::SpaceNormalizer;
pub use link::LinkSyntax;
pub use role_delimiters::RoleDelimiters;
pub use substitution::SubstitutionDelimiters;
