//! # Roles
//!
//! Inline `{name}`content`` extensions. The inline scanner finds the name and
//! content; a registered [`Role`] decides whether the name is its own and
//! builds the node.

pub mod applies_to;
pub mod icons;
pub mod kbd;

use crate::parsing::applicability::ApplicableTo;
use crate::parsing::context::ParseContext;
use crate::parsing::rope::SourceSpan;

pub use applies_to::AppliesToRole;
pub use icons::IconRole;
pub use kbd::KbdRole;

/// What the scanner hands a role once the syntax matched.
#[derive(Debug, Clone, Copy)]
pub struct RoleInput<'a> {
    pub name: &'a str,
    pub content: &'a str,
    pub position: SourceSpan,
}

/// Role-specific data carried by a [`crate::parsing::inline::RoleLeaf`].
#[derive(Debug, Clone, PartialEq)]
pub enum RoleKind {
    Icon {
        name: String,
        /// `None` for unknown icon names.
        svg: Option<&'static str>,
    },
    AppliesTo {
        applies_to: Option<ApplicableTo>,
    },
    Kbd {
        /// Normalised key names, in combination order.
        keys: Vec<String>,
    },
}

pub trait Role: Send + Sync {
    fn matches(&self, name: &str) -> bool;

    /// Builds the role. Problems are reported through `ctx`; a role is
    /// always created once its name matched.
    fn create(&self, input: &RoleInput<'_>, ctx: &ParseContext) -> RoleKind;
}

pub struct RoleRegistry {
    roles: Vec<Box<dyn Role>>,
}

impl RoleRegistry {
    pub fn empty() -> Self {
        Self { roles: Vec::new() }
    }

    pub fn register(&mut self, role: Box<dyn Role>) {
        self.roles.push(role);
    }

    /// First registered role that accepts `name`.
    pub fn find(&self, name: &str) -> Option<&dyn Role> {
        self.roles
            .iter()
            .find(|role| role.matches(name))
            .map(|role| role.as_ref())
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(IconRole));
        registry.register(Box::new(AppliesToRole));
        registry.register(Box::new(KbdRole));
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_knows_builtin_roles() {
        let registry = RoleRegistry::default();
        for name in ["icon", "applies_to", "applies-to", "kbd"] {
            assert!(registry.find(name).is_some(), "{name} should be registered");
        }
        assert!(registry.find("json").is_none());
        assert!(RoleRegistry::empty().find("icon").is_none());
    }
}
