use std::collections::HashMap;

use super::DirectiveKind;
use super::admonition::{AdmonitionBlock, AdmonitionKind};
use super::applies_switch::{AppliesItem, AppliesSwitch};
use super::math::MathBlock;
use super::mermaid::MermaidBlock;
use super::table::TableDirective;

/// Builds the initial, not yet finalized, state of a directive by name.
pub type DirectiveConstructor = fn(&str) -> DirectiveKind;

/// Directive name to constructor. Unregistered names are the caller's
/// problem: the block scan reports them and keeps a generic container.
pub struct DirectiveRegistry {
    constructors: HashMap<String, DirectiveConstructor>,
}

impl DirectiveRegistry {
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, constructor: DirectiveConstructor) {
        self.constructors.insert(name.into(), constructor);
    }

    pub fn create(&self, name: &str) -> Option<DirectiveKind> {
        self.constructors.get(name).map(|construct| construct(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }
}

impl Default for DirectiveRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for name in AdmonitionKind::NAMES {
            registry.register(name, |name| {
                DirectiveKind::Admonition(AdmonitionBlock::new(AdmonitionKind::from_name(name)))
            });
        }
        registry.register("anchor", |_| DirectiveKind::Anchor);
        registry.register("math", |_| DirectiveKind::Math(MathBlock::default()));
        registry.register("mermaid", |_| DirectiveKind::Mermaid(MermaidBlock::default()));
        registry.register("table", |_| DirectiveKind::Table(TableDirective::default()));
        registry.register("applies-switch", |_| {
            DirectiveKind::AppliesSwitch(AppliesSwitch::default())
        });
        registry.register("applies-item", |_| DirectiveKind::AppliesItem(AppliesItem::default()));
        registry
    }
}
