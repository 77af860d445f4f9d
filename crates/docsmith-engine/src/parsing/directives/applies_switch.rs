use crate::parsing::applicability::{ApplicableTo, sync_key};
use crate::parsing::substitutions;

use super::DirectiveInput;

/// `{applies-switch}`: tabs whose selection syncs with equivalent tabs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppliesSwitch {
    /// Source line of the opening fence; stable for one read of a document.
    pub index: usize,
    pub group: String,
}

impl AppliesSwitch {
    pub const DEFAULT_GROUP: &'static str = "applies-switches";

    pub(super) fn finalize(&mut self, input: &DirectiveInput<'_>) {
        let slot = SwitchScope::of(input);
        self.index = slot.index;
        self.group = slot.group;
    }
}

/// What a switch tells the items directly inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchScope {
    pub index: usize,
    pub group: String,
}

impl SwitchScope {
    pub fn of(input: &DirectiveInput<'_>) -> Self {
        Self {
            index: input.line,
            group: input
                .properties
                .get(&["group"])
                .unwrap_or(AppliesSwitch::DEFAULT_GROUP)
                .to_string(),
        }
    }
}

/// An item's place within its enclosing switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchSlot {
    pub switch: SwitchScope,
    pub item_index: usize,
}

/// `{applies-item} stack: ga 9.1`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppliesItem {
    pub definition: String,
    pub applies_to: Option<ApplicableTo>,
    pub sync_key: String,
    /// Position among the items of the enclosing switch.
    pub index: usize,
    pub switch: Option<SwitchScope>,
    pub selected: bool,
}

impl AppliesItem {
    pub const UNDEFINED: &'static str = "{undefined}";

    pub(super) fn finalize(&mut self, input: &DirectiveInput<'_>, slot: Option<&SwitchSlot>) {
        match input.arguments {
            Some(arguments) => {
                let definition =
                    substitutions::replace_in(arguments, &input.ctx.config.substitutions)
                        .unwrap_or_else(|| arguments.to_string());
                let mut problems = Vec::new();
                self.applies_to =
                    ApplicableTo::parse(&definition, input.products(), &mut problems);
                for (severity, message) in problems {
                    input.emit(severity, message);
                }
                if self.applies_to.is_none() {
                    input.error(format!(
                        "Unable to parse applies_to definition: {definition}"
                    ));
                }
                self.definition = definition;
            }
            None => {
                input.error("{applies-item} requires an argument with applies_to definition.");
                self.definition = Self::UNDEFINED.to_string();
            }
        }

        self.sync_key = match input.properties.get(&["sync"]) {
            Some(key) => key.to_string(),
            None => sync_key(&self.definition),
        };
        self.selected = input.flag("selected");

        match slot {
            Some(slot) => {
                self.index = slot.item_index;
                self.switch = Some(slot.switch.clone());
            }
            None => input.warning("{applies-item} must be placed directly inside an {applies-switch}"),
        }
    }
}
