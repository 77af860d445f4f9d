use crate::parsing::applicability::ApplicableTo;
use crate::parsing::context::ParseContext;

use super::{Role, RoleInput, RoleKind};

/// `{applies_to}`stack: ga 9.1``, also spelled `applies-to`.
pub struct AppliesToRole;

impl Role for AppliesToRole {
    fn matches(&self, name: &str) -> bool {
        matches!(name, "applies_to" | "applies-to")
    }

    fn create(&self, input: &RoleInput<'_>, ctx: &ParseContext) -> RoleKind {
        let mut problems = Vec::new();
        let applies_to = ApplicableTo::parse(input.content, &ctx.config.products, &mut problems);
        for (severity, message) in problems {
            ctx.emit(severity, input.position, message);
        }
        if applies_to.is_none() {
            ctx.error(
                input.position,
                format!("Unable to parse applies_to definition: {}", input.content),
            );
        }
        RoleKind::AppliesTo { applies_to }
    }
}
