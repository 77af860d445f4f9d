use crate::parsing::context::ParseContext;

use super::{Role, RoleInput, RoleKind};

/// Embedded icon assets, sorted by name.
const ICONS: [(&str, &str); 12] = [
    ("bell", include_str!("../../../assets/icons/bell.svg")),
    ("check", include_str!("../../../assets/icons/check.svg")),
    ("clock", include_str!("../../../assets/icons/clock.svg")),
    ("copy", include_str!("../../../assets/icons/copy.svg")),
    ("cross", include_str!("../../../assets/icons/cross.svg")),
    ("document", include_str!("../../../assets/icons/document.svg")),
    ("gear", include_str!("../../../assets/icons/gear.svg")),
    ("info", include_str!("../../../assets/icons/info.svg")),
    ("link", include_str!("../../../assets/icons/link.svg")),
    ("lock", include_str!("../../../assets/icons/lock.svg")),
    ("search", include_str!("../../../assets/icons/search.svg")),
    ("warning", include_str!("../../../assets/icons/warning.svg")),
];

pub fn lookup(name: &str) -> Option<&'static str> {
    ICONS
        .binary_search_by_key(&name, |(icon, _)| *icon)
        .ok()
        .map(|i| ICONS[i].1)
}

pub fn names() -> impl Iterator<Item = &'static str> {
    ICONS.iter().map(|(name, _)| *name)
}

/// `{icon}`name``
pub struct IconRole;

impl Role for IconRole {
    fn matches(&self, name: &str) -> bool {
        name == "icon"
    }

    fn create(&self, input: &RoleInput<'_>, ctx: &ParseContext) -> RoleKind {
        let name = input.content.trim();
        let svg = lookup(name);
        if svg.is_none() {
            ctx.error(input.position, format!("Unknown icon: '{name}'"));
        }
        RoleKind::Icon {
            name: name.to_string(),
            svg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_for_binary_search() {
        let names: Vec<_> = names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn every_icon_is_svg() {
        for name in names() {
            let svg = lookup(name).unwrap();
            assert!(svg.starts_with("<svg"), "{name} is not an svg");
        }
        assert_eq!(lookup("doesnotexist"), None);
    }
}
