use std::collections::HashMap;

/// `:key: value` lines of a directive. Keys are unique; the last line wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties(HashMap<String, String>);

impl Properties {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Value of the first key present, trying aliases in order.
    pub fn get(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.0.get(*key)).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// A boolean flag. A bare `:key:` is true, a missing key is false.
    ///
    /// Returns the raw value when it is not a boolean.
    pub fn try_flag(&self, key: &str) -> Result<bool, &str> {
        match self.0.get(key).map(|v| v.trim()) {
            None => Ok(false),
            Some("" | "true") => Ok(true),
            Some("false") => Ok(false),
            Some(other) => Err(other),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn aliases_are_tried_in_order() {
        let mut props = Properties::default();
        props.insert("applies-to", "stack: ga");

        assert_eq!(props.get(&["applies_to", "applies-to"]), Some("stack: ga"));
        assert_eq!(props.get(&["applies_to"]), None);
    }

    #[rstest]
    #[case(None, Ok(false))]
    #[case(Some(""), Ok(true))]
    #[case(Some("true"), Ok(true))]
    #[case(Some("false"), Ok(false))]
    #[case(Some("yes"), Err("yes"))]
    fn flags(#[case] value: Option<&str>, #[case] expected: Result<bool, &str>) {
        let mut props = Properties::default();
        if let Some(value) = value {
            props.insert("open", value);
        }
        assert_eq!(props.try_flag("open"), expected);
    }
}
