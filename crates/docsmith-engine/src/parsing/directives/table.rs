use super::DirectiveInput;

/// `{table}` wrapping a pipe table, with optional fixed column widths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableDirective {
    pub caption: Option<String>,
    /// Positive integer weights, `None` for `auto` or when absent.
    pub widths: Option<Vec<u32>>,
}

impl TableDirective {
    pub(super) fn finalize(&mut self, input: &DirectiveInput<'_>) {
        self.caption = input.arguments.map(str::to_string);
        self.widths = match input.properties.get(&["widths"]) {
            None => None,
            Some(raw) => parse_widths(raw).unwrap_or_else(|token| {
                input.error(format!("Invalid column width '{token}'"));
                None
            }),
        };
    }
}

/// `30 70`, `30,70` or `auto`. Returns the bad token on failure.
pub fn parse_widths(raw: &str) -> Result<Option<Vec<u32>>, String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    raw.split([' ', '\t', ','])
        .filter(|token| !token.is_empty())
        .map(|token| match token.parse::<u32>() {
            Ok(width) if width > 0 => Ok(width),
            _ => Err(token.to_string()),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Widths as percentages of their sum, rounded to two decimals.
pub fn percentages(widths: &[u32]) -> Vec<f64> {
    let total: u64 = widths.iter().map(|w| u64::from(*w)).sum();
    if total == 0 {
        return Vec::new();
    }
    let total = total as f64;
    widths
        .iter()
        .map(|w| (f64::from(*w) * 100.0 / total * 100.0).round() / 100.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("30 70", Ok(Some(vec![30, 70])))]
    #[case("20, 30,50", Ok(Some(vec![20, 30, 50])))]
    #[case("auto", Ok(None))]
    #[case("30 wide", Err("wide".to_string()))]
    #[case("0 100", Err("0".to_string()))]
    fn width_lists(#[case] raw: &str, #[case] expected: Result<Option<Vec<u32>>, String>) {
        assert_eq!(parse_widths(raw), expected);
    }

    #[test]
    fn percentages_of_sum() {
        assert_eq!(percentages(&[30, 70]), vec![30.0, 70.0]);
        assert_eq!(percentages(&[1, 1, 1]), vec![33.33, 33.33, 33.33]);
        assert_eq!(percentages(&[1, 3]), vec![25.0, 75.0]);
    }

    #[test]
    fn huge_widths_do_not_overflow() {
        assert_eq!(
            percentages(&[4_000_000_000, 4_000_000_000]),
            vec![50.0, 50.0]
        );
        assert_eq!(percentages(&[u32::MAX, u32::MAX, u32::MAX, u32::MAX]).len(), 4);
    }
}
