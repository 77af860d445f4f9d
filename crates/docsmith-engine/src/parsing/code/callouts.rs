use regex::Regex;
use std::sync::OnceLock;

/// A numbered annotation on one line of a code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOut {
    pub index: u32,
    /// `<N>` for classic markers, the comment text for inline ones.
    pub text: String,
    pub inline: bool,
    /// Zero-based line within the code block.
    pub line: usize,
}

/// Result of scanning the lines of one code block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOutScan {
    /// Code lines with markers and promoted comments cut off.
    pub lines: Vec<String>,
    pub callouts: Vec<CallOut>,
    /// Classic markers and inline comments were both present.
    pub mixed: bool,
}

const INLINE_MAX_LINE: usize = 200;
const COMMENT_MARKERS: [&str; 2] = [" // ", " # "];

fn classic_markers() -> &'static Regex {
    static MARKERS: OnceLock<Regex> = OnceLock::new();
    MARKERS.get_or_init(|| Regex::new(r"(?:\s*<\d+>)+\s*$").expect("Invalid call-out regex"))
}

fn marker_numbers() -> &'static Regex {
    static NUMBERS: OnceLock<Regex> = OnceLock::new();
    NUMBERS.get_or_init(|| Regex::new(r"<(\d+)>").expect("Invalid call-out number regex"))
}

/// Finds call-outs in `lines`.
///
/// Classic markers are a trailing run of `<N>`. When a block has none, a
/// trailing ` // text` or ` # text` comment after code becomes an inline
/// call-out instead.
pub fn scan(lines: &[String]) -> CallOutScan {
    let mut scan = CallOutScan {
        lines: Vec::with_capacity(lines.len()),
        ..CallOutScan::default()
    };

    for (n, line) in lines.iter().enumerate() {
        match classic_cut(line) {
            Some((code, numbers)) => {
                scan.lines.push(code.to_string());
                scan.callouts.extend(numbers.into_iter().map(|index| CallOut {
                    index,
                    text: format!("<{index}>"),
                    inline: false,
                    line: n,
                }));
            }
            None => scan.lines.push(line.clone()),
        }
    }

    let has_inline = scan
        .lines
        .iter()
        .any(|line| inline_comment(line).is_some());
    if !scan.callouts.is_empty() {
        scan.mixed = has_inline;
        return scan;
    }
    if !has_inline {
        return scan;
    }

    for (n, line) in scan.lines.iter_mut().enumerate() {
        if let Some((code_len, comment)) = inline_comment(line) {
            let comment = comment.to_string();
            line.truncate(code_len);
            scan.callouts.push(CallOut {
                index: scan.callouts.len() as u32 + 1,
                text: comment,
                inline: true,
                line: n,
            });
        }
    }
    scan
}

/// Code before a classic marker run and the marker numbers.
fn classic_cut(line: &str) -> Option<(&str, Vec<u32>)> {
    let m = classic_markers().find(line)?;
    if line[..m.start()].trim().is_empty() {
        return None;
    }
    let numbers = marker_numbers()
        .captures_iter(m.as_str())
        .filter_map(|caps| caps[1].parse().ok())
        .collect();

    let mut code = line[..m.start()].trim_end();
    // `foo(); // <1>` leaves an empty comment behind
    for marker in ["//", "#"] {
        if let Some(stripped) = code.strip_suffix(marker)
            && stripped.ends_with(' ')
            && !stripped.trim().is_empty()
        {
            code = stripped.trim_end();
            break;
        }
    }
    Some((code, numbers))
}

/// Byte length of the code part and the comment text of a trailing comment.
fn inline_comment(line: &str) -> Option<(usize, &str)> {
    if line.len() >= INLINE_MAX_LINE {
        return None;
    }
    let (at, marker) = COMMENT_MARKERS
        .iter()
        .filter_map(|marker| line.rfind(marker).map(|at| (at, *marker)))
        .max_by_key(|(at, _)| *at)?;
    let code = line[..at].trim_end();
    let comment = line[at + marker.len()..].trim();
    (!code.trim().is_empty() && !comment.is_empty()).then_some((code.len(), comment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(src: &str) -> Vec<String> {
        src.lines().map(String::from).collect()
    }

    #[test]
    fn classic_markers_are_cut() {
        let scan = scan(&lines("let a = 1; <1>\nlet b = 2; // <2> <3>\nplain"));

        assert_eq!(scan.lines, vec!["let a = 1;", "let b = 2;", "plain"]);
        let found: Vec<_> = scan.callouts.iter().map(|c| (c.index, c.line)).collect();
        assert_eq!(found, vec![(1, 0), (2, 1), (3, 1)]);
        assert!(scan.callouts.iter().all(|c| !c.inline));
        assert!(!scan.mixed);
    }

    #[test]
    fn marker_alone_on_a_line_is_code() {
        let scan = scan(&lines("<1>\n  <html>"));
        assert!(scan.callouts.is_empty());
    }

    #[test]
    fn inline_comments_become_numbered_callouts() {
        let scan = scan(&lines(
            "GET /_search // run a search\n# a full-line comment\nPUT /index # create it",
        ));

        assert_eq!(scan.lines, vec!["GET /_search", "# a full-line comment", "PUT /index"]);
        let found: Vec<_> = scan
            .callouts
            .iter()
            .map(|c| (c.index, c.text.as_str(), c.inline))
            .collect();
        assert_eq!(found, vec![(1, "run a search", true), (2, "create it", true)]);
    }

    #[test]
    fn long_lines_are_not_annotated() {
        let long = format!("{} // note", "x".repeat(INLINE_MAX_LINE));
        assert!(scan(&[long]).callouts.is_empty());
    }

    #[test]
    fn mixing_styles_is_flagged() {
        let scan = scan(&lines("a = 1 <1>\nb = 2 // why"));

        assert!(scan.mixed);
        assert_eq!(scan.callouts.len(), 1);
        assert!(!scan.callouts[0].inline);
    }
}
