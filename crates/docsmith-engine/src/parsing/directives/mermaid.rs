use super::DirectiveInput;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MermaidBlock {
    /// Diagram type named on the first significant line.
    pub diagram: Option<&'static str>,
}

impl MermaidBlock {
    pub(super) fn finalize(&mut self, input: &DirectiveInput<'_>) {
        let Some(body) = input.body.filter(|body| !body.trim().is_empty()) else {
            input.error("{mermaid} requires content");
            return;
        };
        self.diagram = detect_diagram(body);
        if self.diagram.is_none() {
            let first = first_significant_line(body).unwrap_or_default();
            input.warning(format!("Unknown mermaid diagram type: '{first}'"));
        }
    }
}

const DIAGRAM_PREFIXES: [(&str, &str); 21] = [
    ("flowchart", "flowchart"),
    ("graph", "flowchart"),
    ("sequencediagram", "sequence"),
    ("classdiagram", "class"),
    ("statediagram", "state"),
    ("erdiagram", "er"),
    ("gantt", "gantt"),
    ("pie", "pie"),
    ("journey", "journey"),
    ("gitgraph", "gitgraph"),
    ("mindmap", "mindmap"),
    ("timeline", "timeline"),
    ("requirementdiagram", "requirement"),
    ("quadrantchart", "quadrant"),
    ("sankey", "sankey"),
    ("xychart", "xychart"),
    ("block-beta", "block"),
    ("packet-beta", "packet"),
    ("architecture-beta", "architecture"),
    ("kanban", "kanban"),
    ("radar-beta", "radar"),
];

const C4_KEYWORDS: [&str; 5] = [
    "C4Context",
    "C4Container",
    "C4Component",
    "C4Dynamic",
    "C4Deployment",
];

/// Skips blank lines, `%%` comments and a `---` front matter block.
fn first_significant_line(body: &str) -> Option<&str> {
    let mut in_front_matter = false;
    for line in body.lines().map(str::trim) {
        if line == "---" {
            in_front_matter = !in_front_matter;
            continue;
        }
        if in_front_matter || line.is_empty() || line.starts_with("%%") {
            continue;
        }
        return Some(line);
    }
    None
}

pub fn detect_diagram(body: &str) -> Option<&'static str> {
    let line = first_significant_line(body)?;
    if C4_KEYWORDS.iter().any(|keyword| line.starts_with(keyword)) {
        return Some("c4");
    }
    let lower = line.to_ascii_lowercase();
    DIAGRAM_PREFIXES
        .iter()
        .find(|(prefix, _)| lower.starts_with(prefix))
        .map(|(_, diagram)| *diagram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("flowchart LR\n  A --> B", Some("flowchart"))]
    #[case("\n%% comment\ngraph TD", Some("flowchart"))]
    #[case("sequenceDiagram\n  A->>B: hi", Some("sequence"))]
    #[case("---\ntitle: x\n---\nstateDiagram-v2", Some("state"))]
    #[case("C4Context\n  title System", Some("c4"))]
    #[case("c4context", None)]
    #[case("A --> B", None)]
    #[case("", None)]
    fn detection(#[case] body: &str, #[case] expected: Option<&str>) {
        assert_eq!(detect_diagram(body), expected);
    }
}
