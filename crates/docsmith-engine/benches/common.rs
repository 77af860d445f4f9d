// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with some content.\n\n- Bullet point\n  continued\n- Another item\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n";
    base.repeat(size)
}

/// Plain markdown plus directives, roles and call-outs.
#[allow(dead_code)]
pub fn generate_directive_content(size: usize) -> String {
    let base = concat!(
        "# Install\n\n",
        ":::{note} Before you start\n",
        "Press {kbd}`ctrl+c` to stop. {icon}`warning` Check {applies_to}`stack: ga 9.1`.\n",
        ":::\n\n",
        "::::{applies-switch}\n",
        ":::{applies-item} stack: ga 9.1, preview 9.0\n",
        "```yaml\n",
        "host: localhost <1>\n",
        "port: 9200 <2>\n",
        "```\n",
        "1. The host\n",
        "2. The port\n",
        ":::\n",
        ":::{applies-item} serverless: ga\n",
        "Nothing to configure.\n",
        ":::\n",
        "::::\n\n",
        ":::{table} Sizes\n",
        ":widths: 30 70\n",
        "| Name | Value |\n",
        "|------|-------|\n",
        "| a | 1 |\n",
        ":::\n\n",
    );
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_nested_directives(depth: usize) -> String {
    let mut content = String::new();
    for level in 0..depth {
        let fence = ":".repeat(3 + depth - level);
        content.push_str(&format!("{fence}{{note}} Level {level}\nParagraph at level {level}.\n\n"));
    }
    for level in (0..depth).rev() {
        content.push_str(&":".repeat(3 + depth - level));
        content.push('\n');
    }
    content
}
