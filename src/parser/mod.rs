use crate::errors::ParseError;
use crate::graph::ContainmentGraph;
use regex::Regex;
use std::path::Path;

/// One parsed rule line: `container` holds each `(item, count)` of `contents`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDeclaration {
    pub container: String,
    pub contents: Vec<(String, u64)>,
}

#[derive(Debug, Default)]
pub struct RuleParser {
    patterns: RegexPatterns,
}

#[derive(Debug)]
pub struct RegexPatterns {
    pub declaration: Regex,
    pub item: Regex,
}

impl RegexPatterns {
    #[must_use]
    pub fn compile() -> Self {
        // Split once on the first " contain "; the container keeps its own wording
        let declaration =
            Regex::new(r"^(?P<container>.+?) contain (?P<contents>.+)$").expect("declaration regex");
        let item = Regex::new(r"^(?P<count>[0-9]+|no) (?P<description>.+)$").expect("item regex");
        Self { declaration, item }
    }
}

impl Default for RegexPatterns {
    fn default() -> Self {
        Self::compile()
    }
}

const EMPTY_CONTENTS: &str = "no other bags";

impl RuleParser {
    #[must_use]
    pub fn new() -> Self {
        Self { patterns: RegexPatterns::compile() }
    }

    /// Parse a single declaration such as
    /// `light red bags contain 1 bright white bag, 2 muted yellow bags.`
    ///
    /// `line` is only used for error reporting.
    ///
    /// # Errors
    /// Returns `ParseError::Malformed` when the text has no ` contain ` clause,
    /// an item lacks a description, or a count is not a number or `no`.
    pub fn parse_declaration(
        &self,
        text: &str,
        line: usize,
    ) -> Result<RuleDeclaration, ParseError> {
        let text = text.trim().replace('.', "");
        let Some(cap) = self.patterns.declaration.captures(&text) else {
            return Err(malformed(line, "expected '<container> contain <contents>'"));
        };
        let container = cap["container"].to_string();
        let contents = &cap["contents"];
        if contents == EMPTY_CONTENTS {
            return Ok(RuleDeclaration { container, contents: Vec::new() });
        }

        let mut out = Vec::new();
        for item in contents.split(", ") {
            let Some(icap) = self.patterns.item.captures(item) else {
                return Err(malformed(line, &format!("cannot read item '{item}'")));
            };
            let count = match &icap["count"] {
                "no" => 0,
                n => n.parse::<u64>().map_err(|e| malformed(line, &format!("count '{n}': {e}")))?,
            };
            out.push((normalize_description(&icap["description"]), count));
        }
        Ok(RuleDeclaration { container, contents: out })
    }

    /// Parse a whole rule file into a graph. Blank lines are skipped.
    ///
    /// # Errors
    /// Returns the first `ParseError` encountered, with its 1-based line number.
    pub fn parse_rules(&self, content: &str) -> Result<ContainmentGraph<String>, ParseError> {
        let mut graph = ContainmentGraph::new();
        for (i, raw) in content.lines().enumerate() {
            if raw.trim().is_empty() {
                continue;
            }
            let decl = self.parse_declaration(raw, i + 1)?;
            graph.add_rule(decl.container, decl.contents);
        }
        Ok(graph)
    }

    /// Read and parse a rule file from disk.
    ///
    /// # Errors
    /// Returns `ParseError::Io` if the file cannot be read, otherwise as `parse_rules`.
    pub fn load_rules(&self, path: &Path) -> Result<ContainmentGraph<String>, ParseError> {
        let content = std::fs::read_to_string(path)?;
        let graph = self.parse_rules(&content)?;
        tracing::info!(
            path = %path.display(),
            rules = graph.edge_count(),
            nodes = graph.node_count(),
            "loaded containment rules"
        );
        Ok(graph)
    }
}

// Singular and plural item names refer to the same node
fn normalize_description(description: &str) -> String {
    let mut d = description.to_string();
    if d.ends_with("bag") {
        d.push('s');
    }
    d
}

fn malformed(line: usize, reason: &str) -> ParseError {
    ParseError::Malformed { line, reason: reason.to_string() }
}
