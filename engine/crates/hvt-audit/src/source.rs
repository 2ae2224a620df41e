//! Running-configuration snapshot and the query capability auditors consume

use hvt_core::{Device, Error, Result};
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// One line of configuration with the block nested beneath it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedLine {
    /// 1-based line number in the source text
    pub line_number: usize,
    /// Raw text, leading indentation preserved
    pub text: String,
    /// Number of leading whitespace characters
    pub indent: usize,
    pub children: Vec<ParsedLine>,
}

impl ParsedLine {
    fn new(line_number: usize, text: &str) -> Self {
        let indent = text.len() - text.trim_start().len();
        Self {
            line_number,
            text: text.to_string(),
            indent,
            children: Vec::new(),
        }
    }

    /// Text without indentation
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }
}

/// Query capability over a device configuration.
///
/// Patterns are matched against the raw line text, so child patterns
/// must allow for indentation (`^\s+...`).
pub trait ConfigSource {
    /// All top-level lines matching `pattern`, in configuration order
    fn find_lines(&self, pattern: &Regex) -> Vec<&ParsedLine>;

    /// Direct children matching `child` of every top-level line matching `parent`
    fn find_child_lines(&self, parent: &Regex, child: &Regex) -> Vec<&ParsedLine>;

    /// Capture group 1 of the first matching top-level line (the whole match
    /// when the pattern has no groups), or `default` when nothing matches.
    ///
    /// Only top-level lines are searched: a pattern aimed at a nested line
    /// such as `^\s+transport input (\S+)` always yields `default`. Use
    /// `find_child_lines` for values inside a block.
    fn find_first_typed(&self, pattern: &Regex, default: &str) -> String {
        self.find_lines(pattern)
            .iter()
            .find_map(|line| first_capture(pattern, &line.text))
            .unwrap_or_else(|| default.to_string())
    }

    /// Number of top-level lines matching `pattern`
    fn count_matches(&self, pattern: &Regex) -> usize {
        self.find_lines(pattern).len()
    }
}

fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    let caps = pattern.captures(text)?;
    let value = if pattern.captures_len() > 1 {
        caps.get(1).map(|m| m.as_str()).unwrap_or_default()
    } else {
        caps.get(0).map(|m| m.as_str()).unwrap_or_default()
    };
    Some(value.to_string())
}

/// Immutable, indentation-nested view of a running configuration
#[derive(Debug, Clone, Default)]
pub struct ParsedConfig {
    lines: Vec<ParsedLine>,
}

impl ParsedConfig {
    /// Parse configuration text. Blank lines and `!` comments are dropped;
    /// a line indented deeper than the previous one nests beneath it. The
    /// body of a multi-line `banner` is nested under the banner line so it
    /// never matches top-level queries.
    pub fn parse(text: &str) -> Self {
        let mut roots: Vec<ParsedLine> = Vec::new();
        let mut stack: Vec<ParsedLine> = Vec::new();
        let mut raw = text.lines().enumerate();

        while let Some((idx, line)) = raw.next() {
            let line = line.trim_end();
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('!') {
                continue;
            }

            let mut node = ParsedLine::new(idx + 1, line);
            while stack.last().is_some_and(|open| open.indent >= node.indent) {
                close_block(&mut stack, &mut roots);
            }

            if node.indent == 0 {
                if let Some(delim) = banner_delimiter(trimmed) {
                    for (body_idx, body) in raw.by_ref() {
                        node.children.push(ParsedLine::new(body_idx + 1, body.trim_end()));
                        if body.contains(delim.as_str()) {
                            break;
                        }
                    }
                }
            }

            stack.push(node);
        }
        while !stack.is_empty() {
            close_block(&mut stack, &mut roots);
        }

        debug!("Parsed {} top-level configuration lines", roots.len());
        Self { lines: roots }
    }

    /// Load a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::FileNotFound {
                path: path.display().to_string(),
            },
            _ => Error::Io(e),
        })?;
        Ok(Self::parse(&content))
    }

    /// Load `<repo_dir>/<hostname><suffix>` for an inventory device
    pub fn load(repo_dir: impl AsRef<Path>, device: &Device, suffix: &str) -> Result<Self> {
        Self::from_file(device.running_config_path(repo_dir, suffix))
    }

    /// Top-level lines
    pub fn lines(&self) -> &[ParsedLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Value of the `hostname` statement, if present
    pub fn hostname(&self) -> Option<&str> {
        self.lines
            .iter()
            .find_map(|line| line.trimmed().strip_prefix("hostname "))
            .map(str::trim)
    }
}

impl ConfigSource for ParsedConfig {
    fn find_lines(&self, pattern: &Regex) -> Vec<&ParsedLine> {
        self.lines
            .iter()
            .filter(|line| pattern.is_match(&line.text))
            .collect()
    }

    fn find_child_lines(&self, parent: &Regex, child: &Regex) -> Vec<&ParsedLine> {
        self.find_lines(parent)
            .into_iter()
            .flat_map(|line| line.children.iter())
            .filter(|c| child.is_match(&c.text))
            .collect()
    }
}

fn close_block(stack: &mut Vec<ParsedLine>, roots: &mut Vec<ParsedLine>) {
    if let Some(node) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }
}

/// Delimiter of a banner whose text continues on following lines
fn banner_delimiter(line: &str) -> Option<String> {
    let mut parts = line.splitn(3, char::is_whitespace);
    if parts.next() != Some("banner") {
        return None;
    }
    let rest = parts.nth(1)?.trim_start();
    let delim = if rest.starts_with("^C") {
        "^C".to_string()
    } else {
        rest.chars().next()?.to_string()
    };
    let after = &rest[delim.len()..];
    if after.contains(delim.as_str()) {
        None
    } else {
        Some(delim)
    }
}
