//! Listings of the test tree, for discovery by humans and tools.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::metadata::Test;
use crate::traverse::{visit, VisitStep};

/// Serializable snapshot of one unit and its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub name: String,
    pub kind: NodeKind,
    pub file: String,
    pub line: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtests: Vec<TreeNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Case,
    Suite,
}

impl TreeNode {
    /// Snapshot of `root` and everything below it.
    pub fn build(root: &Test) -> TreeNode {
        TreeNode {
            name: root.name().to_string(),
            kind: if root.is_suite() {
                NodeKind::Suite
            } else {
                NodeKind::Case
            },
            file: root.file().to_string(),
            line: root.line(),
            tags: root.tags().to_vec(),
            subtests: root.subtests().iter().map(TreeNode::build).collect(),
        }
    }
}

/// Writes one line per unit, indented by depth. Suites show their subtest
/// count, tagged units their tags.
pub fn write_tree<W: Write>(root: &Test, out: &mut W) -> Result<()> {
    let mut depth = 0usize;
    let mut result = Ok(());
    visit(root, |test, step| {
        if result.is_err() {
            return;
        }
        match step {
            VisitStep::Enter => {
                let mut line = format!("{:indent$}{}", "", test.name(), indent = depth * 2);
                if test.is_suite() {
                    line.push_str(&format!(" ({})", test.subtest_count()));
                }
                if !test.tags().is_empty() {
                    line.push_str(&format!(" [{}]", test.tags().join(", ")));
                }
                result = writeln!(out, "{}", line);
                depth += 1;
            }
            VisitStep::Leave => depth -= 1,
        }
    });
    Ok(result?)
}

/// Pretty-printed JSON of the whole tree.
pub fn to_json(root: &Test) -> Result<String> {
    Ok(serde_json::to_string_pretty(&TreeNode::build(root))?)
}
