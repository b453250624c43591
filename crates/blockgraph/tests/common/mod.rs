//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use blockgraph::domain::{DependencyType, Issue};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Path of the compiled blockgraph binary
pub fn blockgraph_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_blockgraph"))
}

/// Run the blockgraph binary in `dir` with colors disabled
pub fn run_blockgraph_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(blockgraph_binary())
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env("BLOCKGRAPH_ASCII", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute blockgraph binary")
}

/// Write issues as JSON Lines to `dir/issues.jsonl`
pub fn write_issues(dir: &Path, issues: &[Issue]) -> PathBuf {
    let lines: Vec<String> = issues
        .iter()
        .map(|issue| serde_json::to_string(issue).expect("Failed to serialize issue"))
        .collect();
    write_raw_issues(dir, &lines.join("\n"))
}

/// Write raw text to `dir/issues.jsonl`
pub fn write_raw_issues(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("issues.jsonl");
    std::fs::write(&path, content).expect("Failed to write issues file");
    path
}

/// Issues forming the chain `a` blocks `b` blocks `c`
pub fn linear_chain() -> Vec<Issue> {
    vec![
        Issue::new("a", "First"),
        Issue::new("b", "Second").depends_on("a", DependencyType::Blocks),
        Issue::new("c", "Third").depends_on("b", DependencyType::Blocks),
    ]
}

/// Issues forming the diamond `d` blocks `e` and `f`, both of which block `g`
pub fn diamond() -> Vec<Issue> {
    vec![
        Issue::new("d", "Top"),
        Issue::new("e", "Left").depends_on("d", DependencyType::Blocks),
        Issue::new("f", "Right").depends_on("d", DependencyType::Blocks),
        Issue::new("g", "Bottom")
            .depends_on("e", DependencyType::Blocks)
            .depends_on("f", DependencyType::Blocks),
    ]
}

/// Issues forming the ring `h` blocks `i` blocks `j` blocks `h`
pub fn ring() -> Vec<Issue> {
    vec![
        Issue::new("h", "H").depends_on("j", DependencyType::Blocks),
        Issue::new("i", "I").depends_on("h", DependencyType::Blocks),
        Issue::new("j", "J").depends_on("i", DependencyType::Blocks),
    ]
}
