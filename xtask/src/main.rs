//! Repository checks: `cargo run -p xtask`
//!
//! Validates `docs/compliance_matrix.csv`: every requirement row must name at
//! least one test, every referenced file must exist, and every referenced
//! test function must be defined in that file.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const MATRIX: &str = "docs/compliance_matrix.csv";
const COLUMNS: usize = 5;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

struct Row<'a> {
    line: usize,
    requirement: &'a str,
    test_refs: Vec<&'a str>,
}

fn run() -> Result<(), String> {
    let repo = repo_root()?;
    let matrix_path = repo.join(MATRIX);
    let content = fs::read_to_string(&matrix_path)
        .map_err(|e| format!("reading {} failed: {e}", matrix_path.display()))?;

    let rows = parse_rows(&content)?;
    let mut sources: HashMap<PathBuf, Option<String>> = HashMap::new();
    let mut problems: Vec<String> = Vec::new();

    for row in &rows {
        if row.test_refs.is_empty() {
            problems.push(format!(
                "{} (line {}): no tests referenced",
                row.requirement, row.line
            ));
            continue;
        }

        for reference in &row.test_refs {
            let (file, test) = match reference.split_once("::") {
                Some((file, test)) => (file.trim(), Some(test.trim())),
                None => (reference.trim(), None),
            };
            let path = repo.join(file);
            let source = sources
                .entry(path.clone())
                .or_insert_with(|| fs::read_to_string(&path).ok());

            match (source.as_deref(), test) {
                (None, _) => problems.push(format!(
                    "{} (line {}): file not found: {}",
                    row.requirement,
                    row.line,
                    path.display()
                )),
                (Some(text), Some(test)) if !defines_fn(text, test) => problems.push(format!(
                    "{} (line {}): fn {} not found in {}",
                    row.requirement, row.line, test, file
                )),
                _ => {}
            }
        }
    }

    if problems.is_empty() {
        println!("Compliance matrix OK ({} requirements)", rows.len());
        return Ok(());
    }

    let mut message = String::from("Compliance matrix validation failed:\n");
    for problem in &problems {
        message.push_str("  - ");
        message.push_str(problem);
        message.push('\n');
    }
    Err(message)
}

fn parse_rows(content: &str) -> Result<Vec<Row<'_>>, String> {
    let mut rows = Vec::new();
    for (idx, line) in content.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let columns: Vec<&str> = line.split(',').map(str::trim).collect();
        if columns.len() != COLUMNS {
            return Err(format!(
                "line {}: expected {} columns, found {}",
                idx + 1,
                COLUMNS,
                columns.len()
            ));
        }
        if columns[0].is_empty() {
            return Err(format!("line {}: requirement_id empty", idx + 1));
        }

        rows.push(Row {
            line: idx + 1,
            requirement: columns[0],
            test_refs: columns[4]
                .split(';')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .collect(),
        });
    }
    Ok(rows)
}

fn defines_fn(source: &str, name: &str) -> bool {
    let needle = format!("fn {name}");
    source.match_indices(&needle).any(|(at, _)| {
        let rest = &source[at + needle.len()..];
        rest.starts_with('(') || rest.starts_with('<')
    })
}

fn repo_root() -> Result<PathBuf, String> {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir)
        .parent()
        .map(|p| p.to_path_buf())
        .ok_or_else(|| "xtask manifest directory has no parent".to_string())
}
