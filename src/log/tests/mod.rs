//! Tests for log parsing, queries and export

pub mod parser_tests;

use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

/// Write a log file into a temp directory, returning the dir and the path
pub fn write_log(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    (dir, path)
}
