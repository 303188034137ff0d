//! Shared helpers for tests that need fake external tools.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Writes an executable `/bin/sh` script named `name` into `dir`.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Counts lines of `content` equal to `marker` after trimming.
pub fn count_lines(content: &str, marker: &str) -> usize {
    content.lines().filter(|line| line.trim() == marker).count()
}
