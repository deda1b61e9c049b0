//! Reverse lookup from changed packages to the binaries that need a rebuild

use crate::resolve::Binary;
use serde::Serialize;
use std::path::PathBuf;

/// A binary pulled in by at least one changed package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AffectedBinary {
    pub name: String,
    pub entry_file: PathBuf,
    /// Dependencies of the binary that matched a changed package
    pub matched: Vec<String>,
}

/// A changed-package pattern: an exact import path, or `path/...` for the
/// package and everything below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePattern {
    base: String,
    recursive: bool,
}

impl PackagePattern {
    pub fn parse(pattern: &str) -> Self {
        let pattern = pattern.trim().trim_end_matches('/');
        match pattern.strip_suffix("/...") {
            Some(base) => Self {
                base: base.to_string(),
                recursive: true,
            },
            None => Self {
                base: pattern.to_string(),
                recursive: false,
            },
        }
    }

    pub fn matches(&self, import: &str) -> bool {
        if import == self.base {
            return true;
        }
        self.recursive
            && import
                .strip_prefix(self.base.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// Binaries depending on any of `patterns`, in input order
pub fn affected_by(binaries: &[Binary], patterns: &[PackagePattern]) -> Vec<AffectedBinary> {
    binaries
        .iter()
        .filter_map(|binary| {
            let matched: Vec<String> = binary
                .dependencies
                .iter()
                .filter(|dep| patterns.iter().any(|p| p.matches(&dep.import)))
                .map(|dep| dep.import.clone())
                .collect();

            (!matched.is_empty()).then(|| AffectedBinary {
                name: binary.name.clone(),
                entry_file: binary.entry_file.clone(),
                matched,
            })
        })
        .collect()
}
