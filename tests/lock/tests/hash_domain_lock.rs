//! Hash domain governance lock tests.
//!
//! Proves:
//! 1. Canonical domain set has expected count (catches forgotten additions to ALL)
//! 2. All domain byte strings are unique and null-terminated
//! 3. All domains follow the `VOXELPATH::*::V1\0` naming convention
//! 4. No raw `VOXELPATH::` domain literals in production source outside `hash_domain.rs`
//! 5. No `.unwrap()` or `.expect(` in production source

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use voxelpath_kernel::proof::hash_domain::HashDomain;

#[test]
fn hash_domain_canonical_set_count() {
    assert_eq!(
        HashDomain::ALL.len(),
        5,
        "expected 5 domain variants; if you added a new domain, update this count"
    );
}

#[test]
fn hash_domain_unique_and_null_terminated() {
    let mut seen = BTreeSet::new();
    for domain in HashDomain::ALL {
        assert!(seen.insert(domain.as_bytes()), "duplicate domain bytes: {domain}");
        assert!(domain.as_bytes().ends_with(&[0]), "{domain} is not null-terminated");
    }
}

#[test]
fn hash_domain_all_follow_naming_convention() {
    for domain in HashDomain::ALL {
        let bytes = domain.as_bytes();
        assert!(bytes.starts_with(b"VOXELPATH::"), "{domain} does not start with VOXELPATH::");
        assert!(bytes.ends_with(b"::V1\0"), "{domain} does not end with ::V1\\0");
    }
}

fn production_dirs() -> [PathBuf; 3] {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
    [
        root.join("kernel/src"),
        root.join("search/src"),
        root.join("harness/src"),
    ]
}

#[test]
fn no_raw_domain_literals_outside_authority() {
    let mut violations = Vec::new();
    for dir in production_dirs() {
        scan_dir(&dir, &["b\"VOXELPATH::"], Some("hash_domain.rs"), &mut violations);
    }
    assert!(
        violations.is_empty(),
        "raw VOXELPATH:: domain literals found outside hash_domain.rs:\n{}",
        violations.join("\n")
    );
}

#[test]
fn no_unwrap_or_expect_in_production_source() {
    let mut violations = Vec::new();
    for dir in production_dirs() {
        scan_dir(&dir, &[".unwrap()", ".expect("], None, &mut violations);
    }
    assert!(
        violations.is_empty(),
        "unwrap/expect found in production source:\n{}",
        violations.join("\n")
    );
}

/// Report non-test, non-comment lines containing any of `patterns`.
fn scan_dir(
    dir: &Path,
    patterns: &[&str],
    authority_file: Option<&str>,
    violations: &mut Vec<String>,
) {
    for path in walkdir(dir) {
        if path.extension().and_then(|e| e.to_str()) != Some("rs") {
            continue;
        }
        let file_name = path.file_name().and_then(|n| n.to_str());
        if authority_file.is_some() && file_name == authority_file {
            continue;
        }
        let Ok(content) = std::fs::read_to_string(&path) else {
            continue;
        };

        // Skip #[cfg(test)] module blocks via brace-depth tracking.
        let mut brace_depth: usize = 0;
        let mut skip_depth: Option<usize> = None;
        let mut cfg_test_pending = false;

        for (i, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            if trimmed.contains("#[cfg(test)]") {
                cfg_test_pending = true;
                continue;
            }

            let opens = line.chars().filter(|&c| c == '{').count();
            let closes = line.chars().filter(|&c| c == '}').count();

            if cfg_test_pending && opens > 0 {
                skip_depth = Some(brace_depth);
                cfg_test_pending = false;
            }

            brace_depth = brace_depth.saturating_add(opens);
            brace_depth = brace_depth.saturating_sub(closes);

            if let Some(depth) = skip_depth {
                if brace_depth <= depth {
                    skip_depth = None;
                }
                continue;
            }

            if trimmed.starts_with("//") {
                continue;
            }

            if patterns.iter().any(|p| trimmed.contains(p)) {
                violations.push(format!("  {}:{}: {}", path.display(), i + 1, trimmed));
            }
        }
    }
}

fn walkdir(dir: &Path) -> Vec<PathBuf> {
    let mut results = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                results.extend(walkdir(&path));
            } else {
                results.push(path);
            }
        }
    }
    results
}
