//! Cross-process determinism for the canonical planning batch.
//!
//! Spawns the `plan_fixture` binary under several environment variants
//! and asserts that all produce identical output, matching the batch
//! planned in this process.

use std::io::Write;
use std::process::Command;

use lock_tests::canonical_batch::{render, run_canonical_batch};

fn run_variant(work_dir: &std::path::Path, env_overrides: &[(&str, &str)]) -> String {
    run_with_args(work_dir, env_overrides, &[])
}

fn plan_fixture(
    work_dir: &std::path::Path,
    env_overrides: &[(&str, &str)],
    args: &[&std::ffi::OsStr],
) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_plan_fixture");

    let mut command = Command::new(bin);
    command.current_dir(work_dir).args(args);

    command
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("LANGUAGE")
        .env_remove("RUST_LOG");

    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    command.output().unwrap_or_else(|e| {
        panic!("failed to spawn {bin} (overrides={env_overrides:?}): {e}")
    })
}

fn run_with_args(
    work_dir: &std::path::Path,
    env_overrides: &[(&str, &str)],
    args: &[&std::ffi::OsStr],
) -> String {
    let output = plan_fixture(work_dir, env_overrides, args);
    assert!(
        output.status.success(),
        "plan_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

#[test]
fn crossproc_determinism_across_env_variants() {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let baseline = run_variant(root, &[]);

    assert!(baseline.contains("batch_digest=sha256:"), "baseline:\n{baseline}");
    assert!(baseline.contains("outcome=succeeded"));
    assert!(baseline.contains("outcome=unreachable"));

    let scratch = tempfile::tempdir().expect("tempdir");
    let variants: [(&std::path::Path, &[(&str, &str)]); 3] = [
        (root, &[("LC_ALL", "C")]),
        (root, &[("LANG", "tr_TR.UTF-8"), ("RUST_LOG", "trace")]),
        (scratch.path(), &[("RUST_LOG", "debug"), ("TZ", "Pacific/Kiritimati")]),
    ];
    for (dir, overrides) in variants {
        let output = run_variant(dir, overrides);
        assert_eq!(output, baseline, "divergence under {overrides:?}");
    }
}

#[test]
fn crossproc_matches_in_process_batch() {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let child = run_variant(root, &[]);
    let local = render(&run_canonical_batch());
    assert_eq!(child, local);
}

#[test]
fn config_file_worker_count_does_not_change_output() {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let baseline = run_variant(root, &[]);

    for workers in [1, 5] {
        let mut file = tempfile::NamedTempFile::new().expect("config file");
        write!(
            file,
            r#"{{"workers": {workers}, "logging": {{"level": "debug", "ansi": false}}}}"#
        )
        .expect("write config");
        let output = run_with_args(root, &[], &[file.path().as_os_str()]);
        assert_eq!(output, baseline, "workers={workers}");
    }
}

#[test]
fn config_file_policy_reaches_the_search() {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut file = tempfile::NamedTempFile::new().expect("config file");
    write!(file, r#"{{"workers": 1, "policy": {{"max_expansions": 1}}}}"#).expect("write config");
    let output = run_with_args(root, &[("RUST_LOG", "error")], &[file.path().as_os_str()]);
    assert!(output.contains("outcome=timeout"), "output:\n{output}");
    assert_ne!(output, run_variant(root, &[]));
}

#[test]
fn invalid_config_file_exits_with_an_error() {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut file = tempfile::NamedTempFile::new().expect("config file");
    write!(file, r#"{{"workers": 0}}"#).expect("write config");
    let output = plan_fixture(root, &[], &[file.path().as_os_str()]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("workers must be at least 1"));
}
