use std::{fs, path::PathBuf};

use tempfile::{TempDir, tempdir};

use mmdbatch::BatchError;
use mmdbatch_cli::{Args, run};

/// Creates `<root>/mermaid` holding the given files and returns args pointing at it.
fn site_args(files: &[&str]) -> (TempDir, Args) {
    let root = tempdir().expect("Failed to create temp directory");
    let mermaid = root.path().join("mermaid");
    fs::create_dir(&mermaid).unwrap();
    for file in files {
        fs::write(mermaid.join(file), "sequenceDiagram\n    A->>B: hello\n").unwrap();
    }

    // An explicit empty config keeps the user's own config files out of the test
    let config = root.path().join("mmdbatch.toml");
    fs::write(&config, "").unwrap();

    let args = Args {
        source_dir: Some(mermaid.to_string_lossy().to_string()),
        output_dir: Some(root.path().join("assets").to_string_lossy().to_string()),
        config: Some(config.to_string_lossy().to_string()),
        log_level: "off".to_string(),
        ..Default::default()
    };

    (root, args)
}

fn assets(root: &TempDir) -> PathBuf {
    root.path().join("assets")
}

#[test]
fn e2e_dry_run_starts_nothing() {
    let (root, args) = site_args(&["flow.mmd", "sequence.mmd"]);
    let args = Args {
        renderer: Some("mmdbatch-missing-renderer".to_string()),
        dry_run: true,
        strict: true,
        ..args
    };

    run(&args).expect("Dry run should not start the renderer");

    assert!(!assets(&root).exists());
}

#[test]
fn e2e_missing_renderer_is_not_fatal_by_default() {
    let (_root, args) = site_args(&["flow.mmd", "sequence.mmd"]);
    let args = Args {
        renderer: Some("mmdbatch-missing-renderer".to_string()),
        ..args
    };

    run(&args).expect("Per-file failures should only be logged");
}

#[test]
fn e2e_strict_reports_every_failure() {
    let (_root, args) = site_args(&["flow.mmd", "sequence.mmd", "notes.txt"]);
    let args = Args {
        renderer: Some("mmdbatch-missing-renderer".to_string()),
        strict: true,
        ..args
    };

    match run(&args) {
        Err(BatchError::Incomplete { failures, total }) => {
            assert_eq!(total, 2);
            assert_eq!(failures.len(), 2);
            assert!(failures.iter().all(|f| f.error.is_not_found()));
        }
        other => panic!("Expected Incomplete, got {other:?}"),
    }
}

#[test]
fn e2e_empty_source_succeeds_in_strict_mode() {
    let (root, args) = site_args(&[]);
    let args = Args {
        renderer: Some("mmdbatch-missing-renderer".to_string()),
        strict: true,
        ..args
    };

    run(&args).expect("Nothing to convert is not an error");

    assert!(!assets(&root).exists());
}

#[test]
fn e2e_invalid_background_is_config_error() {
    let (_root, args) = site_args(&["flow.mmd"]);
    let args = Args {
        background: Some("not-a-color".to_string()),
        ..args
    };

    assert!(matches!(run(&args), Err(BatchError::Config(_))));
}

#[test]
fn e2e_missing_config_file_is_error() {
    let (root, args) = site_args(&["flow.mmd"]);
    let args = Args {
        config: Some(root.path().join("absent.toml").to_string_lossy().to_string()),
        ..args
    };

    assert!(matches!(run(&args), Err(BatchError::Config(_))));
}

/// Uses a shell script as the renderer: it copies the `-i` file to the `-o` path.
#[cfg(unix)]
#[test]
fn e2e_external_renderer_writes_outputs() {
    use std::os::unix::fs::PermissionsExt;

    let (root, args) = site_args(&["flow.mmd", "sequence.mmd"]);

    let script = root.path().join("fake-mmdc.sh");
    fs::write(
        &script,
        "#!/bin/sh\nwhile [ $# -gt 0 ]; do\n  case \"$1\" in\n    -i) src=\"$2\"; shift 2;;\n    -o) dst=\"$2\"; shift 2;;\n    *) shift;;\n  esac\ndone\ncp \"$src\" \"$dst\"\n",
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let args = Args {
        renderer: Some(script.to_string_lossy().to_string()),
        jobs: Some(1),
        strict: true,
        ..args
    };

    run(&args).expect("Fake renderer should succeed");

    let out = assets(&root);
    for name in ["flow.svg", "sequence.svg"] {
        let rendered = fs::read_to_string(out.join(name)).unwrap();
        assert!(rendered.starts_with("sequenceDiagram"), "{name} not written");
    }
}

#[cfg(unix)]
#[test]
fn e2e_failing_renderer_in_strict_mode() {
    let (_root, args) = site_args(&["flow.mmd"]);
    let args = Args {
        renderer: Some("false".to_string()),
        strict: true,
        ..args
    };

    match run(&args) {
        Err(BatchError::Incomplete { failures, total }) => {
            assert_eq!(total, 1);
            assert!(!failures[0].error.is_not_found());
        }
        other => panic!("Expected Incomplete, got {other:?}"),
    }
}
