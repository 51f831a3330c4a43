//! `vendorsync update` exit codes, stdout contract, and on-disk effects.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

const MANIFEST: &str = r#"{
	"ImportPath": "example.com/app",
	"GoVersion": "go1.4",
	"Packages": [],
	"Deps": [
		{"ImportPath": "other/dep", "Rev": "111", "Comment": "pinned"},
		{"ImportPath": "p1", "Rev": "aaa", "Comment": ""}
	]
}"#;

struct Fixture {
    project: TempDir,
    gopath: TempDir,
    tools: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fx = Self {
            project: TempDir::new().expect("project"),
            gopath: TempDir::new().expect("gopath"),
            tools: TempDir::new().expect("tools"),
        };
        fs::create_dir_all(fx.project.path().join("Godeps")).expect("mkdir Godeps");
        fs::write(fx.manifest_path(), MANIFEST).expect("write manifest");
        let vendored = fx.vendor_dir("p1");
        fs::create_dir_all(&vendored).expect("mkdir vendor");
        fs::write(vendored.join("old.go"), "package p1 // aaa").expect("write vendor");
        fx
    }

    fn manifest_path(&self) -> PathBuf {
        self.project.path().join("Godeps").join("Godeps.json")
    }

    fn vendor_dir(&self, pkg: &str) -> PathBuf {
        self.project
            .path()
            .join("Godeps")
            .join("_workspace")
            .join("src")
            .join(pkg)
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("vendorsync"));
        cmd.current_dir(self.project.path())
            .env("GOPATH", self.gopath.path())
            .env("VENDORSYNC_GO", self.tools.path().join("no-such-go"))
            .env("VENDORSYNC_GIT", self.tools.path().join("no-such-git"))
            .env_remove("RUST_LOG");
        cmd
    }

    /// Fake `go` that leaves `files` under `$GOPATH/src/<pkg>`, and a fake
    /// `git` that reports the package directory as its repository at `revision`.
    #[cfg(unix)]
    fn with_fake_tools(&self, pkg: &str, files: &[(&str, &str)], revision: &str) -> Command {
        let staged = self.gopath.path().join("src").join(pkg);
        fs::create_dir_all(&staged).expect("mkdir staged");
        for (name, content) in files {
            fs::write(staged.join(name), content).expect("write staged");
        }
        let go = script(self.tools.path(), "go", "exit 0");
        let git = script(self.tools.path(), "git", &format!("pwd; echo {revision}"));

        let mut cmd = self.cmd();
        cmd.env("VENDORSYNC_GO", go).env("VENDORSYNC_GIT", git);
        cmd
    }
}

#[cfg(unix)]
fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
    path
}

fn deps(path: &Path) -> Vec<serde_json::Value> {
    let raw = fs::read_to_string(path).expect("read manifest");
    let doc: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    doc["Deps"].as_array().expect("Deps array").clone()
}

// ---------------------------------------------------------------------------
// Usage errors (exit 2)
// ---------------------------------------------------------------------------

#[test]
fn no_arguments_is_usage_error() {
    let fx = Fixture::new();
    fx.cmd().assert().code(2);
}

#[test]
fn update_without_import_path_is_usage_error() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("update")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn too_many_arguments_is_usage_error() {
    let fx = Fixture::new();
    fx.cmd().args(["update", "p1", "p2"]).assert().code(2);
}

#[test]
fn malformed_import_paths_are_usage_errors() {
    let fx = Fixture::new();
    for bad in ["", "/abs", "a/../b", "a//b"] {
        fx.cmd().args(["update", bad]).assert().code(2);
    }
    assert_eq!(fs::read_to_string(fx.manifest_path()).unwrap(), MANIFEST);
}

// ---------------------------------------------------------------------------
// Fatal errors (exit 1, `Error:` on stdout, manifest untouched)
// ---------------------------------------------------------------------------

#[test]
fn missing_manifest_is_fatal() {
    let fx = Fixture::new();
    fs::remove_file(fx.manifest_path()).expect("rm manifest");
    fx.cmd()
        .args(["update", "p1"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("Error:"))
        .stdout(predicate::str::contains("no manifest found"));
}

#[test]
fn malformed_manifest_is_fatal() {
    let fx = Fixture::new();
    fs::write(fx.manifest_path(), "{\"Deps\": 42}").expect("corrupt");
    fx.cmd()
        .args(["update", "p1"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("Error:"))
        .stdout(predicate::str::contains("failed to parse manifest"));
    assert_eq!(fs::read_to_string(fx.manifest_path()).unwrap(), "{\"Deps\": 42}");
}

#[test]
fn failed_fetch_leaves_manifest_and_vendor_tree() {
    let fx = Fixture::new();
    let output = fx.cmd().args(["update", "p1"]).output().expect("run");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Error:"), "stdout: {stdout}");
    assert!(stdout.contains("fetch failed for p1"), "stdout: {stdout}");
    assert_eq!(stdout.trim_end().lines().count(), 1, "single-line diagnostic");
    assert_eq!(fs::read_to_string(fx.manifest_path()).unwrap(), MANIFEST);
    assert!(fx.vendor_dir("p1").join("old.go").exists());
}

#[test]
fn unset_gopath_is_fatal() {
    let fx = Fixture::new();
    fx.cmd()
        .env_remove("GOPATH")
        .args(["update", "p1"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("GOPATH"));
    assert_eq!(fs::read_to_string(fx.manifest_path()).unwrap(), MANIFEST);
}

#[cfg(unix)]
#[test]
fn unresolvable_revision_is_fatal() {
    let fx = Fixture::new();
    let mut cmd = fx.with_fake_tools("p1", &[("new.go", "package p1")], "unused");
    let git = script(
        fx.tools.path(),
        "git-broken",
        "echo 'fatal: not a git repository' >&2; exit 128",
    );
    cmd.env("VENDORSYNC_GIT", git)
        .args(["update", "p1"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("cannot determine revision"));
    assert_eq!(fs::read_to_string(fx.manifest_path()).unwrap(), MANIFEST);
    assert!(fx.vendor_dir("p1").join("old.go").exists());
}

#[cfg(unix)]
#[test]
fn enclosing_repository_revision_is_not_pinned() {
    let fx = Fixture::new();
    let mut cmd = fx.with_fake_tools("p1", &[("new.go", "package p1")], "unused");
    let git = script(
        fx.tools.path(),
        "git-outer",
        &format!("echo {}; echo 52b2ae4c", fx.gopath.path().display()),
    );
    cmd.env("VENDORSYNC_GIT", git)
        .args(["update", "p1"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("cannot determine revision"));
    assert_eq!(fs::read_to_string(fx.manifest_path()).unwrap(), MANIFEST);
    assert!(fx.vendor_dir("p1").join("old.go").exists());
}

// ---------------------------------------------------------------------------
// Success (exit 0)
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn new_revision_is_vendored_and_pinned() {
    let fx = Fixture::new();
    fx.with_fake_tools("p1", &[("new.go", "package p1 // bbb")], "bbb")
        .args(["update", "p1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("updated p1"));

    let deps = deps(&fx.manifest_path());
    assert_eq!(deps.len(), 2);
    assert_eq!(
        deps[0],
        serde_json::json!({"ImportPath": "other/dep", "Rev": "111", "Comment": "pinned"})
    );
    assert_eq!(
        deps[1],
        serde_json::json!({"ImportPath": "p1", "Rev": "bbb", "Comment": ""})
    );

    let vendored = fx.vendor_dir("p1");
    assert!(vendored.join("new.go").exists());
    assert!(!vendored.join("old.go").exists(), "old revision's files must be gone");
}

#[cfg(unix)]
#[test]
fn same_revision_is_a_noop() {
    let fx = Fixture::new();
    fx.with_fake_tools("p1", &[("new.go", "package p1")], "aaa")
        .args(["update", "p1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No need to update p1"));

    assert_eq!(fs::read_to_string(fx.manifest_path()).unwrap(), MANIFEST);
    assert!(fx.vendor_dir("p1").join("old.go").exists());
    assert!(!fx.vendor_dir("p1").join("new.go").exists());
}

#[cfg(unix)]
#[test]
fn first_time_dependency_is_appended() {
    let fx = Fixture::new();
    fx.with_fake_tools("github.com/acme/lib", &[("lib.go", "package lib")], "ccc")
        .args(["update", "github.com/acme/lib"])
        .assert()
        .success()
        .stdout(predicate::str::contains("updated github.com/acme/lib"));

    let deps = deps(&fx.manifest_path());
    assert_eq!(deps.len(), 3);
    assert_eq!(deps[2]["ImportPath"], "github.com/acme/lib");
    assert_eq!(deps[2]["Rev"], "ccc");
    assert!(fx.vendor_dir("github.com/acme/lib").join("lib.go").exists());
}

#[cfg(unix)]
#[test]
fn dry_run_shows_diff_and_writes_nothing() {
    let fx = Fixture::new();
    fx.with_fake_tools("p1", &[("new.go", "package p1")], "bbb")
        .args(["update", "p1", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[dry-run] would update p1 aaa → bbb"))
        .stdout(predicate::str::contains("+++ b/Godeps/Godeps.json"));

    assert_eq!(fs::read_to_string(fx.manifest_path()).unwrap(), MANIFEST);
    assert!(fx.vendor_dir("p1").join("old.go").exists());
}

#[cfg(unix)]
#[test]
fn keep_comment_carries_annotation() {
    let fx = Fixture::new();
    fx.with_fake_tools("other/dep", &[("dep.go", "package dep")], "222")
        .args(["update", "other/dep", "--keep-comment"])
        .assert()
        .success();

    let deps = deps(&fx.manifest_path());
    assert_eq!(
        deps[1],
        serde_json::json!({"ImportPath": "other/dep", "Rev": "222", "Comment": "pinned"})
    );
}
