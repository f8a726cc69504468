mod common;

use std::{fs, path::Path};

use backfill::{
  errors::BackfillError,
  git::{GitRepository, VersionControl},
};
use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use crate::common::{commit_count, create_repo, git, init_repo};

#[test]
fn fresh_repository_is_clean() {
  let repo = create_repo();
  let vcs = GitRepository::discover(repo.path()).expect("discover");
  assert!(vcs.is_clean().expect("status"));
}

#[test]
fn untracked_and_modified_files_make_the_tree_dirty() {
  let repo = create_repo();
  let vcs = GitRepository::discover(repo.path()).expect("discover");

  fs::write(repo.path().join("notes.txt"), "draft\n").expect("write untracked");
  assert!(!vcs.is_clean().expect("status"));

  fs::remove_file(repo.path().join("notes.txt")).expect("remove untracked");
  fs::write(repo.path().join("README.md"), "# changed\n").expect("modify tracked");
  assert!(!vcs.is_clean().expect("status"));
}

#[test]
fn ignored_files_do_not_make_the_tree_dirty() {
  let repo = create_repo();
  fs::write(repo.path().join(".gitignore"), "target/\n").expect("write .gitignore");
  git(repo.path(), &["add", ".gitignore"]);
  git(repo.path(), &["commit", "-q", "-m", "chore: ignore target"]);
  fs::create_dir_all(repo.path().join("target")).expect("create target");
  fs::write(repo.path().join("target/out"), "binary\n").expect("write ignored");

  let vcs = GitRepository::discover(repo.path()).expect("discover");
  assert!(vcs.is_clean().expect("status"));
}

#[test]
fn commit_forces_author_and_committer_dates() {
  let repo = create_repo();
  let mut vcs = GitRepository::discover(repo.path()).expect("discover");
  let date = Utc
    .with_ymd_and_hms(2024, 10, 15, 14, 5, 33)
    .single()
    .expect("valid timestamp");

  fs::write(repo.path().join("commit.md"), "entry\n").expect("write log");
  vcs.stage(Path::new("commit.md")).expect("stage");
  let oid = vcs.commit("auto commit 2024-10-15 #1", date, date).expect("commit");

  assert_eq!(git(repo.path(), &["rev-parse", "HEAD"]).trim(), oid);
  assert_eq!(commit_count(repo.path()), 2);
  assert_eq!(
    git(repo.path(), &["log", "-1", "--format=%at %ct %s"]).trim(),
    format!("{0} {0} auto commit 2024-10-15 #1", date.timestamp())
  );
  assert_eq!(
    git(repo.path(), &["log", "-1", "--format=%an <%ae>"]).trim(),
    "Tests <tests@example.com>"
  );
  assert!(vcs.is_clean().expect("status"));
}

#[test]
fn commit_works_on_an_unborn_branch() {
  let repo = init_repo();
  let mut vcs = GitRepository::discover(repo.path()).expect("discover");
  let date = Utc
    .with_ymd_and_hms(2024, 1, 2, 9, 0, 0)
    .single()
    .expect("valid timestamp");

  fs::write(repo.path().join("commit.md"), "entry\n").expect("write log");
  vcs.stage(Path::new("commit.md")).expect("stage");
  vcs.commit("auto commit 2024-01-02 #1", date, date).expect("commit");

  assert_eq!(commit_count(repo.path()), 1);
}

#[test]
fn workdir_points_at_the_repository_root() {
  let repo = create_repo();
  fs::create_dir_all(repo.path().join("nested/dir")).expect("create nested");

  let vcs = GitRepository::discover(&repo.path().join("nested/dir")).expect("discover from nested");
  let workdir = vcs.workdir().expect("workdir");

  assert_eq!(
    workdir.canonicalize().expect("canonical workdir"),
    repo.path().canonicalize().expect("canonical repo")
  );
}

#[test]
fn staging_a_missing_file_is_an_external_tool_error() {
  let repo = create_repo();
  let mut vcs = GitRepository::discover(repo.path()).expect("discover");

  let error = vcs.stage(Path::new("missing.md")).expect_err("should fail");
  assert!(matches!(
    error.downcast_ref::<BackfillError>(),
    Some(BackfillError::ExternalTool(_))
  ));
}

#[test]
fn discovery_outside_a_repository_fails() {
  let temp = TempDir::new().expect("temp dir");
  let result = GitRepository::discover(temp.path());
  assert!(result.is_err());
}
