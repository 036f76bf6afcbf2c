//! Changed-file detection between two revisions via `git2`.

use std::path::{Path, PathBuf};

use git2::{Diff, DiffFormat, Repository, Tree};

use callscope_core::errors::ImpactError;
use callscope_core::types::collections::BTreeSet;

fn git_error(err: git2::Error) -> ImpactError {
    ImpactError::Git {
        message: err.message().to_string(),
    }
}

fn open(repo_path: &Path) -> Result<Repository, ImpactError> {
    Repository::open(repo_path).map_err(git_error)
}

fn tree_for<'r>(repo: &'r Repository, rev: &str) -> Result<Tree<'r>, ImpactError> {
    repo.revparse_single(rev)
        .and_then(|object| object.peel_to_tree())
        .map_err(git_error)
}

fn diff_between<'r>(
    repo: &'r Repository,
    base: &str,
    target: &str,
) -> Result<Diff<'r>, ImpactError> {
    let base_tree = tree_for(repo, base)?;
    let target_tree = tree_for(repo, target)?;
    repo.diff_tree_to_tree(Some(&base_tree), Some(&target_tree), None)
        .map_err(git_error)
}

/// Files touched between `base` and `target` whose extension is in
/// `extensions`, joined to the work tree. Sorted, no duplicates. Renames
/// contribute both sides.
pub fn changed_source_files(
    repo_path: &Path,
    base: &str,
    target: &str,
    extensions: &[String],
) -> Result<Vec<PathBuf>, ImpactError> {
    let repo = open(repo_path)?;
    let workdir = repo.workdir().ok_or_else(|| ImpactError::Git {
        message: format!("{} is a bare repository", repo_path.display()),
    })?;
    let diff = diff_between(&repo, base, target)?;

    let matches = |path: &Path| {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|want| want == ext))
    };

    let mut files = BTreeSet::new();
    for delta in diff.deltas() {
        for file in [delta.old_file(), delta.new_file()] {
            if let Some(path) = file.path() {
                if matches(path) {
                    files.insert(workdir.join(path));
                }
            }
        }
    }

    tracing::debug!(base, target, changed = files.len(), "diffed revisions");
    Ok(files.into_iter().collect())
}

/// Unified diff text between two revisions, for summarizer context.
pub fn diff_text(repo_path: &Path, base: &str, target: &str) -> Result<String, ImpactError> {
    let repo = open(repo_path)?;
    let diff = diff_between(&repo, base, target)?;

    let mut text = String::new();
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        if matches!(line.origin(), '+' | '-' | ' ') {
            text.push(line.origin());
        }
        text.push_str(&String::from_utf8_lossy(line.content()));
        true
    })
    .map_err(git_error)?;
    Ok(text)
}
