use super::driver::{BranchTip, DiffTool, VcsDriver};
use crate::errors::{ForestError, Result};
use chrono::{TimeZone, Utc};
use git2::{BranchType, Repository};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// [`VcsDriver`] over a local repository.
///
/// Reads go through libgit2. Anything that rewrites history or needs the
/// user's terminal (editor, difftool, pull credentials) runs the `git` binary
/// in the working directory so hooks and user configuration apply.
pub struct GitRepository {
    repo: Repository,
    path: PathBuf,
    verbose: bool,
}

impl GitRepository {
    /// Open a Git repository at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)
            .map_err(|e| ForestError::config(format!("Not a git repository: {}", e)))?;

        let workdir = repo
            .workdir()
            .ok_or_else(|| ForestError::config("Repository has no working directory"))?
            .to_path_buf();

        Ok(Self {
            repo,
            path: workdir,
            verbose: false,
        })
    }

    /// Echo every external git command line at INFO instead of DEBUG
    pub fn with_verbose_commands(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }


    fn run_git(&self, args: &[&str]) -> Result<()> {
        let command_line = format!("git {}", args.join(" "));
        if self.verbose {
            info!(">>> {}", command_line);
        } else {
            debug!("Running {}", command_line);
        }

        let status = Command::new("git")
            .args(args)
            .current_dir(&self.path)
            .status()
            .map_err(|e| ForestError::config(format!("Failed to run {command_line}: {e}")))?;

        if status.success() {
            Ok(())
        } else {
            Err(ForestError::external(command_line, status.code()))
        }
    }

    fn branch_commit(&self, name: &str) -> Result<git2::Commit<'_>> {
        let branch = self
            .repo
            .find_branch(name, BranchType::Local)
            .map_err(|_| ForestError::not_found(name.to_string()))?;
        Ok(branch.get().peel_to_commit()?)
    }
}

impl VcsDriver for GitRepository {
    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        if head.is_branch() {
            if let Some(name) = head.shorthand() {
                return Ok(name.to_string());
            }
        }
        // Same answer as `git rev-parse --abbrev-ref HEAD` when detached
        Ok("HEAD".to_string())
    }

    fn checkout(&self, name: &str) -> Result<()> {
        self.run_git(&["checkout", name])
    }

    fn create_branch_and_switch(&self, name: &str) -> Result<()> {
        self.run_git(&["checkout", "-b", name])
    }

    fn commit_interactive(&self) -> Result<()> {
        self.run_git(&["commit"])
    }

    fn amend_no_edit(&self) -> Result<()> {
        self.run_git(&["commit", "--amend", "--no-edit"])
    }

    fn rebase_onto(&self, new_base: &str) -> Result<()> {
        self.run_git(&["rebase", "--onto", new_base, "HEAD^1"])
    }

    fn delete_branch(&self, name: &str) -> Result<()> {
        self.run_git(&["branch", "-D", name])
    }

    fn rename_current_branch(&self, new_name: &str) -> Result<()> {
        self.run_git(&["branch", "-m", new_name])
    }

    fn branch_listing(&self) -> Result<Vec<BranchTip>> {
        let mut tips = Vec::new();
        for branch in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = branch?;
            let Some(name) = branch.name()? else {
                continue;
            };
            let commit = branch.get().peel_to_commit()?;
            tips.push(BranchTip {
                name: name.to_string(),
                commit: commit.id().to_string(),
            });
        }
        tips.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tips)
    }

    fn rev_parse(&self, rev: &str) -> Result<String> {
        let commit = self
            .repo
            .revparse_single(rev)
            .and_then(|object| object.peel_to_commit())
            .map_err(|e| ForestError::external(format!("rev-parse {rev}: {}", e.message()), None))?;
        Ok(commit.id().to_string())
    }

    fn pull(&self) -> Result<()> {
        self.run_git(&["pull"])
    }

    fn diff(&self, tool: DiffTool, base: &str, extra_args: &[String]) -> Result<()> {
        let mut args = vec![tool.as_git_command(), base];
        args.extend(extra_args.iter().map(String::as_str));
        self.run_git(&args)
    }

    fn commit_subject(&self, name: &str) -> Result<String> {
        let commit = self.branch_commit(name)?;
        let committed_at = Utc
            .timestamp_opt(commit.committer().when().seconds(), 0)
            .single()
            .unwrap_or_else(Utc::now);
        let age = (Utc::now() - committed_at).num_seconds();
        Ok(format!(
            "({}) {}",
            relative_age(age),
            commit.summary().unwrap_or_default()
        ))
    }
}

/// Render an age in seconds the way `git log --format=%cr` does
pub fn relative_age(seconds: i64) -> String {
    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;
    const WEEK: i64 = 7 * DAY;
    const MONTH: i64 = 30 * DAY;
    const YEAR: i64 = 365 * DAY;

    let seconds = seconds.max(0);
    let (amount, unit) = if seconds < 90 {
        (seconds, "second")
    } else if seconds < 90 * MINUTE {
        ((seconds + MINUTE / 2) / MINUTE, "minute")
    } else if seconds < 36 * HOUR {
        ((seconds + HOUR / 2) / HOUR, "hour")
    } else if seconds < 14 * DAY {
        ((seconds + DAY / 2) / DAY, "day")
    } else if seconds < 10 * WEEK {
        ((seconds + WEEK / 2) / WEEK, "week")
    } else if seconds < YEAR {
        ((seconds + MONTH / 2) / MONTH, "month")
    } else {
        ((seconds + YEAR / 2) / YEAR, "year")
    };

    if amount == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{amount} {unit}s ago")
    }
}
