//! Git-backed Homebrew tap clone.

use crate::formula::{self, FormulaFields};
use nanoscope_release::backends::FormulaStore;
use nanoscope_release::error::{Error, Result};
use nanoscope_release::process::{ProcessCommand, ProcessRunner, SystemProcessRunner, run_checked};
use nanoscope_release::{FormulaSettings, Version};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Location and layout of the tap repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapConfig {
    /// Git remote to clone from
    pub remote: String,
    /// Local clone directory
    pub clone_dir: PathBuf,
    /// Formula file relative to `clone_dir` (default: `nanoscope.rb`)
    pub formula_file: PathBuf,
    /// Upstream branch the clone is reset to (default: `master`)
    pub branch: String,
}

impl TapConfig {
    /// Creates a tap configuration with the default formula file and branch.
    #[must_use]
    pub fn new(remote: impl Into<String>, clone_dir: impl Into<PathBuf>) -> Self {
        Self {
            remote: remote.into(),
            clone_dir: clone_dir.into(),
            formula_file: PathBuf::from("nanoscope.rb"),
            branch: "master".to_string(),
        }
    }

    /// Sets the formula file.
    #[must_use]
    pub fn with_formula_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.formula_file = file.into();
        self
    }

    /// Sets the upstream branch.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Builds the configuration from the `[formula]` settings table.
    ///
    /// # Errors
    ///
    /// Returns an error if the clone directory uses `~` and no home
    /// directory is available.
    pub fn from_settings(settings: &FormulaSettings) -> Result<Self> {
        Ok(Self::new(settings.remote.clone(), settings.resolved_clone_dir()?)
            .with_formula_file(settings.file.clone())
            .with_branch(settings.branch.clone()))
    }

    /// Full path of the formula file.
    #[must_use]
    pub fn formula_path(&self) -> PathBuf {
        self.clone_dir.join(&self.formula_file)
    }
}

/// [`FormulaStore`] over a local clone of the tap, driven by the `git` CLI.
pub struct FormulaRepository {
    config: TapConfig,
    runner: Box<dyn ProcessRunner>,
}

impl FormulaRepository {
    /// Creates a repository that runs real `git` processes.
    #[must_use]
    pub fn new(config: TapConfig) -> Self {
        Self::with_runner(config, Box::new(SystemProcessRunner))
    }

    /// Creates a repository with a custom process runner.
    #[must_use]
    pub fn with_runner(config: TapConfig, runner: Box<dyn ProcessRunner>) -> Self {
        Self { config, runner }
    }

    /// Returns the tap configuration.
    #[must_use]
    pub const fn config(&self) -> &TapConfig {
        &self.config
    }

    fn git_in_clone(&self, args: &[&str]) -> Result<()> {
        let command = ProcessCommand::git()
            .args(args.iter().copied())
            .current_dir(&self.config.clone_dir);
        run_checked(self.runner.as_ref(), &command)?;
        Ok(())
    }

    fn clone_if_missing(&self) -> Result<()> {
        let dir = &self.config.clone_dir;
        if dir.exists() {
            debug!(dir = %dir.display(), "Tap clone already present");
            return Ok(());
        }

        if let Some(parent) = dir.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        info!(remote = %self.config.remote, dir = %dir.display(), "Cloning tap");
        let command = ProcessCommand::git()
            .arg("clone")
            .arg(self.config.remote.as_str())
            .arg(dir.to_string_lossy());
        run_checked(self.runner.as_ref(), &command)?;
        Ok(())
    }

    fn read_formula(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| {
            Error::formula_parse(
                format!("failed to read formula: {e}"),
                Some(path.to_path_buf()),
            )
        })
    }
}

impl FormulaStore for FormulaRepository {
    fn ensure_clean(&self) -> Result<()> {
        self.clone_if_missing()?;

        let upstream = format!("origin/{}", self.config.branch);
        self.git_in_clone(&["fetch", "--all"])?;
        self.git_in_clone(&["reset", "--hard", &upstream])?;
        self.git_in_clone(&["checkout", &self.config.branch])?;
        self.git_in_clone(&["pull"])?;

        info!(branch = %self.config.branch, "Tap clone is up to date");
        Ok(())
    }

    fn read_version(&self) -> Result<Version> {
        let path = self.config.formula_path();
        let content = self.read_formula(&path)?;
        formula::read_version(&content, Some(&path))
    }

    fn update(&self, version: &Version, url: &str, sha256: &str) -> Result<()> {
        let path = self.config.formula_path();
        let content = self.read_formula(&path)?;

        let fields = FormulaFields::new(version, url, sha256);
        let (updated, missing) = formula::apply(&content, &fields)?;
        for key in missing {
            warn!(key, path = %path.display(), "Formula field not found, left unchanged");
        }

        std::fs::write(&path, updated)?;
        info!(version = %version, path = %path.display(), "Updated formula");
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.git_in_clone(&["commit", "-a", "-m", message])
    }

    fn push(&self) -> Result<()> {
        self.git_in_clone(&["push"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanoscope_release::process::ProcessOutput;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Records commands and fails any whose arguments start with `fail_on`.
    #[derive(Default)]
    struct RecordingRunner {
        commands: Arc<Mutex<Vec<ProcessCommand>>>,
        fail_on: Option<&'static str>,
    }

    impl ProcessRunner for RecordingRunner {
        fn run(&self, command: &ProcessCommand) -> Result<ProcessOutput> {
            self.commands.lock().unwrap().push(command.clone());
            let failed = self
                .fail_on
                .is_some_and(|arg| command.args.first().map(String::as_str) == Some(arg));
            Ok(ProcessOutput {
                command: command.clone(),
                code: Some(i32::from(failed)),
                stdout: String::new(),
                stderr: if failed { "boom".to_string() } else { String::new() },
            })
        }
    }

    fn repository(
        clone_dir: &Path,
        fail_on: Option<&'static str>,
    ) -> (FormulaRepository, Arc<Mutex<Vec<ProcessCommand>>>) {
        let commands = Arc::new(Mutex::new(Vec::new()));
        let runner = RecordingRunner {
            commands: Arc::clone(&commands),
            fail_on,
        };
        let config = TapConfig::new("git@example.com:tap.git", clone_dir).with_branch("main");
        (
            FormulaRepository::with_runner(config, Box::new(runner)),
            commands,
        )
    }

    fn args(commands: &Arc<Mutex<Vec<ProcessCommand>>>) -> Vec<Vec<String>> {
        commands
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.args.clone())
            .collect()
    }

    #[test]
    fn test_config_defaults() {
        let config = TapConfig::new("remote", "/tmp/tap");
        assert_eq!(config.branch, "master");
        assert_eq!(config.formula_path(), PathBuf::from("/tmp/tap/nanoscope.rb"));
    }

    #[test]
    fn test_config_from_settings() {
        let settings = FormulaSettings {
            remote: "git@example.com:tap.git".to_string(),
            clone_dir: "/srv/tap".to_string(),
            file: PathBuf::from("Formula/nanoscope.rb"),
            branch: "main".to_string(),
        };
        let config = TapConfig::from_settings(&settings).unwrap();
        assert_eq!(config.remote, "git@example.com:tap.git");
        assert_eq!(config.branch, "main");
        assert_eq!(
            config.formula_path(),
            PathBuf::from("/srv/tap/Formula/nanoscope.rb")
        );
    }

    #[test]
    fn test_ensure_clean_clones_when_missing() {
        let temp = TempDir::new().unwrap();
        let clone_dir = temp.path().join("nested").join("tap");
        let (repo, commands) = repository(&clone_dir, None);

        repo.ensure_clean().unwrap();

        // Parent directories are created ahead of the clone
        assert!(temp.path().join("nested").is_dir());
        let recorded = args(&commands);
        assert_eq!(recorded.len(), 5);
        assert_eq!(
            recorded[0],
            vec![
                "clone".to_string(),
                "git@example.com:tap.git".to_string(),
                clone_dir.to_string_lossy().into_owned(),
            ]
        );
        assert_eq!(recorded[1], vec!["fetch", "--all"]);
        assert_eq!(recorded[2], vec!["reset", "--hard", "origin/main"]);
        assert_eq!(recorded[3], vec!["checkout", "main"]);
        assert_eq!(recorded[4], vec!["pull"]);
    }

    #[test]
    fn test_ensure_clean_skips_clone_when_present() {
        let temp = TempDir::new().unwrap();
        let (repo, commands) = repository(temp.path(), None);

        repo.ensure_clean().unwrap();

        let recorded = commands.lock().unwrap().clone();
        assert_eq!(recorded.len(), 4);
        assert_eq!(recorded[0].args, vec!["fetch", "--all"]);
        assert!(
            recorded
                .iter()
                .all(|c| c.current_dir.as_deref() == Some(temp.path()))
        );
    }

    #[test]
    fn test_ensure_clean_stops_on_failure() {
        let temp = TempDir::new().unwrap();
        let (repo, commands) = repository(temp.path(), Some("reset"));

        let err = repo.ensure_clean().unwrap_err();

        assert!(matches!(err, Error::Command { .. }));
        assert!(err.to_string().contains("git reset --hard origin/main"));
        // fetch, then the failing reset; checkout and pull never run
        assert_eq!(args(&commands).len(), 2);
    }

    #[test]
    fn test_commit_passes_message_as_single_argument() {
        let temp = TempDir::new().unwrap();
        let (repo, commands) = repository(temp.path(), None);

        repo.commit("Update version to 1.2.4.").unwrap();
        repo.push().unwrap();

        assert_eq!(
            args(&commands),
            vec![
                vec!["commit", "-a", "-m", "Update version to 1.2.4."],
                vec!["push"],
            ]
        );
    }

    #[test]
    fn test_push_failure() {
        let temp = TempDir::new().unwrap();
        let (repo, _) = repository(temp.path(), Some("push"));
        assert!(repo.push().is_err());
    }

    #[test]
    fn test_read_and_update_formula() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("nanoscope.rb"),
            "class Nanoscope < Formula\n  url \"old\"\n  version \"0.9.9\"\n  sha256 \"old\"\nend\n",
        )
        .unwrap();
        let (repo, commands) = repository(temp.path(), None);

        assert_eq!(repo.read_version().unwrap(), Version::new(0, 9, 9));
        repo.update(&Version::new(0, 10, 0), "https://x/n.zip", "cafe")
            .unwrap();

        let content = std::fs::read_to_string(temp.path().join("nanoscope.rb")).unwrap();
        assert_eq!(
            content,
            "class Nanoscope < Formula\n  url \"https://x/n.zip\"\n  version \"0.10.0\"\n  sha256 \"cafe\"\nend\n"
        );
        assert_eq!(repo.read_version().unwrap(), Version::new(0, 10, 0));
        // Reading and editing the file runs no git commands
        assert!(commands.lock().unwrap().is_empty());
    }

    #[test]
    fn test_update_with_missing_fields_still_writes() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("nanoscope.rb"), "  version \"1.0.0\"\n").unwrap();
        let (repo, _) = repository(temp.path(), None);

        repo.update(&Version::new(1, 0, 1), "u", "s").unwrap();

        let content = std::fs::read_to_string(temp.path().join("nanoscope.rb")).unwrap();
        assert_eq!(content, "  version \"1.0.1\"\n");
    }

    #[test]
    fn test_read_version_missing_file() {
        let temp = TempDir::new().unwrap();
        let (repo, _) = repository(temp.path(), None);
        let err = repo.read_version().unwrap_err();
        assert!(matches!(err, Error::FormulaParse { path: Some(_), .. }));
    }
}
