use std::path::{Path, PathBuf};
use std::process::Command;

/// Set while git-hop itself runs `git checkout` so the installed hook does
/// not re-enter and record the visit twice.
pub const SKIP_HOOK_ENV: &str = "GIT_HOP_SKIP_HOOK";

#[derive(Debug)]
pub enum RepoError {
    NotARepository(PathBuf),
    Git { action: &'static str, detail: String },
    Io(std::io::Error),
}

impl std::fmt::Display for RepoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotARepository(path) => {
                write!(f, "not a git repository: {}", path.display())
            }
            Self::Git { action, detail } => write!(f, "git {action} failed: {detail}"),
            Self::Io(err) => write!(f, "io: {err}"),
        }
    }
}

impl std::error::Error for RepoError {}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Local git working copy, rooted at the directory holding `.git`. All
/// branch reads and the checkout go through the `git` binary; this type
/// never touches the tracking store.
#[derive(Debug)]
pub struct GitRepo {
    root: PathBuf,
}

impl GitRepo {
    pub fn discover() -> Result<Self, RepoError> {
        let cwd = std::env::current_dir()?;
        Self::discover_from(&cwd)
    }

    /// Walks up from `start` until a directory containing `.git` is found.
    pub fn discover_from(start: &Path) -> Result<Self, RepoError> {
        let mut current = start.to_path_buf();
        loop {
            if current.join(".git").is_dir() {
                return Ok(Self { root: current });
            }
            if !current.pop() {
                return Err(RepoError::NotARepository(start.to_path_buf()));
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn basename(&self) -> String {
        self.root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "/".to_string())
    }

    /// Currently checked out branch, or none on a detached HEAD or when
    /// git is unavailable.
    pub fn current_branch(&self) -> Option<String> {
        let raw = self.run_git("branch", &["branch", "--show-current"]).ok()?;
        let name = raw.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }

    /// All local branch names; empty when git fails.
    pub fn branches(&self) -> Vec<String> {
        match self.run_git("branch", &["branch", "--format=%(refname:short)"]) {
            Ok(raw) => parse_branch_lines(&raw),
            Err(err) => {
                tracing::debug!(error = %err, "branch listing failed");
                Vec::new()
            }
        }
    }

    pub fn branch_exists(&self, name: &str) -> bool {
        self.branches().iter().any(|branch| branch == name)
    }

    pub fn checkout(&self, name: &str) -> Result<(), RepoError> {
        let output = Command::new("git")
            .args(["checkout", name])
            .env(SKIP_HOOK_ENV, "1")
            .current_dir(&self.root)
            .output()?;
        if !output.status.success() {
            return Err(RepoError::Git {
                action: "checkout",
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    pub fn hook_path(&self, hook: &str) -> PathBuf {
        self.root.join(".git").join("hooks").join(hook)
    }

    pub fn install_hook(&self, hook: &str, content: &str) -> Result<(), RepoError> {
        let path = self.hook_path(hook);
        if let Some(hooks_dir) = path.parent() {
            std::fs::create_dir_all(hooks_dir)?;
        }
        std::fs::write(&path, content)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
        }
        Ok(())
    }

    pub fn hook_installed(&self, hook: &str) -> bool {
        let path = self.hook_path(hook);
        if !path.is_file() {
            return false;
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            match std::fs::metadata(&path) {
                Ok(metadata) => metadata.permissions().mode() & 0o111 != 0,
                Err(_) => false,
            }
        }
        #[cfg(not(unix))]
        true
    }

    pub fn read_hook(&self, hook: &str) -> Option<String> {
        std::fs::read_to_string(self.hook_path(hook)).ok()
    }

    fn run_git(&self, action: &'static str, args: &[&str]) -> Result<String, RepoError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()?;
        if !output.status.success() {
            return Err(RepoError::Git {
                action,
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn parse_branch_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(label: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be monotonic enough for tests")
            .as_nanos();
        path.push(format!("git-hop-repo-{label}-{}-{nanos}", std::process::id()));
        std::fs::create_dir_all(&path).expect("temp dir must be creatable");
        path
    }

    #[test]
    fn parses_branch_listing_output() {
        assert_eq!(
            parse_branch_lines("main\n  feature/login\n\nbugfix/nav\n"),
            vec!["main", "feature/login", "bugfix/nav"]
        );
        assert!(parse_branch_lines("").is_empty());
    }

    #[test]
    fn discovers_root_from_nested_directory() {
        let root = temp_dir("discover");
        std::fs::create_dir_all(root.join(".git")).expect(".git dir must be creatable");
        let nested = root.join("src").join("deep");
        std::fs::create_dir_all(&nested).expect("nested dir must be creatable");

        let repo = GitRepo::discover_from(&nested).expect("repo root must be found");
        assert_eq!(repo.root(), root.as_path());

        let outside = temp_dir("outside");
        let err = GitRepo::discover_from(&outside)
            .expect_err("directory without .git must not resolve");
        assert!(matches!(err, RepoError::NotARepository(_)));
    }

    #[test]
    fn hook_install_round_trips() {
        let root = temp_dir("hooks");
        std::fs::create_dir_all(root.join(".git")).expect(".git dir must be creatable");
        let repo = GitRepo::discover_from(&root).expect("repo root must be found");

        assert!(!repo.hook_installed("post-checkout"));
        repo.install_hook("post-checkout", "#!/bin/sh\nexit 0\n")
            .expect("hook must install");
        assert!(repo.hook_installed("post-checkout"));
        assert_eq!(
            repo.read_hook("post-checkout").as_deref(),
            Some("#!/bin/sh\nexit 0\n")
        );
    }
}
