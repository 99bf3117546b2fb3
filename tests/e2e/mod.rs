use assert_cmd::Command;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use websec::config::RootConfig;

/// A test context with its own state directory and, optionally, a mocked
/// backend. Tests can run in parallel because nothing is shared.
pub struct TestContext {
    pub temp_dir: TempDir,
    api_url: Option<String>,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        Self {
            temp_dir,
            api_url: None,
        }
    }

    /// Points every command at `api_url` and polls fast enough for tests.
    pub fn with_backend(api_url: impl Into<String>) -> Self {
        let mut ctx = Self::new();
        ctx.api_url = Some(api_url.into());
        ctx.write_file("home/config.toml", "[poll]\ninterval_ms = 50\n");
        ctx
    }

    /// Returns the path to the temporary directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// State directory handed to the binary through WEBSEC_HOME
    pub fn home(&self) -> PathBuf {
        self.path().join("home")
    }

    /// Run websec with an isolated home, from the temp directory
    pub fn run_websec(&self, args: &[&str]) -> CommandResult {
        let mut cmd = Command::cargo_bin("websec").expect("Failed to find websec binary");
        cmd.args(args);
        cmd.current_dir(self.path());
        cmd.env("WEBSEC_HOME", self.home());
        cmd.env_remove("WEBSEC_API_URL");
        cmd.env_remove("WEBSEC_PASSWORD");

        if let Some(url) = &self.api_url {
            cmd.args(["--api-url", url]);
        }

        let output = cmd.output().expect("Failed to execute websec command");

        CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            status: output.status,
        }
    }

    /// Get full path to a file in the temp directory
    pub fn file_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.path().join(path)
    }

    /// Read file from temp directory
    pub fn read_file(&self, path: impl AsRef<Path>) -> String {
        let full_path = self.file_path(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Failed to read file: {}", full_path.display()))
    }

    /// Write file to temp directory (creates parent directories)
    pub fn write_file(&self, path: impl AsRef<Path>, content: &str) {
        let full_path = self.file_path(&path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|_| panic!("Failed to create directory: {}", parent.display()));
        }
        fs::write(&full_path, content)
            .unwrap_or_else(|_| panic!("Failed to write file: {}", full_path.display()));
    }

    /// Assert file exists
    pub fn assert_file_exists(&self, path: impl AsRef<Path>) {
        let full_path = self.file_path(&path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Stores a session as if `websec login` had succeeded
    pub fn sign_in_as(&self, role: &str) {
        let session = json!({
            "token": "tok-e2e",
            "user": {"id": 7, "name": "Ana", "email": "ana@example.com", "role": role}
        });

        self.write_file("home/session.json", &session.to_string());
    }

    /// Load the config file the binary wrote into the home directory
    pub fn load_config(&self) -> RootConfig {
        let path = self.home().join("config.toml");
        RootConfig::load(&path).expect("Failed to load config.toml")
    }
}

pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

pub fn assert_success(result: &CommandResult) {
    assert!(
        result.success(),
        "Expected command to succeed but it failed.\n\nSTDOUT:\n{}\n\nSTDERR:\n{}",
        result.stdout,
        result.stderr
    );
}

pub fn assert_failure(result: &CommandResult) {
    assert!(
        !result.success(),
        "Expected command to fail but it succeeded.\n\nSTDOUT:\n{}\n\nSTDERR:\n{}",
        result.stdout,
        result.stderr
    );
}

pub fn assert_output_contains(result: &CommandResult, pattern: &str) {
    assert!(
        result.stdout.contains(pattern),
        "Expected stdout to contain '{}', but it didn't.\n\nSTDOUT:\n{}\n\nSTDERR:\n{}",
        pattern,
        result.stdout,
        result.stderr
    );
}

pub fn assert_stderr_contains(result: &CommandResult, pattern: &str) {
    assert!(
        result.stderr.contains(pattern),
        "Expected stderr to contain '{}', but it didn't.\n\nSTDOUT:\n{}\n\nSTDERR:\n{}",
        pattern,
        result.stdout,
        result.stderr
    );
}

pub mod happy_path;
pub mod smoke;
