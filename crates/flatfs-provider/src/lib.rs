//! flatfs-provider: the file-list provider collaborator.
//!
//! Before the filesystem starts serving, the mount daemon asks a provider
//! for the names to expose. The stock provider runs an external listing
//! command (`dbxcli ls` by default) and parses its stdout; the trait seam
//! lets tests substitute a fixed list.
//!
//! Population errors are fatal to startup by policy: the filesystem must
//! not begin serving from a partially populated table, so nothing here
//! drops or overwrites entries silently.

use flatfs_fuse::table::{FileTableBuilder, TableError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Errors from fetching the file list.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Spawning or reading the listing command failed.
    #[error("failed to run listing command: {0}")]
    Io(#[from] std::io::Error),

    /// The listing command exited with a non-zero status.
    #[error("listing command failed with {status}: {stderr}")]
    CommandFailed {
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Shell command whose stdout lists the files to expose.
    #[serde(default = "default_command")]
    pub command: String,

    /// Upper bound on captured stdout, in bytes.
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,

    /// Content stored for every listed file.
    #[serde(default = "default_placeholder_content")]
    pub placeholder_content: String,
}

fn default_command() -> String {
    "dbxcli ls".into()
}

fn default_max_output_bytes() -> usize {
    65536
}

fn default_placeholder_content() -> String {
    "Text content".into()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            command: default_command(),
            max_output_bytes: default_max_output_bytes(),
            placeholder_content: default_placeholder_content(),
        }
    }
}

/// Source of candidate file names for table population.
#[async_trait::async_trait]
pub trait FileListProvider: Send + Sync {
    /// Fetch the list of file names to expose.
    async fn fetch_names(&self) -> Result<Vec<String>, ProviderError>;
}

/// Provider that shells out to a configured listing command.
pub struct CommandProvider {
    config: ProviderConfig,
}

impl CommandProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl FileListProvider for CommandProvider {
    async fn fetch_names(&self) -> Result<Vec<String>, ProviderError> {
        info!(command = %self.config.command, "fetching file list");

        let output = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(&self.config.command)
            .output()
            .await?;

        if !output.status.success() {
            return Err(ProviderError::CommandFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let mut stdout = output.stdout;
        stdout.truncate(self.config.max_output_bytes);
        let text = String::from_utf8_lossy(&stdout);

        let names = parse_names(&text);
        debug!(count = names.len(), "parsed file names");
        Ok(names)
    }
}

/// Parse listing-command output into file names.
///
/// Tokens are whitespace-separated; only tokens containing a `.` are taken
/// as file names (directories and noise in listings like `dbxcli ls` have
/// none), and a single leading `/` is stripped.
pub fn parse_names(output: &str) -> Vec<String> {
    output
        .split_whitespace()
        .filter(|token| token.contains('.'))
        .map(|token| token.strip_prefix('/').unwrap_or(token).to_string())
        .collect()
}

/// Insert every name into the builder with the given content.
///
/// Any `TableError` (duplicate, capacity, invalid name) propagates to the
/// caller, which treats it as fatal to startup.
pub fn populate(
    builder: &mut FileTableBuilder,
    names: &[String],
    content: &str,
) -> Result<(), TableError> {
    for name in names {
        builder.insert(name.clone(), content.as_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_filters_and_strips() {
        let output = "/a.txt\n/b.txt\nFolder\n/notes.md sub\n";
        assert_eq!(parse_names(output), ["a.txt", "b.txt", "notes.md"]);
    }

    #[test]
    fn test_parse_names_keeps_unprefixed_tokens() {
        assert_eq!(parse_names("plain.txt"), ["plain.txt"]);
        assert!(parse_names("no-dot-here\n").is_empty());
        assert!(parse_names("").is_empty());
    }

    #[test]
    fn test_populate_inserts_in_order() {
        let mut builder = FileTableBuilder::with_capacity(10);
        let names = vec!["a.txt".to_string(), "b.txt".to_string()];
        populate(&mut builder, &names, "Text content").unwrap();
        let table = builder.seal();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("a.txt").unwrap().content(), b"Text content");
    }

    #[test]
    fn test_populate_propagates_duplicate() {
        let mut builder = FileTableBuilder::with_capacity(10);
        let names = vec!["a.txt".to_string(), "a.txt".to_string()];
        let err = populate(&mut builder, &names, "x").unwrap_err();
        assert_eq!(err, TableError::DuplicateName("a.txt".to_string()));
    }

    #[test]
    fn test_populate_propagates_capacity() {
        let mut builder = FileTableBuilder::with_capacity(1);
        let names = vec!["a.txt".to_string(), "b.txt".to_string()];
        let err = populate(&mut builder, &names, "x").unwrap_err();
        assert_eq!(err, TableError::TableFull(1));
    }

    #[test]
    fn test_provider_config_defaults() {
        let cfg = ProviderConfig::default();
        assert_eq!(cfg.command, "dbxcli ls");
        assert_eq!(cfg.max_output_bytes, 65536);
        assert_eq!(cfg.placeholder_content, "Text content");
    }

    #[test]
    fn test_provider_config_from_toml() {
        let cfg: ProviderConfig = toml::from_str(
            r#"
                command = "ls /srv/share"
                max_output_bytes = 1024
            "#,
        )
        .unwrap();
        assert_eq!(cfg.command, "ls /srv/share");
        assert_eq!(cfg.max_output_bytes, 1024);
        assert_eq!(cfg.placeholder_content, "Text content");
    }

    #[tokio::test]
    async fn test_command_provider_runs_shell() {
        let provider = CommandProvider::new(ProviderConfig {
            command: "printf '/a.txt\\n/b.txt\\nFolder\\n'".into(),
            ..Default::default()
        });
        let names = provider.fetch_names().await.unwrap();
        assert_eq!(names, ["a.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn test_command_provider_reports_failure() {
        let provider = CommandProvider::new(ProviderConfig {
            command: "echo oops >&2; exit 3".into(),
            ..Default::default()
        });
        let err = provider.fetch_names().await.unwrap_err();
        match err {
            ProviderError::CommandFailed { status, stderr } => {
                assert_eq!(status.code(), Some(3));
                assert!(stderr.contains("oops"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_command_provider_truncates_output() {
        let provider = CommandProvider::new(ProviderConfig {
            command: "printf '/a.txt /b.txt'".into(),
            max_output_bytes: 6,
            ..Default::default()
        });
        // Only the first token survives the byte bound.
        let names = provider.fetch_names().await.unwrap();
        assert_eq!(names, ["a.txt"]);
    }
}
