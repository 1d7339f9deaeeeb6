use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};

use flatfs_fuse::table::FileTableBuilder;
use flatfs_fuse::types::FuseConnInfo;
use flatfs_fuse::{FlatFileSystem, FlatFsConfig, FuseOps};
use flatfs_logging::LogConfig;
use flatfs_provider::{populate, CommandProvider, FileListProvider, ProviderConfig};

/// flatfs Mount Daemon
#[derive(Parser, Debug)]
#[command(name = "flatfs-mount", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "flatfs-mount.toml")]
    config: String,

    /// Mount point path (overrides the config file)
    #[arg(short, long)]
    mountpoint: Option<String>,

    /// Dump default configuration and exit
    #[arg(long)]
    dump_default_config: bool,
}

/// Top-level daemon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct MountConfig {
    #[serde(default)]
    fs: FlatFsConfig,
    #[serde(default)]
    provider: ProviderConfig,
    #[serde(default)]
    log: LogConfig,
}

fn load_config(path: &str) -> anyhow::Result<MountConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {path}"))?;
    toml::from_str(&text).with_context(|| format!("failed to parse config file {path}"))
}

/// Wait for a shutdown signal (CTRL+C or SIGTERM).
async fn wait_for_shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .expect("failed to register SIGTERM handler");
    tokio::select! {
        _ = ctrl_c => { tracing::info!("Received CTRL+C"); }
        _ = sigterm.recv() => { tracing::info!("Received SIGTERM"); }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.dump_default_config {
        print!("{}", toml::to_string_pretty(&MountConfig::default())?);
        return Ok(());
    }

    let mut config = load_config(&args.config)?;
    if let Some(mountpoint) = args.mountpoint {
        config.fs.mountpoint = mountpoint;
    }

    let _log_guard = flatfs_logging::init_logging(&config.log);
    tracing::info!(
        config = %args.config,
        mountpoint = %config.fs.mountpoint,
        "Starting flatfs mount"
    );

    // Populate the table before anything can serve from it. Any provider
    // or table error aborts startup: serving a partial table is worse
    // than not starting.
    let provider = CommandProvider::new(config.provider.clone());
    let names = provider
        .fetch_names()
        .await
        .context("failed to fetch file list")?;
    tracing::info!(count = names.len(), "file list fetched");

    let mut builder = FileTableBuilder::with_capacity(config.fs.max_entries);
    populate(&mut builder, &names, &config.provider.placeholder_content)
        .context("failed to populate file table")?;
    let table = Arc::new(builder.seal());

    let fs = FlatFileSystem::new(table, config.fs);
    let mut conn_info = FuseConnInfo::default();
    fs.init(&mut conn_info)
        .await
        .map_err(|errno| anyhow::anyhow!("filesystem init failed with errno {errno}"))?;

    // The FUSE kernel session loop attaches here; it drives the FuseOps
    // callbacks until unmount.
    tracing::info!(files = fs.table().len(), "flatfs serving");
    wait_for_shutdown_signal().await;

    fs.destroy().await;
    tracing::info!("flatfs mount shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_config_defaults() {
        let cfg = MountConfig::default();
        assert_eq!(cfg.fs.max_entries, 1000);
        assert_eq!(cfg.provider.command, "dbxcli ls");
        assert_eq!(cfg.log.level, "info");
    }

    #[test]
    fn test_mount_config_from_toml_sections() {
        let cfg: MountConfig = toml::from_str(
            r#"
                [fs]
                mountpoint = "/mnt/flatfs"
                max_entries = 10

                [provider]
                command = "ls /srv"

                [log]
                level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.fs.mountpoint, "/mnt/flatfs");
        assert_eq!(cfg.fs.max_entries, 10);
        assert_eq!(cfg.provider.command, "ls /srv");
        assert_eq!(cfg.log.level, "debug");
    }

    #[test]
    fn test_mount_config_dump_roundtrip() {
        let dumped = toml::to_string_pretty(&MountConfig::default()).unwrap();
        let parsed: MountConfig = toml::from_str(&dumped).unwrap();
        assert_eq!(parsed.fs.max_entries, 1000);
        assert!(parsed.fs.kernel_cache);
    }
}
