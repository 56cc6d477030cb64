//! CLI Tooling
//!
//! Command-line interface over the local storage: list storages, browse
//! contents, and stage prefixes into a buffer to preview the
//! registration request that would be submitted to the backend.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use comfy_table::{presets, Table};

use crate::backend::{ContentListing, LocalStorage, StorageCatalog};
use crate::buffer::registration;
use crate::config::QuarryConfig;
use crate::error::CoreError;
use crate::session::Session;

/// Quarry CLI - Stage cross-storage selections into queryable buffers
#[derive(Parser)]
#[command(name = "quarry")]
#[command(about = "Stage file and object-store selections into queryable buffers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Root directory of the local storage (defaults to the home directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log file path (logs go to stderr when unset)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List configured storages
    Storages,
    /// List contents at a prefix of the local storage
    Ls {
        /// Prefix within the storage (defaults to the root)
        #[arg(default_value = "")]
        prefix: String,
    },
    /// Stage prefixes into a buffer and print the registration request
    Plan {
        /// Prefix to stage (toggle semantics: repeating a prefix deselects it)
        #[arg(long = "select", required = true)]
        select: Vec<String>,
        /// Buffer display name
        #[arg(long, default_value = "")]
        name: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

pub struct CliContext {
    storage: LocalStorage,
}

impl CliContext {
    pub fn new(config: &QuarryConfig, root_override: Option<PathBuf>) -> Result<Self, CoreError> {
        let storage = match root_override.or_else(|| config.storage.root.clone()) {
            Some(root) => LocalStorage::new(config.storage.name.clone(), root),
            None => LocalStorage::with_home_root()?,
        };
        Ok(CliContext { storage })
    }

    pub async fn execute(&self, command: &Commands) -> Result<String, CoreError> {
        match command {
            Commands::Storages => self.storages().await,
            Commands::Ls { prefix } => self.ls(prefix).await,
            Commands::Plan {
                select,
                name,
                format,
            } => self.plan(select, name, format).await,
        }
    }

    async fn storages(&self) -> Result<String, CoreError> {
        let storages = self.storage.list_storages().await?;

        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL_CONDENSED);
        table.set_header(vec!["ID", "NAME", "KIND", "PREFIX"]);
        for storage in storages {
            table.add_row(vec![
                storage.id.to_string(),
                storage.name,
                storage.kind.to_string(),
                storage.prefix,
            ]);
        }
        Ok(table.to_string())
    }

    async fn ls(&self, prefix: &str) -> Result<String, CoreError> {
        let location = self.storage.get_storage(self.storage.id(), prefix).await?;
        let listing = self.storage.list_contents(&location).await?;

        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL_CONDENSED);
        table.set_header(vec!["KIND", "PREFIX"]);
        for item in listing.items {
            table.add_row(vec![item.kind.to_string(), item.prefix]);
        }
        Ok(table.to_string())
    }

    async fn plan(
        &self,
        select: &[String],
        name: &str,
        format: &str,
    ) -> Result<String, CoreError> {
        let store = self
            .storage
            .get_storage(self.storage.id(), "")
            .await?
            .to_ref();

        let session = Session::new();
        session.set_name(name);
        for prefix in select {
            let entry = self.storage.entry(prefix)?;
            session.toggle(&entry, &store);
        }

        let snapshot = session.snapshot();
        let request = registration::request_for(&snapshot);

        match format {
            "json" => Ok(serde_json::to_string_pretty(&request)?),
            "text" => {
                let mut out = String::new();
                let shown_name = if request.name.is_empty() {
                    "(unnamed)"
                } else {
                    request.name.as_str()
                };
                out.push_str(&format!(
                    "buffer {} ({} selections)\n",
                    shown_name,
                    snapshot.len()
                ));
                for group in &request.file_systems {
                    out.push_str(&format!("store {}:\n", group.store));
                    for prefix in &group.prefixes {
                        out.push_str(&format!("  {prefix}\n"));
                    }
                }
                Ok(out.trim_end().to_string())
            }
            other => Err(CoreError::Config(format!("unknown output format '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> CliContext {
        let config = QuarryConfig::default();
        CliContext::new(&config, Some(dir.path().to_path_buf())).unwrap()
    }

    fn seed(dir: &TempDir) {
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a/1.csv"), "x").unwrap();
        fs::write(dir.path().join("b.csv"), "x").unwrap();
    }

    #[tokio::test]
    async fn plan_json_output_is_the_registration_request() {
        let dir = TempDir::new().unwrap();
        seed(&dir);
        let context = context(&dir);

        let output = context
            .execute(&Commands::Plan {
                select: vec!["a/1.csv".to_string(), "b.csv".to_string()],
                name: "staging".to_string(),
                format: "json".to_string(),
            })
            .await
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["name"], "staging");
        assert_eq!(parsed["file_systems"][0]["store"], 1);
        assert_eq!(
            parsed["file_systems"][0]["prefixes"],
            serde_json::json!(["a/1.csv", "b.csv"])
        );
    }

    #[tokio::test]
    async fn plan_repeated_select_toggles_off() {
        let dir = TempDir::new().unwrap();
        seed(&dir);
        let context = context(&dir);

        let output = context
            .execute(&Commands::Plan {
                select: vec![
                    "a/1.csv".to_string(),
                    "b.csv".to_string(),
                    "a/1.csv".to_string(),
                ],
                name: String::new(),
                format: "json".to_string(),
            })
            .await
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            parsed["file_systems"][0]["prefixes"],
            serde_json::json!(["b.csv"])
        );
    }

    #[tokio::test]
    async fn ls_renders_listing_rows() {
        let dir = TempDir::new().unwrap();
        seed(&dir);
        let context = context(&dir);

        let output = context
            .execute(&Commands::Ls {
                prefix: String::new(),
            })
            .await
            .unwrap();
        assert!(output.contains("a"));
        assert!(output.contains("b.csv"));
    }

    #[tokio::test]
    async fn plan_rejects_missing_prefix() {
        let dir = TempDir::new().unwrap();
        let context = context(&dir);

        let err = context
            .execute(&Commands::Plan {
                select: vec!["missing.csv".to_string()],
                name: String::new(),
                format: "json".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Fetch(_)));
    }
}
