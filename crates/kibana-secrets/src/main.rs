//! kibana-secrets
//!
//! Materializes Kibana credentials from cluster secrets into a working
//! directory, or prints their fingerprints.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use kibana_common::kube_utils::create_client;
use kibana_common::telemetry::{init_telemetry, TelemetryConfig};
use kibana_secrets::config::{ConfigOverrides, OsEnv};
use kibana_secrets::{CredentialExtractor, ExtractorConfig, KubeSecretStore, Result, WorkingDir};

/// Kibana credential extraction
#[derive(Parser, Debug)]
#[command(name = "kibana-secrets")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Namespace holding the secrets (overrides KIBANA_NAMESPACE)
    #[arg(long, global = true)]
    namespace: Option<String>,

    /// Directory to write credential files into (overrides KIBANA_WORKING_DIR)
    #[arg(long, global = true)]
    working_dir: Option<PathBuf>,

    /// JSON catalog file (overrides KIBANA_SECRET_CATALOG)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Path to kubeconfig (defaults to in-cluster or KUBECONFIG)
    #[arg(long, global = true)]
    kubeconfig: Option<PathBuf>,

    /// Emit JSON logs
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write every catalog field to its output file
    Extract,
    /// Print the content fingerprint of every catalog secret
    Fingerprint,
}

impl Cli {
    fn config(&self) -> Result<ExtractorConfig> {
        ExtractorConfig::resolve(&OsEnv, &self.overrides())
    }

    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            namespace: self.namespace.clone(),
            working_dir: self.working_dir.clone(),
            catalog: self.catalog.clone(),
        }
    }

    async fn run(self) -> Result<()> {
        let config = self.config()?;
        let client = create_client(self.kubeconfig.as_deref()).await?;

        let writer = Arc::new(WorkingDir::new(config.working_dir));
        let extractor = CredentialExtractor::new(
            Arc::new(KubeSecretStore::new(client)),
            writer.clone(),
            &config.namespace,
            config.catalog,
        );

        match self.command {
            Commands::Extract => {
                extractor.extract_all().await?;
                info!(dir = %writer.root().display(), "credentials written");
            }
            Commands::Fingerprint => {
                for (name, hash) in extractor.fingerprints().await? {
                    println!("{} {}", name, hash);
                }
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_telemetry(TelemetryConfig {
        service_name: "kibana-secrets".to_string(),
        json: cli.log_json,
    }) {
        eprintln!("{}", e);
        return std::process::ExitCode::FAILURE;
    }

    match cli.run().await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, not_found = e.is_not_found(), "kibana-secrets failed");
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_become_overrides() {
        let cli = Cli::parse_from([
            "kibana-secrets",
            "--namespace",
            "logging",
            "--catalog",
            "/etc/kibana/catalog.json",
            "extract",
        ]);
        let overrides = cli.overrides();
        assert_eq!(overrides.namespace.as_deref(), Some("logging"));
        assert_eq!(
            overrides.catalog,
            Some(PathBuf::from("/etc/kibana/catalog.json"))
        );
        assert!(overrides.working_dir.is_none());
        assert!(matches!(cli.command, Commands::Extract));
    }
}
