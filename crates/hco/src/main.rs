use clap::{Parser, Subcommand};
use hco_core::{HyperConverged, Resource, ResourceKey};
use hco_operands::operand::{decode_as, update_resource};
use hco_operands::{
    new_network_addons, new_network_addons_handler, ApiClient, HcoRequest, OperandConfig,
    ResourceClient,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "hco", about = "HyperConverged Cluster Operator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the network operand of a HyperConverged once
    Reconcile {
        /// Kubernetes API server URL
        #[arg(long, default_value = "http://127.0.0.1:8001")]
        api_url: String,
        /// Name of the HyperConverged resource
        #[arg(long, default_value = "kubevirt-hyperconverged")]
        name: String,
        /// Namespace of the HyperConverged resource
        #[arg(long, default_value = "kubevirt-hyperconverged")]
        namespace: String,
        /// Treat this pass as part of an operator upgrade
        #[arg(long)]
        upgrade: bool,
        #[command(flatten)]
        versions: Versions,
    },
    /// Print the desired NetworkAddonsConfig for a HyperConverged manifest
    Render {
        /// Path to a HyperConverged YAML manifest
        #[arg(long)]
        file: String,
        #[command(flatten)]
        versions: Versions,
    },
}

#[derive(clap::Args)]
struct Versions {
    /// Operator version stamped into operand labels
    #[arg(long, env = "HCO_KV_IO_VERSION", default_value = "")]
    hco_version: String,
    /// Expected cluster-network-addons version
    #[arg(long, env = "NETWORK_ADDONS_VERSION", default_value = "")]
    network_addons_version: String,
}

impl From<Versions> for OperandConfig {
    fn from(v: Versions) -> Self {
        OperandConfig::new(v.hco_version, v.network_addons_version)
    }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Reconcile {
            api_url,
            name,
            namespace,
            upgrade,
            versions,
        } => run_reconcile(&api_url, &name, &namespace, upgrade, versions.into()).await,
        Commands::Render { file, versions } => run_render(&file, &versions.into()),
    }
}

/// Run a single reconcile pass against a live API server
async fn run_reconcile(
    api_url: &str,
    name: &str,
    namespace: &str,
    upgrade: bool,
    config: OperandConfig,
) -> miette::Result<()> {
    let client = ApiClient::new(api_url);
    let token = CancellationToken::new();

    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal, cancelling reconcile");
            ctrl_c_token.cancel();
        }
    });

    let empty = HyperConverged::default();
    let key = ResourceKey::new(empty.gvk(), namespace, name);
    let hc = client
        .get(&key)
        .await?
        .ok_or_else(|| miette::miette!("HyperConverged {} not found", key))?;
    let hc = decode_as(&empty, hc)?;

    let mut req = HcoRequest::new(hc, token.clone()).with_upgrade_mode(upgrade);
    let mut operand = new_network_addons_handler(config);
    let res = operand.ensure(&mut req, &client).await?;

    info!(
        "{} {}: created={} updated={} overwritten={} upgrade_done={}",
        res.component, res.name, res.created, res.updated, res.overwritten, res.upgrade_done
    );
    if res.overwritten {
        warn!(
            "{} {} was modified outside the operator and has been reverted",
            res.component, res.name
        );
    }

    if req.dirty {
        info!("Persisting HyperConverged {}", key);
        update_resource(&token, &client, &mut req.instance).await?;
    }

    for condition in req.conditions.into_vec() {
        info!(
            "condition {}={} reason={} message={}",
            condition.type_,
            condition.status,
            condition.reason.unwrap_or_default(),
            condition.message.unwrap_or_default()
        );
    }

    Ok(())
}

fn run_render(file: &str, config: &OperandConfig) -> miette::Result<()> {
    let data = std::fs::read_to_string(file)
        .map_err(|e| miette::miette!("Failed to read '{}': {}", file, e))?;
    let hc: HyperConverged = hco_core::from_yaml(&data)?;
    hc.validate().map_err(hco_core::HcoError::from)?;

    let cna = new_network_addons(&hc, config, None)?;
    print!("{}", hco_core::to_yaml(&cna)?);
    Ok(())
}
