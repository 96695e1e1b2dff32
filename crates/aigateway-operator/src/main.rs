//! AI gateway operator - admission webhooks for AiGateway and ModelRouter

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use kube::CustomResourceExt;
use tracing::info;

use aigateway_common::crd::{AiGateway, AiGatewayClass, ModelRouter, ModelRouterClass};
use aigateway_common::kube_utils::create_client;
use aigateway_common::telemetry::{init_telemetry, TelemetryConfig};
use aigateway_common::DEFAULT_WEBHOOK_PORT;
use aigateway_webhook::{start_webhook_server, ClassKubeClientImpl, ServerConfig};

/// AI gateway operator
#[derive(Parser, Debug)]
#[command(
    name = "aigateway-operator",
    version,
    about,
    long_about = None,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Webhook settings used when no subcommand is given
    #[command(flatten)]
    webhook: WebhookArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the admission webhooks (default mode)
    Webhook(WebhookArgs),

    /// Print all CRD manifests as multi-document YAML and exit
    Crds,
}

#[derive(clap::Args, Debug)]
struct WebhookArgs {
    /// HTTPS port to serve admission reviews on
    #[arg(long, env = "WEBHOOK_PORT", default_value_t = DEFAULT_WEBHOOK_PORT)]
    port: u16,

    /// Directory holding tls.crt and tls.key
    #[arg(
        long,
        env = "WEBHOOK_CERT_DIR",
        default_value = "/tmp/k8s-webhook-server/serving-certs"
    )]
    cert_dir: PathBuf,

    /// Kubeconfig to use instead of in-cluster configuration
    #[arg(long, env = "KUBECONFIG")]
    kubeconfig: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Crds) => print_crds(),
        Some(Commands::Webhook(args)) => run_webhook(args).await,
        None => run_webhook(cli.webhook).await,
    }
}

fn print_crds() -> anyhow::Result<()> {
    let crds = [
        AiGateway::crd(),
        AiGatewayClass::crd(),
        ModelRouter::crd(),
        ModelRouterClass::crd(),
    ];

    let docs = crds
        .iter()
        .map(serde_yaml::to_string)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow::anyhow!("Failed to serialize CRD: {}", e))?;

    println!("---\n{}", docs.join("---\n"));
    Ok(())
}

async fn run_webhook(args: WebhookArgs) -> anyhow::Result<()> {
    if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
        anyhow::bail!("failed to install rustls crypto provider: {:?}", e);
    }

    init_telemetry(TelemetryConfig::default())?;

    let client = create_client(args.kubeconfig.as_deref()).await?;
    let classes = Arc::new(ClassKubeClientImpl::new(client));

    let config = ServerConfig::new(args.port, &args.cert_dir);
    info!(
        port = args.port,
        cert_dir = %args.cert_dir.display(),
        "Starting aigateway-operator webhook"
    );

    start_webhook_server(config, classes).await?;
    Ok(())
}
