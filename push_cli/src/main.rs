// Pushgateway push client.
//
// Exercises the push-endpoint integration from the requirer side: formats
// one metric sample and forwards it to the published Pushgateway address.

use anyhow::Result;
use clap::{Parser, Subcommand};

use push_cli::client::PushClient;
use push_cli::output;

#[derive(Parser)]
#[command(name = "pgw-push")]
#[command(version = "0.1.0")]
#[command(about = "Send metric samples to a Prometheus Pushgateway", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Push endpoint URL, as published over the push-endpoint integration
    #[arg(long, default_value = "http://127.0.0.1:9091/", env = "PUSHGATEWAY_URL")]
    url: String,

    /// Skip TLS certificate verification
    #[arg(long)]
    insecure: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a single metric sample
    Send {
        /// Metric name (non-empty ASCII, no whitespace)
        #[arg(long)]
        name: String,

        /// Metric value
        #[arg(long)]
        value: f64,

        /// Job label under which the sample is grouped
        #[arg(long, default_value = "default")]
        job: String,
    },

    /// Check that the push endpoint is reachable
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = PushClient::new(&cli.url, cli.insecure)?;

    match cli.command {
        Commands::Send { name, value, job } => {
            client.send(&name, value, &job).await?;
            output::success(&format!("sent {} {} (job {})", name, value, job));
        }
        Commands::Check => match client.check().await {
            Ok(()) => output::success("push endpoint is ready"),
            Err(e) => {
                output::error(&format!("push endpoint is not ready: {}", e));
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
