//! DiscountMate entry point
//!
//! ```bash
//! # Serve on 0.0.0.0:8080
//! discountmate serve
//!
//! # Score one basket offline
//! discountmate predict --total 220 --items 5 --tier silver
//! ```

use clap::{Parser, Subcommand};
use discountmate_api::config::{ConfigOverrides, LogFormat, ServiceConfig};
use discountmate_api::logging::init_tracing;
use discountmate_api::{build_state, serve};
use discountmate_core::{BasketRequest, DiscountModel};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "discountmate")]
#[command(about = "DiscountMate - decision-tree discount recommendation service")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true, env = "DISCOUNTMATE_CONFIG")]
    config: Option<PathBuf>,

    /// Log output format (pretty or json)
    #[arg(long, global = true, env = "DISCOUNTMATE_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Seed for the synthetic training data
    #[arg(long, global = true, env = "DISCOUNTMATE_SEED")]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "DISCOUNTMATE_HOST")]
        host: Option<String>,
    },

    /// Train the model and score a single basket
    Predict {
        #[arg(long)]
        total: f64,

        #[arg(long, default_value = "1", allow_negative_numbers = true)]
        items: i64,

        #[arg(long, default_value = "bronze")]
        tier: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut overrides = ConfigOverrides {
        log_format: cli.log_format,
        seed: cli.seed,
        ..Default::default()
    };
    if let Commands::Serve { port, host } = &cli.command {
        overrides.port = *port;
        overrides.host = host.clone();
    }

    let config = ServiceConfig::load(cli.config.as_deref(), overrides)?;
    init_tracing(&config.logging)?;

    match cli.command {
        Commands::Serve { .. } => {
            let state = build_state(&config)?;
            serve(&config, state).await?;
        }

        Commands::Predict { total, items, tier } => {
            let basket = match BasketRequest::new(total, items, &tier) {
                Ok(basket) => basket,
                Err(e) => {
                    eprintln!("Invalid basket: {}", e);
                    std::process::exit(2);
                }
            };

            let model = DiscountModel::train(&config.model)?;
            let discount = model.predict(&basket);

            println!(
                "{}",
                serde_json::json!({
                    "total": basket.total,
                    "items": basket.items,
                    "tier": basket.tier,
                    "discount": discount,
                })
            );
        }
    }

    Ok(())
}
