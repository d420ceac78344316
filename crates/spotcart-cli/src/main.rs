use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "spotcart")]
#[command(about = "Render hotspot product popups and add their variants to a storefront cart")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the popup markup for a hotspot payload
    Render {
        /// File holding a raw `data-product` value or an HTML page with hotspots
        #[arg(long)]
        payload: PathBuf,
        /// Which hotspot to use when the file is an HTML page
        #[arg(long, default_value_t = 0)]
        hotspot: usize,
        /// Option choice as `Name=Value`, applied in order
        #[arg(long = "select", value_name = "NAME=VALUE")]
        selections: Vec<String>,
    },
    /// Resolve a variant and add it to the configured store's cart
    Add {
        #[arg(long)]
        payload: PathBuf,
        #[arg(long, default_value_t = 0)]
        hotspot: usize,
        #[arg(long = "select", value_name = "NAME=VALUE")]
        selections: Vec<String>,
        /// Page path sent as `sections_url` when sections are requested
        #[arg(long, default_value = "/")]
        page_path: String,
        /// Cart section id to render with the add response
        #[arg(long = "section", value_name = "ID")]
        sections: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    // `render` works offline, so a missing store URL only matters for `add`.
    let config = spotcart_core::load_app_config_from_env();
    init_tracing(config.as_ref().map_or("info", |c| c.log_level.as_str()));

    let cli = Cli::parse();
    match cli.command {
        Commands::Render {
            payload,
            hotspot,
            selections,
        } => commands::run_render(&payload, hotspot, &selections)?,
        Commands::Add {
            payload,
            hotspot,
            selections,
            page_path,
            sections,
        } => {
            let config = config?;
            commands::run_add(
                &config,
                &commands::AddArgs {
                    payload: &payload,
                    hotspot,
                    selections: &selections,
                    page_path: &page_path,
                    sections: &sections,
                },
            )
            .await?;
        }
    }

    Ok(())
}

/// `log_level` accepts any `EnvFilter` directive.
fn init_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_new(log_level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
