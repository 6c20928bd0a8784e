#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::cargo)]
#![warn(clippy::perf)]
#![warn(clippy::complexity)]
#![warn(clippy::style)]
#![allow(clippy::multiple_crate_versions)]

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chzzk_resolver::{
    CatalogEntry, ChzzkClient, ClientConfig, ContentReference, CredentialProvider, DetailRecord,
    EnvSettings, Resolver,
    util::{init_http_client, truncate_string},
};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

/// Resolves Chzzk lives and videos into playable HLS links
///
/// Set `CHZZK_NID_AUT` and `CHZZK_NID_SES` (environment or `.env`) to act as a logged in user
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List live channels you follow
    Following,

    /// Search lives and videos
    Search {
        query: String,

        /// Result page, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Show details of a live / video (token or chzzk.naver.com URL)
    Detail { reference: String },

    /// Resolve playable links of a live / video (token or chzzk.naver.com URL)
    Links {
        reference: String,

        /// Also fetch each master playlist and list its qualities
        #[arg(long)]
        probe: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let credentials = CredentialProvider::new(Arc::new(EnvSettings));
    if !credentials.current_credentials().is_authenticated() {
        info!("Running without Chzzk credentials; 1080p and age-restricted content are unavailable");
    }
    let client = ChzzkClient::new(init_http_client(), ClientConfig::from_env(), credentials);
    let resolver = Resolver::new(client);

    match args.command {
        Command::Following => {
            let entries = resolver.list_followed_live().await;
            print_entries(&entries, args.json)?;
        }
        Command::Search { query, page } => {
            let entries = resolver.search(&query, page).await;
            print_entries(&entries, args.json)?;
        }
        Command::Detail { reference } => {
            let reference = ContentReference::from_url(&reference)?;
            let detail = resolver
                .load_detail(&reference)
                .await
                .context("Loading content detail")?;
            print_detail(&detail, args.json)?;
        }
        Command::Links { reference, probe } => {
            let reference = ContentReference::from_url(&reference)?;
            let links = resolver
                .resolve_links(&reference)
                .await
                .context("Resolving playable links")?;
            if links.is_empty() {
                bail!("Content exists but has nothing playable right now");
            }

            if args.json {
                println!("{}", serde_json::to_string_pretty(&links)?);
            } else {
                for link in &links {
                    println!("[{}] {}", link.label, link.url);
                }
            }

            if probe {
                for link in &links {
                    match resolver.probe_variants(link).await {
                        Ok(variants) if args.json => {
                            println!("{}", serde_json::to_string_pretty(&variants)?);
                        }
                        Ok(variants) => {
                            for v in variants {
                                println!(
                                    "  {:>10} {:>9} bps  {}",
                                    v.resolution.as_deref().unwrap_or("?"),
                                    v.bandwidth,
                                    v.uri
                                );
                            }
                        }
                        Err(e) => warn!("Unable to probe {}: {e}", link.url),
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_entries(entries: &[CatalogEntry], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }

    for entry in entries {
        println!(
            "{:<5} {:<60} {}",
            format!("{:?}", entry.kind()).to_lowercase(),
            truncate_string(&entry.title, 60),
            entry.reference
        );
    }
    Ok(())
}

fn print_detail(detail: &DetailRecord, json: bool) -> Result<()> {
    if json {
        let raw = match detail {
            DetailRecord::Live { detail, .. } => serde_json::to_value(detail)?,
            DetailRecord::Video { detail, .. } => serde_json::to_value(detail)?,
        };
        println!("{}", serde_json::to_string_pretty(&raw)?);
        return Ok(());
    }

    println!(
        "{}",
        indoc::formatdoc!(
            "{}
            Plot: {}
            Tags: {}
            Duration: {}
            Poster: {}
            Reference: {}",
            detail.title(),
            detail.plot().unwrap_or("-"),
            detail.tags().join(", "),
            detail
                .duration_minutes()
                .map_or_else(|| "-".to_string(), |m| format!("{m} min")),
            detail.poster_url().as_deref().unwrap_or("-"),
            detail.reference()
        )
    );
    Ok(())
}
