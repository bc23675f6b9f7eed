use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use graphwire::records::{ARTICLES_FILE, PUBLISHED_FILE};
use graphwire::schema::{PressReleaseSchema, DEFAULT_SPACE_ID};
use graphwire::{batch, builder, feed, ingest, records};
use graphwire_kg::{
    chain, space, ChainSpec, EditPipeline, IpfsPublisher, RelationChecker, Settings, SpaceClient,
    TransactionSubmitter,
};

#[derive(Parser)]
#[command(name = "graphwire")]
#[command(about = "Press release knowledge graph publisher", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the press release feed into a local snapshot
    Scrape {
        /// Feed URL
        #[arg(long, default_value = feed::DEFAULT_FEED_URL)]
        url: String,

        /// Where to write the articles snapshot
        #[arg(long, default_value = ARTICLES_FILE)]
        out: PathBuf,
    },

    /// Publish one edit per scraped article to IPFS
    Ingest {
        /// Articles snapshot to read
        #[arg(long, default_value = ARTICLES_FILE)]
        input: PathBuf,

        /// Where to write the published records snapshot
        #[arg(long, default_value = PUBLISHED_FILE)]
        out: PathBuf,
    },

    /// Anchor a single published edit on chain
    Submit {
        /// IPFS cid of the edit
        cid: String,
    },

    /// Anchor every record in the published snapshot on chain
    SubmitBatch {
        /// Published records snapshot to read
        #[arg(long, default_value = PUBLISHED_FILE)]
        input: PathBuf,
    },

    /// Create the press release property edges, skipping existing ones
    LinkProperties,

    /// Write the four banner triples onto the space entity
    Banner {
        /// Name value
        #[arg(long)]
        title: String,

        /// Publish date, RFC 3339 (e.g. 2025-03-01T12:00:00Z)
        #[arg(long)]
        date: String,

        /// Web URL value
        #[arg(long)]
        url: String,

        /// Blocks text value
        #[arg(long)]
        blocks: String,
    },

    /// Deploy a new space and print its id
    DeploySpace {
        /// Space name
        #[arg(long)]
        name: String,

        /// Initial editor address (defaults to WALLET_ADDRESS)
        #[arg(long)]
        editor: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "graphwire=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env();

    match cli.command {
        Commands::Scrape { ref url, ref out } => {
            println!("Fetching feed: {}", url);
            let articles = feed::fetch_feed(url).await?;
            records::write_articles(out, &articles)?;
            println!("Saved {} articles to {}", articles.len(), out.display());
            for article in &articles {
                println!("  - {}", article.title);
            }
        }

        Commands::Ingest { ref input, ref out } => {
            let articles = records::read_articles(input)?;
            println!(
                "Publishing {} articles from {}",
                articles.len(),
                input.display()
            );

            let pipeline = build_pipeline(&settings, false)?;
            let schema = PressReleaseSchema::default();
            let outcome = ingest::ingest_articles(&pipeline, &schema, &articles).await;

            if !outcome.records.is_empty() {
                records::write_published(out, &outcome.records)?;
                println!(
                    "Saved {} records to {}",
                    outcome.records.len(),
                    out.display()
                );
            }
            if outcome.failed > 0 {
                println!("{} articles failed to publish", outcome.failed);
            }
            println!("Run 'graphwire submit-batch' to anchor the published edits");
        }

        Commands::Submit { ref cid } => {
            let pipeline = build_pipeline(&settings, true)?;
            let tx_hash = pipeline.submit_cid(cid).await?;
            println!("Transaction: {}", tx_hash);
        }

        Commands::SubmitBatch { ref input } => {
            let published = records::read_published(input)?;
            println!(
                "Anchoring {} records from {}",
                published.len(),
                input.display()
            );

            let pipeline = build_pipeline(&settings, false)?;
            let summary = batch::submit_records(&pipeline, &published).await;
            println!(
                "Batch done: {} submitted, {} skipped, {} failed",
                summary.submitted, summary.skipped, summary.failed
            );
        }

        Commands::LinkProperties => {
            // The existence checker and the calldata source are the same
            // space client, so both see the same space.
            let client = Arc::new(SpaceClient::new(&settings.api_url, space_id(&settings)));
            let checker = RelationChecker::new(client.clone());

            let submitter = build_submitter(&settings, true)?;
            let author = author_address(&settings, &submitter)?;
            let pipeline = EditPipeline::new(
                Arc::new(IpfsPublisher::new(&settings.api_url)),
                client,
                Arc::new(submitter),
            )
            .with_author(author);

            let schema = PressReleaseSchema::default();
            let links = builder::property_links(&schema);
            match pipeline
                .submit_relations(&checker, "Link press release properties", &links)
                .await?
            {
                Some(receipt) => {
                    println!("Edit: {}", receipt.cid);
                    println!("Transaction: {}", receipt.tx_hash);
                }
                None => println!("All property relations already exist, nothing to do"),
            }
        }

        Commands::Banner {
            ref title,
            ref date,
            ref url,
            ref blocks,
        } => {
            let publish_date = DateTime::parse_from_rfc3339(date)
                .with_context(|| format!("invalid --date {date}, expected RFC 3339"))?
                .with_timezone(&Utc);

            let schema = PressReleaseSchema::default();
            let ops = builder::space_banner_ops(
                space_id(&settings),
                title,
                publish_date,
                url,
                blocks,
                &schema,
            );

            let pipeline = build_pipeline(&settings, true)?;
            match pipeline.submit_edit(title, ops).await? {
                Some(receipt) => {
                    println!("Edit: {}", receipt.cid);
                    println!("Transaction: {}", receipt.tx_hash);
                }
                None => println!("Nothing to publish"),
            }
        }

        Commands::DeploySpace {
            ref name,
            ref editor,
        } => {
            let editor = match editor {
                Some(addr) => chain::checksum_address(addr)?,
                None => chain::checksum_address(&settings.require_wallet_address()?)?,
            };
            println!("Deploying space {:?} with editor {}", name, editor);
            let new_space = space::deploy_space(&settings.api_url, &editor, name).await?;
            println!("Space deployed: {}", new_space);
            println!("Set SPACE_ID={} to target it", new_space);
        }
    }

    Ok(())
}

fn space_id(settings: &Settings) -> &str {
    settings.space_id.as_deref().unwrap_or(DEFAULT_SPACE_ID)
}

fn build_submitter(settings: &Settings, confirm: bool) -> Result<TransactionSubmitter> {
    let key = settings.require_private_key()?;
    let rpc_url = settings
        .rpc_url
        .clone()
        .unwrap_or_else(|| ChainSpec::geogenesis_testnet().default_rpc_url.to_string());
    Ok(TransactionSubmitter::new(&rpc_url, &key)?.with_confirm(confirm))
}

// Author recorded on published edits: the configured wallet address when
// set, otherwise the address derived from the signing key.
fn author_address(settings: &Settings, submitter: &TransactionSubmitter) -> Result<String> {
    match settings.wallet_address.as_deref() {
        Some(addr) => Ok(chain::checksum_address(addr)?),
        None => Ok(submitter.author_address()),
    }
}

fn build_pipeline(settings: &Settings, confirm: bool) -> Result<EditPipeline> {
    let submitter = build_submitter(settings, confirm)?;
    let author = author_address(settings, &submitter)?;

    Ok(EditPipeline::new(
        Arc::new(IpfsPublisher::new(&settings.api_url)),
        Arc::new(SpaceClient::new(&settings.api_url, space_id(settings))),
        Arc::new(submitter),
    )
    .with_author(author))
}
