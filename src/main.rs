//! gosearch CLI - search the Go package index from the command line.

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use gosearch::{Search, SearchOptions, OFFICIAL_INDEX_URL};

/// Search packages on the Go package index
#[derive(Parser)]
#[command(name = "gosearch")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Example: gosearch gin cobra,viper")]
struct Cli {
    /// Keywords to search (comma-separated values are split)
    keywords: Vec<String>,

    /// Skip https cert verify
    #[arg(long)]
    insecure: bool,

    /// Render results shortly
    #[arg(short, long)]
    short: bool,

    /// Render raw results without field titles
    #[arg(short = 'r', long = "omittitle")]
    omit_title: bool,

    /// Render each result as a JSON object
    #[arg(long)]
    json: bool,

    /// Base URL of the package index
    #[arg(long, default_value = OFFICIAL_INDEX_URL)]
    index_url: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl From<Cli> for SearchOptions {
    fn from(cli: Cli) -> Self {
        Self {
            keywords: cli.keywords,
            omit_title: cli.omit_title,
            insecure: cli.insecure,
            short: cli.short,
            json: cli.json,
            index_url: cli.index_url,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; stdout is reserved for results
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    let options = SearchOptions::from(cli);
    let keywords = options.keywords();
    if keywords.is_empty() {
        return Ok(());
    }

    let search = Search::from_options(&options)?;

    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Received Ctrl+C, cancelling searches");
            cancel_on_signal.cancel();
        }
    });

    let mut stdout = std::io::stdout();
    let written = search.run(keywords, cancel, &mut stdout).await?;
    debug!("Rendered {} packages", written);

    Ok(())
}
