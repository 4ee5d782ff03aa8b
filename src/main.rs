use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use url::Url;
use zkemail_inputs::config::{CLOUDFLARE_DOH, GOOGLE_DOH, KEY_ARCHIVE};
use zkemail_inputs::inputs::assemble;
use zkemail_inputs::{EmailVerifierInputs, KeyResolver, ResolverConfig};

#[derive(Parser, Debug)]
#[command(name = "zkemail-inputs")]
#[command(about = "Resolve DKIM keys and assemble verifier circuit inputs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve the DKIM public key (p= value) for a selector and domain
    ResolveKey {
        selector: String,
        domain: String,

        /// Print the full record as JSON instead of the bare key
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        resolver: ResolverArgs,
    },
    /// Assemble circuit inputs from the input generator's JSON output
    Assemble {
        /// JSON file produced by the email verifier input generator
        #[arg(long)]
        generated: PathBuf,

        /// Hex address bound into the proof
        #[arg(long)]
        address: String,

        /// Keywords that must appear in the email body
        #[arg(long, value_delimiter = ',', required = true)]
        keywords: Vec<String>,

        /// Output path for the assembled inputs
        #[arg(long, default_value = "inputs.json")]
        out: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ResolverArgs {
    /// Primary DNS-over-HTTPS endpoint
    #[arg(long, env = "DKIM_PRIMARY_DOH", default_value = GOOGLE_DOH)]
    primary_doh: Url,

    /// Secondary DNS-over-HTTPS endpoint
    #[arg(long, env = "DKIM_SECONDARY_DOH", default_value = CLOUDFLARE_DOH)]
    secondary_doh: Url,

    /// Key archive endpoint
    #[arg(long, env = "DKIM_KEY_ARCHIVE", default_value = KEY_ARCHIVE)]
    archive: Url,

    /// Timeout per source attempt, in seconds
    #[arg(long, env = "DKIM_ATTEMPT_TIMEOUT_SECS", default_value_t = 8)]
    timeout_secs: u64,
}

impl From<ResolverArgs> for ResolverConfig {
    fn from(args: ResolverArgs) -> Self {
        ResolverConfig::default()
            .with_primary_doh(args.primary_doh)
            .with_secondary_doh(args.secondary_doh)
            .with_archive(args.archive)
            .with_attempt_timeout(Duration::from_secs(args.timeout_secs))
    }
}

async fn resolve_key(selector: &str, domain: &str, json: bool, config: ResolverConfig) -> Result<()> {
    let resolver = KeyResolver::from_config(config)?;
    let record = resolver.resolve(selector, domain).await?;
    tracing::info!("Key for {}._domainkey.{} resolved via {}", selector, domain, record.source);

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("{}", record.public_key_base64);
    }
    Ok(())
}

fn assemble_inputs(generated: &Path, address: &str, keywords: &[String], out: &Path) -> Result<()> {
    let file = File::open(generated)
        .with_context(|| format!("failed to open generator output {}", generated.display()))?;
    let generated: EmailVerifierInputs =
        serde_json::from_reader(file).context("failed to parse generator output")?;

    let keywords: Vec<&str> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();
    if keywords.is_empty() {
        bail!("at least one non-empty keyword is required");
    }

    let inputs = assemble(generated, address, keywords.as_slice())?;
    inputs.write_json(out)?;
    tracing::info!("Circuit inputs written to {}", out.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment variables from {:?}", path),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => bail!("failed to load .env file: {}", e),
    }
    let cli = Cli::parse();

    match cli.command {
        Commands::ResolveKey {
            selector,
            domain,
            json,
            resolver,
        } => resolve_key(&selector, &domain, json, resolver.into()).await,
        Commands::Assemble {
            generated,
            address,
            keywords,
            out,
        } => assemble_inputs(&generated, &address, &keywords, &out),
    }
}
