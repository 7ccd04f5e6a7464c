use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use catalog_merge::{
    encode_child, load_modifier_lists, CatalogClient, Config, Container, SyncEngine,
    modifier_list_merger,
};

#[derive(Parser, Debug)]
#[command(name = "catalog-merge", version)]
#[command(about = "Merge modifier lists from a source catalog account into a target account")]
struct Cli {
    /// API base URL (overrides CATALOG_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Access token of the account to copy from (overrides SOURCE_ACCESS_TOKEN)
    #[arg(long, global = true)]
    source_token: Option<String>,

    /// Access token of the account to copy into (overrides TARGET_ACCESS_TOKEN)
    #[arg(long, global = true)]
    target_token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge source modifier lists into the target account
    Merge {
        /// Report what would change without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,

        /// Objects per upsert request (overrides CATALOG_BATCH_SIZE)
        #[arg(long)]
        batch_size: Option<usize>,
    },

    /// Show the modifier lists of one account with their signatures
    List {
        #[arg(long, value_enum, default_value_t = Account::Source)]
        account: Account,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Account {
    Source,
    Target,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("invalid configuration")?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if cli.source_token.is_some() {
        config.source_token = cli.source_token;
    }
    if cli.target_token.is_some() {
        config.target_token = cli.target_token;
    }

    match cli.command {
        Command::Merge {
            dry_run,
            json,
            batch_size,
        } => run_merge(&config, dry_run, json, batch_size),
        Command::List { account } => run_list(&config, account),
    }
}

fn client_for(config: &Config, account: Account) -> Result<CatalogClient> {
    let token = match account {
        Account::Source => config.source_token()?,
        Account::Target => config.target_token()?,
    };
    Ok(CatalogClient::new(&config.base_url, token, config.timeout))
}

fn run_merge(config: &Config, dry_run: bool, json: bool, batch_size: Option<usize>) -> Result<()> {
    let source = client_for(config, Account::Source)?;
    let target = client_for(config, Account::Target)?;

    let report = SyncEngine::new(&source, &target)
        .dry_run(dry_run)
        .batch_size(batch_size.unwrap_or(config.batch_size))
        .sync_modifier_lists()
        .context("merge aborted")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for outcome in &report.outcomes {
            println!("{:<40} {:?}", outcome.signature, outcome.action);
        }
        println!("\n{}", report.summary());
        for error in &report.upsert_errors {
            eprintln!("upsert failed: {}", error);
        }
    }

    if !report.is_clean() {
        anyhow::bail!("{} list(s) failed, {} upsert batch(es) rejected", report.failed(), report.upsert_errors.len());
    }
    Ok(())
}

fn run_list(config: &Config, account: Account) -> Result<()> {
    let client = client_for(config, account)?;
    let label = match account {
        Account::Source => "source",
        Account::Target => "target",
    };

    let merger = modifier_list_merger();
    let lists = load_modifier_lists(&client, label).context("listing failed")?;

    println!("{} modifier lists in {} account\n", lists.len(), label);
    for list in &lists {
        println!("{}  [{}]", merger.container_signature(list), list.id());
        for modifier in list.children() {
            println!("    {}", encode_child(modifier));
        }
    }

    Ok(())
}
