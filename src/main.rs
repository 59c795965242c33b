use clap::{Parser, Subcommand};
use forum_tables::{
    get, load, sampledata,
    schema::{FORUM, REPLY, THREAD},
    Client, Config, DynamodbClient, Lifecycle, ENV_CONFIG_PATH, ENV_DYNAMODB_ENDPOINT_URL,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Provision, seed and query the forum sample tables.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// DynamoDB endpoint, e.g. http://localhost:8000 for DynamoDB Local.
    #[arg(long, global = true, env = ENV_DYNAMODB_ENDPOINT_URL)]
    endpoint_url: Option<String>,

    /// YAML file with throughput, polling and sample data settings.
    #[arg(long, global = true, env = ENV_CONFIG_PATH, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the Thread, Reply and Forum tables and wait until they are ACTIVE.
    Create,
    /// Delete the tables and wait until they are gone.
    Delete,
    /// Write every sample data file, one batch per file.
    Load {
        /// Directory of DynamoDB JSON files. Overrides the config file.
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
    /// Look up a forum by name.
    GetForum { name: String },
    /// Look up a reply by thread id and reply time.
    GetReply { id: String, reply_date_time: String },
    /// Look up a thread by forum name and subject.
    GetThread { forum_name: String, subject: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();
    let config = Config::load(cli.config, cli.endpoint_url);

    let client: Arc<dyn Client> = Arc::new(
        DynamodbClient::builder()
            .await
            .endpoint_url(config.endpoint_url())
            .build(),
    );
    let registry = config.registry();

    match cli.command {
        Command::Create => {
            info!("Creating tables");
            let results = Lifecycle::new(client)
                .with_policy(config.poll_policy())
                .create_all(registry.specs())
                .await?;
            print(&results)
        }
        Command::Delete => {
            info!("Deleting tables");
            let results = Lifecycle::new(client)
                .with_policy(config.poll_policy())
                .delete_all(registry.deletion_order())
                .await?;
            print(&results)
        }
        Command::Load { dir } => {
            let dir = dir.unwrap_or_else(|| config.sampledata().to_path_buf());
            info!("Loading data from {}", dir.to_string_lossy());
            let batches = sampledata::read_dir(&dir)?;
            print(&load(client.as_ref(), batches).await)
        }
        Command::GetForum { name } => {
            let key = registry.get(FORUM)?.lookup_key(&[name.as_str()])?;
            print(&get(client.as_ref(), FORUM, key).await?)
        }
        Command::GetReply {
            id,
            reply_date_time,
        } => {
            let key = registry.get(REPLY)?.lookup_key(&[id.as_str(), reply_date_time.as_str()])?;
            print(&get(client.as_ref(), REPLY, key).await?)
        }
        Command::GetThread {
            forum_name,
            subject,
        } => {
            let key = registry
                .get(THREAD)?
                .lookup_key(&[forum_name.as_str(), subject.as_str()])?;
            print(&get(client.as_ref(), THREAD, key).await?)
        }
    }
}

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
