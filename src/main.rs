use anyhow::Result;
use clap::{Parser, Subcommand};
use multipart_broker::{BrokerConfig, UploadService};
use tracing_subscriber::EnvFilter;

/// Maintenance CLI for the upload broker: inspect stored objects, issue
/// download URLs, delete objects, and sweep stale multipart uploads.
#[derive(Parser, Debug)]
#[command(
    name = "multipart-broker",
    about = "Presigned multipart upload broker for S3-compatible storage",
    version
)]
struct Cli {
    /// Target bucket
    #[arg(long, env = "BROKER_BUCKET")]
    bucket: String,

    /// Access key ID for the storage provider
    #[arg(long = "access-key-id", env = "AWS_ACCESS_KEY_ID")]
    access_key_id: String,

    /// Secret access key for the storage provider
    #[arg(long = "secret-access-key", env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    secret_access_key: String,

    /// Provider region
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    region: String,

    /// Custom endpoint URL (MinIO, LocalStack, ...)
    #[arg(long = "endpoint-url", env = "AWS_ENDPOINT_URL")]
    endpoint_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List stored objects, newest first
    List {
        #[arg(long, default_value = "uploads/")]
        prefix: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long = "page-size", default_value_t = 20)]
        page_size: usize,
    },
    /// Issue a presigned download URL for an object
    DownloadUrl {
        key: String,
        #[arg(long = "expires-in")]
        expires_in: Option<u64>,
    },
    /// Delete an object
    Delete { key: String },
    /// Abort multipart uploads older than the given age
    Cleanup {
        #[arg(long = "days-old", default_value_t = 7)]
        days_old: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut builder =
        BrokerConfig::builder(cli.bucket, cli.access_key_id, cli.secret_access_key)
            .region(cli.region);
    if let Some(endpoint) = cli.endpoint_url {
        builder = builder.endpoint_url(endpoint);
    }
    let service = UploadService::new(builder.build()?);

    match cli.command {
        Command::List {
            prefix,
            page,
            page_size,
        } => {
            let listing = service.list_files(&prefix, page, page_size).await?;
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        Command::DownloadUrl { key, expires_in } => {
            let url = service.download_url(&key, expires_in).await?;
            println!("{url}");
        }
        Command::Delete { key } => {
            service.delete_file(&key).await?;
            tracing::info!("deleted {key}");
        }
        Command::Cleanup { days_old } => {
            let aborted = service.cleanup_incomplete_uploads(days_old).await?;
            println!("aborted {aborted} stale uploads");
        }
    }

    Ok(())
}
