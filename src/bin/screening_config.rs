use clap::{Parser, Subcommand};
use screen_reconcile::core::BlobStore;
use screen_reconcile::screening::{upload_file, AccessGate, ScreeningConfig, ScreeningConfigStore};
use screen_reconcile::utils::error::ReconcileError;
use screen_reconcile::utils::validation::{
    validate_file_extensions, validate_non_empty_string, validate_required_field, validate_url,
    Validate,
};
use screen_reconcile::utils::logger;
use screen_reconcile::{HttpBlobStore, LocalBlobStore};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "screening-config")]
#[command(about = "Manage the screening rubric and uploads in the blob store")]
struct Args {
    /// Access key presented by the caller
    #[arg(long, env = "SCREENING_KEY", hide_env_values = true)]
    key: String,

    /// Access key the caller must match
    #[arg(long, env = "SCREENING_ACCESS_KEY", hide_env_values = true)]
    access_key: String,

    #[arg(long, env = "BLOB_STORE_URL")]
    store_url: Option<String>,

    #[arg(long, env = "BLOB_READ_WRITE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Use a local directory as the blob store instead of the HTTP API
    #[arg(long)]
    store_dir: Option<String>,

    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the stored rubric as JSON
    Show,
    /// Replace the stored rubric
    Set {
        #[arg(long = "include")]
        inclusion: Vec<String>,
        #[arg(long = "exclude")]
        exclusion: Vec<String>,
    },
    /// Upload PDFs or CSV exports
    Upload {
        #[arg(long, default_value = "pdfs")]
        prefix: String,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

impl Validate for Args {
    fn validate(&self) -> screen_reconcile::Result<()> {
        if self.store_dir.is_none() {
            let url = validate_required_field("store_url", &self.store_url)?;
            validate_url("store_url", url)?;
            let token = validate_required_field("token", &self.token)?;
            validate_non_empty_string("token", token)?;
        }

        if let Command::Upload { files, .. } = &self.command {
            let names: Vec<String> = files.iter().map(|f| f.display().to_string()).collect();
            validate_file_extensions("files", &names, &["pdf", "csv"])?;
        }

        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    if let Err(e) = AccessGate::new(args.access_key.as_str()).check(&args.key) {
        exit_with(&e);
    }
    if let Err(e) = args.validate() {
        exit_with(&e);
    }

    let result = match (&args.store_dir, &args.store_url, &args.token) {
        (Some(root), _, _) => execute(LocalBlobStore::new(root), args.command).await,
        (None, Some(url), Some(token)) => {
            execute(HttpBlobStore::new(url.as_str(), token.as_str()), args.command).await
        }
        _ => Err(ReconcileError::MissingConfigError {
            field: "store_url".to_string(),
        }),
    };

    if let Err(e) = result {
        exit_with(&e);
    }
}

async fn execute<B: BlobStore>(store: B, command: Command) -> screen_reconcile::Result<()> {
    match command {
        Command::Show => {
            let config = ScreeningConfigStore::new(store).load().await?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::Set {
            inclusion,
            exclusion,
        } => {
            let saved = ScreeningConfigStore::new(store)
                .save(ScreeningConfig::new(inclusion, exclusion))
                .await?;
            println!("{}", serde_json::to_string_pretty(&saved)?);
        }
        Command::Upload { prefix, files } => {
            for file in &files {
                let blob = upload_file(&store, &prefix, file).await?;
                println!("✅ {} -> {}", file.display(), blob.url);
            }
        }
    }
    Ok(())
}

fn exit_with(e: &ReconcileError) -> ! {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}
