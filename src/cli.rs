use std::fs;
use std::io::Read;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::client::{AdminClient, DEFAULT_ADDR};
use crate::path::ConfigPath;
use crate::reconcile::{Apply, Load, Reconciler, Remove};

#[derive(Parser)]
#[command(
    name = "balestra",
    version,
    about = "Converge a running Caddy configuration toward a desired state"
)]
struct Cli {
    /// Address of the Caddy admin endpoint. A bare address without a
    /// scheme is assumed to be plain HTTP.
    #[arg(long, global = true, default_value = DEFAULT_ADDR)]
    host: String,

    /// Decide what would change without issuing any mutating API call.
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create or update the configuration stored at a path.
    Apply {
        /// Configuration path, e.g. "apps/http/servers/example".
        path: String,
        /// Desired content as inline JSON.
        #[arg(long, conflicts_with = "file")]
        content: Option<String>,
        /// Read the desired content from a JSON file ("-" for stdin).
        #[arg(long)]
        file: Option<String>,
        /// Push even when no change would be made.
        #[arg(long)]
        force: bool,
        /// Append to (or insert into) the array at the path instead of
        /// replacing it.
        #[arg(long)]
        append: bool,
        /// Do not create missing ancestor containers.
        #[arg(long)]
        no_create_path: bool,
    },
    /// Remove the configuration stored at a path.
    Delete {
        path: String,
        /// Issue the DELETE even when nothing is stored at the path.
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration stored at a path.
    Get {
        #[arg(default_value = "")]
        path: String,
    },
    /// Replace the entire running configuration via /load.
    Load {
        /// New configuration as inline JSON.
        #[arg(long, conflicts_with = "file")]
        content: Option<String>,
        /// Read the new configuration from a JSON file ("-" for stdin).
        #[arg(long)]
        file: Option<String>,
        /// Push even when no change would be made.
        #[arg(long)]
        force: bool,
    },
}

/// Parse CLI arguments, dispatch the requested operation, and print
/// its outcome as JSON on stdout.
///
/// # Errors
///
/// Returns an error if the dispatched operation fails; `main` turns it
/// into a non-zero exit code.
pub fn run() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "balestra=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = AdminClient::new(&cli.host).dry_run(cli.dry_run);
    let reconciler = Reconciler::new(&client);

    let outcome = match &cli.command {
        Command::Apply {
            path,
            content,
            file,
            force,
            append,
            no_create_path,
        } => {
            let content = read_content(content.as_deref(), file.as_deref())?;
            let mut request = Apply::new(path, content);
            if *force {
                request = request.force();
            }
            if *append {
                request = request.append();
            }
            if *no_create_path {
                request = request.no_create_path();
            }
            reconciler.apply(&request)?
        }
        Command::Delete { path, force } => {
            let mut request = Remove::new(path);
            if *force {
                request = request.force();
            }
            reconciler.remove(&request)?
        }
        Command::Get { path } => reconciler.query(&ConfigPath::parse(path))?,
        Command::Load {
            content,
            file,
            force,
        } => {
            let content = read_content(content.as_deref(), file.as_deref())?;
            let mut request = Load::new(content);
            if *force {
                request = request.force();
            }
            reconciler.load(&request)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn read_content(content: Option<&str>, file: Option<&str>) -> anyhow::Result<Value> {
    let raw = match (content, file) {
        (Some(inline), _) => inline.to_string(),
        (None, Some("-")) => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read content from stdin")?;
            buffer
        }
        (None, Some(path)) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?
        }
        (None, None) => anyhow::bail!("either --content or --file is required"),
    };
    serde_json::from_str(&raw).context("content is not valid JSON")
}
