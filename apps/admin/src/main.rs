use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{ActionOutcome, BlogListController, HttpBlogStore};
use shared::domain::{BlogId, CategoryFilter};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod console;
mod settings;

use console::{render_list, ConsoleNotifier};
use settings::load_settings;

#[derive(Parser, Debug)]
#[command(name = "kayease-admin", about = "Manage Kayease blog posts")]
struct Cli {
    /// Settings file; missing files are ignored.
    #[arg(long, default_value = "admin.toml")]
    config: PathBuf,
    /// Overrides the configured API base url.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = CategoryFilter::ALL)]
        category: CategoryFilter,
    },
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    ToggleStatus {
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(&cli.config);
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        settings.request_timeout_secs = timeout_secs;
    }

    let api = settings
        .api_config()
        .context("invalid blog api configuration")?;
    let store = HttpBlogStore::new(api).context("failed to set up blog api client")?;
    let controller = BlogListController::new(Arc::new(store), Arc::new(ConsoleNotifier));

    if controller.load().await != ActionOutcome::Applied {
        bail!("could not load blogs from {}", settings.api_url);
    }

    match cli.command {
        Command::List { search, category } => {
            if let CategoryFilter::Only(wanted) = &category {
                if !wanted.is_known() {
                    warn!(category = %wanted, "category is not one of the standard blog categories");
                }
            }
            controller.set_category_filter(category).await;
            controller.set_search_term(search).await;
            print!("{}", render_list(&controller.snapshot().await));
        }
        Command::Delete { id, yes } => delete(&controller, BlogId::new(id), yes).await?,
        Command::ToggleStatus { id } => {
            let id = BlogId::new(id);
            ensure_applied(controller.toggle_status(&id).await, &id)?;
        }
    }

    controller.dispose().await;
    Ok(())
}

async fn delete(controller: &BlogListController, id: BlogId, yes: bool) -> Result<()> {
    let view = controller.snapshot().await;
    let Some(post) = view.posts.iter().find(|post| post.id == id) else {
        bail!("no blog with id {id}");
    };
    controller.request_delete(post).await;

    if !yes {
        let prompt = format!("Delete \"{}\"? This cannot be undone. [y/N] ", post.title);
        let confirmed = tokio::task::spawn_blocking(move || confirm(&prompt))
            .await
            .context("confirmation prompt panicked")??;
        if !confirmed {
            controller.cancel_delete().await;
            eprintln!("cancelled");
            return Ok(());
        }
    }

    ensure_applied(controller.confirm_delete().await, &id)
}

fn confirm(prompt: &str) -> Result<bool> {
    use std::io::{self, BufRead, Write};

    let mut stderr = io::stderr();
    stderr.write_all(prompt.as_bytes())?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn ensure_applied(outcome: ActionOutcome, id: &BlogId) -> Result<()> {
    match outcome {
        ActionOutcome::Applied => Ok(()),
        ActionOutcome::Failed => bail!("request for blog {id} failed"),
        ActionOutcome::Skipped(reason) => bail!("request for blog {id} skipped: {reason:?}"),
    }
}
