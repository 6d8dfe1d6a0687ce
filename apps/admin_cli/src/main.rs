use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::load_settings,
    list_state::{mutation_failure_message, DELETE_SUCCEEDED_MESSAGE},
    notification::{NotificationSink, RecordingNotificationSink, TracingNotificationSink},
    CategoryApi, CategoryClient, CategoryListController, ClientSettings, ListState,
};
use shared::{
    domain::{Category, CategoryField, CategoryId, ListQuery, SortOrder, DEFAULT_SORT_BY},
    protocol::CreateCategoryRequest,
};
use tracing_subscriber::EnvFilter;

const DELETE_PROMPT: &str =
    "Are you sure you want to delete this category? This action cannot be undone.";

#[derive(Parser, Debug)]
#[command(about = "List, create and delete categories on a category service")]
struct Args {
    /// Overrides the configured API base URL.
    #[arg(long)]
    api_base_url: Option<String>,
    /// Settings file; defaults to ./category_admin.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one page of categories.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value = DEFAULT_SORT_BY)]
        sort_by: String,
        #[arg(long, default_value = "asc")]
        sort_order: SortOrder,
        #[arg(long, default_value = "")]
        search: String,
    },
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    Create {
        #[arg(long)]
        prefix: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref());
    if let Some(api_base_url) = args.api_base_url {
        settings.api_base_url = api_base_url;
    }
    let client = CategoryClient::new(&settings)
        .with_context(|| format!("failed to prepare client for {}", settings.api_base_url))?;

    match args.command {
        Command::List {
            page,
            limit,
            sort_by,
            sort_order,
            search,
        } => {
            let query = ListQuery {
                page,
                limit: limit.unwrap_or(settings.page_size),
                sort_by,
                sort_order,
                search_query: search,
            };
            list(client, &settings, query).await
        }
        Command::Delete { id, yes } => delete(&client, CategoryId::new(id), yes).await,
        Command::Create {
            prefix,
            name,
            description,
        } => create(&client, prefix, name, description).await,
    }
}

async fn list(client: CategoryClient, settings: &ClientSettings, query: ListQuery) -> Result<()> {
    let sink = Arc::new(RecordingNotificationSink::new());
    let mut controller = CategoryListController::with_state(
        client,
        sink.clone(),
        ListState::new(query),
        settings.delete_close_delay(),
    );
    controller.fetch_all_categories().await;

    for notification in sink.take() {
        if notification.is_error() {
            bail!("{}", notification.message);
        }
        TracingNotificationSink.notify(notification);
    }

    let state = controller.state();
    print!("{}", render_table(state.items()));
    println!(
        "page {} of {} ({} categories total)",
        state.query().page,
        state.page_count(),
        state.total()
    );
    Ok(())
}

async fn delete(client: &CategoryClient, id: CategoryId, assume_yes: bool) -> Result<()> {
    if !assume_yes && !confirm(&format!("{DELETE_PROMPT} [{id}] (y/N) "))? {
        println!("Aborted.");
        return Ok(());
    }

    match client.delete_category(&id).await {
        Ok(()) => {
            println!("{DELETE_SUCCEEDED_MESSAGE}");
            Ok(())
        }
        Err(err) => {
            tracing::error!("error when deleting category {id}: {err}");
            bail!("{}", mutation_failure_message(&err))
        }
    }
}

async fn create(
    client: &CategoryClient,
    prefix: String,
    name: String,
    description: String,
) -> Result<()> {
    if prefix.trim().is_empty() || name.trim().is_empty() {
        bail!("prefix and name are required");
    }

    let request = CreateCategoryRequest {
        prefix: prefix.trim().to_string(),
        name: name.trim().to_string(),
        description: description.trim().to_string(),
    };
    client
        .create_category(&request)
        .await
        .map_err(|err| anyhow::anyhow!(mutation_failure_message(&err)))?;
    println!("Category '{}' created", request.name);
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn render_table(categories: &[Category]) -> String {
    let mut headers = vec!["ID".to_string()];
    headers.extend(
        CategoryField::TABLE_COLUMNS
            .iter()
            .map(|field| field.label().to_string()),
    );

    let rows: Vec<Vec<String>> = categories
        .iter()
        .map(|category| {
            let mut row = vec![category.id.to_string()];
            row.extend(
                CategoryField::TABLE_COLUMNS
                    .iter()
                    .map(|field| category.field_text(*field)),
            );
            row
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = format_row(&headers);
    if rows.is_empty() {
        out.push_str("(no categories)\n");
    }
    for row in &rows {
        out.push_str(&format_row(row));
    }
    out
}
