//! Shelflife: headless driver for the storage-lifecycle engine.
//!
//! Loads views through the tab synchronizer and renders accounting figures
//! through the view-model formatter, against a running coordinator backend.

mod cli;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shelflife::api::{CoordinatorApi, HttpCoordinator};
use shelflife::config::Config;
use shelflife::engine::mappings::MappingTable;
use shelflife::engine::{
    ActionDispatcher, ContentQuery, DispatchState, StorageAccounting, TabSynchronizer, ViewId,
    format_gb,
};
use shelflife::models::{MediaItem, MediaType};

use crate::cli::{CliOptions, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shelflife=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let options = CliOptions::from_args();
    let api = HttpCoordinator::new(config.coordinator_url.as_str());
    let mut sync = TabSynchronizer::new();

    match options.command {
        Command::Status => {
            sync.load(&api, ViewId::Settings).await?;
            let view = sync.settings().context("settings data missing")?;
            println!("plex:   {}", view.status.plex);
            println!("sonarr: {}", view.status.sonarr);
            println!("radarr: {}", view.status.radarr);
            let mappings = MappingTable::from_flat(&view.settings.archive_mappings);
            println!(
                "archive mappings: {} tv, {} movie",
                mappings.count(MediaType::Tv),
                mappings.count(MediaType::Movie)
            );
            println!(
                "root folders: {} sonarr, {} radarr",
                view.root_folders.sonarr.len(),
                view.root_folders.radarr.len()
            );
        }
        Command::Dashboard => {
            sync.load(&api, ViewId::Dashboard).await?;
            let dashboard = sync.dashboard().context("dashboard data missing")?;
            let accounting = StorageAccounting::from_dashboard(dashboard);
            println!(
                "main pool:    {} used / {} free / {} total",
                accounting.main_used, accounting.main_available, accounting.main_total
            );
            println!(
                "archive pool: {} used / {} free / {} total",
                accounting.archive_used, accounting.archive_available, accounting.archive_total
            );
            println!("potential savings: {}", accounting.potential_savings);
            println!(
                "library: {} shows ({}), {} movies ({}), {} on streaming",
                accounting.tv_count,
                accounting.tv_size,
                accounting.movie_count,
                accounting.movies_size,
                accounting.on_streaming
            );
            for item in &dashboard.candidates {
                println!(
                    "  candidate: [{}] {} ({})",
                    item.media_type,
                    item.title,
                    format_gb(Some(item.size))
                );
            }
        }
        Command::Content => {
            sync.load(&api, ViewId::Content).await?;
            let items = sync.content().context("content data missing")?;
            let mut query = ContentQuery::new(config.page_size);
            if let Some(filter) = options.type_filter {
                query.set_type_filter(Some(filter));
            }
            if let Some(search) = options.search {
                query.set_search(search);
            }
            if let Some(sort) = options.sort {
                query.set_sort(sort);
            }
            let page = query.apply(items);
            for item in &page.items {
                println!(
                    "[{}] {:>10} {} ({})",
                    item.media_type,
                    format_gb(Some(item.size)),
                    item.title,
                    item.status
                );
            }
            println!(
                "page {}/{}, {} matching items",
                page.page + 1,
                page.page_count,
                page.total_matches
            );
        }
        Command::Sync => {
            let message = api
                .trigger_sync()
                .await
                .map_err(|e| anyhow::anyhow!(e.message()))?;
            println!("{message}");
        }
        Command::Cleanup => {
            let message = api
                .trigger_cleanup()
                .await
                .map_err(|e| anyhow::anyhow!(e.message()))?;
            println!("{message}");
        }
        Command::Delete { id } => {
            let item = find_item(&mut sync, &api, &id).await?;
            let mut dispatcher = ActionDispatcher::new();
            dispatcher.request_delete(item)?;
            if !options.confirm {
                println!("delete of {id} is pending; re-run with --confirm to dispatch");
                dispatcher.cancel();
            } else {
                let outcome = dispatcher.confirm(&api).await?;
                println!("{}", outcome.message);
                sync.load(&api, ViewId::Content).await?;
            }
        }
        Command::Archive { id } => {
            let item = find_item(&mut sync, &api, &id).await?;
            let mut dispatcher = ActionDispatcher::new();
            dispatcher.request_archive(&api, item).await?;
            if let Some(index) = options.folder {
                dispatcher.select_folder(index)?;
            }
            if let DispatchState::AwaitingFolderSelection { pending } = dispatcher.state() {
                for (index, folder) in pending.folders.iter().enumerate() {
                    let marker = if pending.selected == Some(index) { '*' } else { ' ' };
                    println!("{marker} [{index}] {}", folder.path);
                }
            }
            if !options.confirm {
                println!("archive of {id} is pending; re-run with --confirm to dispatch");
                dispatcher.cancel();
            } else {
                let outcome = dispatcher.confirm(&api).await?;
                println!("{}", outcome.message);
                sync.load(&api, ViewId::Content).await?;
            }
        }
    }

    Ok(())
}

/// Looks an item up by id in a freshly loaded content catalog.
async fn find_item(
    sync: &mut TabSynchronizer,
    api: &dyn CoordinatorApi,
    id: &str,
) -> anyhow::Result<MediaItem> {
    sync.load(api, ViewId::Content).await?;
    sync.content()
        .context("content data missing")?
        .iter()
        .find(|item| item.id == id)
        .cloned()
        .with_context(|| format!("no item with id {id}"))
}
