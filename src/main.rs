mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use futures::future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use cinebrowse::backends::tmdb::ImageSize;
use cinebrowse::backends::{MetadataSource, TmdbBackend};
use cinebrowse::cache::{FileStorage, Namespace, SystemClock, TimeBoxedStateStore};
use cinebrowse::config::Config;
use cinebrowse::core::scroll_anchor::NavigationEntry;
use cinebrowse::core::{ListView, Route};
use cinebrowse::core::pagination::PaginationState;
use cinebrowse::core::viewmodels::{BrowseViewModel, CarouselViewModel, CatalogFeed, MountOutcome};
use cinebrowse::models::{Catalog, MediaKind, MediaSummary, TmdbId};
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "cinebrowse=debug"
    } else {
        "cinebrowse=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let tmdb = Arc::new(
        TmdbBackend::from_config(&config.api)
            .context("Set TMDB_API_KEY or api.api_key in the config file")?,
    );

    match cli.command {
        Commands::Browse {
            route,
            pages,
            fresh,
        } => browse(&config, tmdb, &route, pages, fresh).await,
        Commands::Genres { tv } => genres(tmdb, tv).await,
        Commands::Detail { kind, id } => detail(tmdb, kind, id).await,
        Commands::Featured { seconds } => featured(&config, tmdb, seconds).await,
    }
}

async fn browse(
    config: &Config,
    tmdb: Arc<TmdbBackend>,
    route: &str,
    pages: u32,
    fresh: bool,
) -> Result<()> {
    let route: Route = route.parse()?;
    let catalogs = route.catalogs();
    if catalogs.is_empty() {
        bail!("{} is not a list view", route);
    }
    info!("Browsing {}", route);

    let storage = Arc::new(FileStorage::open(config.persistence.storage_dir()?)?);
    let store = TimeBoxedStateStore::new(storage, Arc::new(SystemClock), Namespace::PageState)
        .with_horizon(config.persistence.horizon());

    // a view with a single listing saves under the view's own key
    let sections: Vec<(String, Catalog)> = if catalogs.len() == 1 {
        catalogs.into_iter().map(|c| (route.page_key(), c)).collect()
    } else {
        catalogs.into_iter().map(|c| (c.page_key(), c)).collect()
    };

    let results = future::try_join_all(sections.into_iter().map(|(key, catalog)| {
        browse_section(config, tmdb.clone(), &store, key, catalog, pages, fresh)
    }))
    .await?;

    for (catalog, state) in results {
        println!("== {}", catalog);
        for item in state.items() {
            println!("{}", format_summary(item));
        }
        if let Some(error) = state.error() {
            warn!("{} stopped early: {}", catalog, error);
        }
        println!(
            "-- {} items, {}",
            state.len(),
            if state.has_more() {
                "more available"
            } else {
                "end of list"
            }
        );
    }
    Ok(())
}

async fn browse_section(
    config: &Config,
    tmdb: Arc<TmdbBackend>,
    store: &TimeBoxedStateStore,
    page_key: String,
    catalog: Catalog,
    pages: u32,
    fresh: bool,
) -> Result<(Catalog, PaginationState<MediaSummary>)> {
    let paginator = CatalogFeed::new(tmdb, catalog.clone()).paginator(config.pagination.options());
    let view_model = Arc::new(BrowseViewModel::new(page_key, paginator, store));

    let outcome = if fresh {
        view_model.refresh().await?;
        MountOutcome::Fetched
    } else {
        view_model.mount().await?
    };
    let entry = if outcome == MountOutcome::Restored {
        info!("{} resumed from saved state", catalog);
        NavigationEntry::Revisit
    } else {
        NavigationEntry::Fresh
    };
    let (mut list, signals) = ListView::open(
        view_model.page_key(),
        store,
        entry,
        view_model.state().len(),
        config.list_view_options(),
    );

    let cancel = CancellationToken::new();
    let driver = tokio::spawn({
        let view_model = view_model.clone();
        let cancel = cancel.clone();
        async move { view_model.drive(signals, cancel).await }
    });

    // subscribe before scrolling so the load the sentinel starts is not missed
    let mut loaded_pages = 1;
    let mut changes = view_model.subscribe();
    let mut fired =
        pages > 1 && view_model.state().can_load_more() && list.scroll_to_end(Instant::now());
    while fired {
        while changes.wait_for_change().await {
            if !changes.current().is_loading() {
                break;
            }
        }
        loaded_pages += 1;

        changes = view_model.subscribe();
        let state = view_model.state();
        fired = loaded_pages < pages
            && state.can_load_more()
            && (list.set_rows(state.len()) || list.scroll_to_end(Instant::now()));
    }

    cancel.cancel();
    driver.await.context("Browse driver panicked")?;
    view_model.teardown();
    let offset = list.close();
    debug!("{} left at offset {}", view_model.page_key(), offset);

    Ok((catalog, view_model.state()))
}

async fn genres(tmdb: Arc<TmdbBackend>, tv: bool) -> Result<()> {
    let kind = if tv { MediaKind::Tv } else { MediaKind::Movie };
    for genre in tmdb.fetch_genres(kind).await? {
        println!("{:>6}  {}", genre.id, genre.name);
    }
    Ok(())
}

async fn detail(tmdb: Arc<TmdbBackend>, kind: MediaKind, id: TmdbId) -> Result<()> {
    let details = tmdb.fetch_detail(kind, id).await?;

    println!("{}", format_summary(&details.summary));
    if let Some(tagline) = &details.tagline {
        println!("{}", tagline);
    }
    if !details.genres.is_empty() {
        let names: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
        println!("Genres: {}", names.join(", "));
    }
    if let Some(runtime) = details.runtime {
        println!("Runtime: {} min", runtime);
    }
    if let Some(seasons) = details.number_of_seasons {
        println!("Seasons: {}", seasons);
    }
    println!(
        "Poster: {}",
        tmdb.image_url(details.summary.poster_path.as_deref(), ImageSize::W500)
    );
    if let Some(url) = details.trailer().and_then(|t| t.watch_url()) {
        println!("Trailer: {}", url);
    }
    for member in details.cast.iter().take(5) {
        match &member.character {
            Some(character) => println!("  {} as {}", member.name, character),
            None => println!("  {}", member.name),
        }
    }
    if !details.summary.overview.is_empty() {
        println!();
        println!("{}", details.summary.overview);
    }
    Ok(())
}

async fn featured(config: &Config, tmdb: Arc<TmdbBackend>, seconds: u64) -> Result<()> {
    let source: Arc<dyn MetadataSource> = tmdb;
    let carousel =
        CarouselViewModel::load(source, config.carousel.timing(), config.carousel.featured_limit)
            .await?;
    if carousel.state().items.is_empty() {
        bail!("Nothing is featured right now");
    }

    let mut changes = carousel.subscribe();
    let driver = carousel.start();
    let deadline = tokio::time::sleep(Duration::from_secs(seconds));
    tokio::pin!(deadline);

    let mut shown = None;
    loop {
        tokio::select! {
            _ = &mut deadline => break,
            changed = changes.wait_for_change() => {
                if !changed {
                    break;
                }
                let state = changes.current();
                let Some(item) = state.current_item() else { continue };
                let trailer = state.trailer_url();
                let key = (item.id, trailer.is_some());
                if shown == Some(key) {
                    continue;
                }
                shown = Some(key);

                println!(
                    "[{}/{}] {}",
                    state.current_index + 1,
                    state.items.len(),
                    format_summary(item)
                );
                if let Some(url) = trailer {
                    println!("        trailer: {}", url);
                }
            }
        }
    }

    carousel.shutdown().await;
    driver.await.context("Carousel driver panicked")?;
    Ok(())
}

fn format_summary(item: &MediaSummary) -> String {
    let year = item
        .year()
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();
    format!(
        "{:>8}  {}{}  {:.1}",
        item.id, item.title, year, item.vote_average
    )
}
