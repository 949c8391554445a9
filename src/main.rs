use clap::{Parser, Subcommand};
use docs_nav::toc::{TocRenderer, duplicate_anchors, index_headings};
use docs_nav::traits::markup::scan_headings;
use docs_nav::types::SidebarLayout;
use docs_nav::{
    AbortHandle, ContentSource, FetchError, HttpContentSource, NavigationConfig, PageCache,
    PageContent, PageId,
};
use log::{info, warn};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
enum CliError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid page payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("{0}")]
    Fetch(#[from] FetchError),

    #[error("could not start the async runtime: {0}")]
    Runtime(std::io::Error),

    #[error("'{0}' is not a page id")]
    InvalidId(String),
}

#[derive(Parser)]
#[command(name = "docs-nav")]
#[command(about = "Inspect docs-theme page payloads and the page-content endpoint")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the sidebar layout and table of contents of a saved payload
    Outline {
        /// Path to a page-content JSON payload
        payload: PathBuf,
    },

    /// Fetch pages through the page cache, reporting hits and evictions
    Fetch {
        /// REST namespace base, e.g. https://docs.example.com/wp-json/docs-theme/v1/
        #[arg(long, env = "DOCS_NAV_REST_URL")]
        rest_url: String,

        /// Value for the X-WP-Nonce header
        #[arg(long, env = "DOCS_NAV_NONCE")]
        nonce: Option<String>,

        /// Number of pages the cache holds
        #[arg(long, default_value_t = docs_nav::core::DEFAULT_CAPACITY)]
        capacity: usize,

        /// Page ids to request, in order; repeat an id to see a cache hit
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

fn describe_layout(layout: SidebarLayout) -> &'static str {
    match layout {
        SidebarLayout::Hidden => "hidden",
        SidebarLayout::Visible { toc: true, buttons: true } => "table of contents and buttons",
        SidebarLayout::Visible { toc: true, buttons: false } => "table of contents",
        SidebarLayout::Visible { toc: false, .. } => "buttons",
    }
}

fn outline(payload: PathBuf) -> Result<(), CliError> {
    let raw = fs::read_to_string(&payload).map_err(|source| CliError::Read {
        path: payload.clone(),
        source,
    })?;
    let page: PageContent = serde_json::from_str(&raw)?;

    println!("{} (page {})", page.title, page.id);
    println!("sidebar: {}", describe_layout(page.sidebar_layout()));

    let entries = TocRenderer::entries_for(&page.title, &page.headings);
    if entries.is_empty() {
        println!("No headings found");
    }
    for entry in &entries {
        let indent = match entry.level {
            docs_nav::types::TocLevel::PageTitle => 0,
            docs_nav::types::TocLevel::Heading(level) => usize::from(level.as_u8() - 1) * 2,
        };
        println!("{:indent$}{} -> {}", "", entry.text, entry.href());
    }

    // Headings as the browser would index them from the body.
    let indexed = index_headings(&scan_headings(&page.body_html));
    if indexed != page.headings {
        warn!(
            "payload lists {} headings, body indexes to {}",
            page.headings.len(),
            indexed.len()
        );
        for (listed, found) in page.headings.iter().zip(&indexed) {
            if listed.anchor_id != found.anchor_id {
                println!("mismatch: payload #{} / body #{}", listed.anchor_id, found.anchor_id);
            }
        }
    }
    for anchor in duplicate_anchors(&indexed) {
        println!("duplicate anchor: #{anchor}");
    }
    Ok(())
}

async fn fetch(source: HttpContentSource, capacity: usize, ids: Vec<String>) -> Result<(), CliError> {
    let mut cache = PageCache::new(capacity);
    for raw in ids {
        let id = PageId::parse(&raw).ok_or_else(|| CliError::InvalidId(raw.clone()))?;
        if let Some(page) = cache.get(&id) {
            println!("{id}: cache hit ({})", page.title);
            continue;
        }

        let page = source.fetch_page(&id, &AbortHandle::new()).await?;
        println!("{id}: fetched \"{}\" ({} headings)", page.title, page.headings.len());
        if let Some(evicted) = cache.put(id, page) {
            println!("  evicted page {evicted}");
        }
    }
    info!("{} of {} pages cached", cache.len(), cache.capacity());
    Ok(())
}

fn main() -> Result<(), CliError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Commands::Outline { payload } => outline(payload),
        Commands::Fetch {
            rest_url,
            nonce,
            capacity,
            ids,
        } => {
            let mut config = NavigationConfig::default().with_rest_url(rest_url);
            config.nonce = nonce;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(CliError::Runtime)?;
            runtime.block_on(fetch(HttpContentSource::new(config), capacity, ids))
        }
    }
}
