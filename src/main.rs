use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use blog_content_pipeline::config::Config;
use blog_content_pipeline::pagination::{LoadOutcome, Paginator};
use blog_content_pipeline::post::normalize_detail;
use blog_content_pipeline::reading_time::estimate_minutes;
use blog_content_pipeline::richtext::to_markup;
use blog_content_pipeline::store::{ContentStore, HttpContentStore, PageQuery};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(content_api_url = %config.content_api_url, "Configuration loaded");

    let store = HttpContentStore::new(&config).context("Failed to build content store client")?;
    let query = PageQuery::from_config(&config);

    match std::env::args().nth(1) {
        Some(uid) => show_post(&store, &config, &uid).await,
        None => list_posts(&store, &query).await,
    }
}

/// Load the full listing page by page, printing each post.
async fn list_posts(store: &HttpContentStore, query: &PageQuery) -> Result<()> {
    let paginator = Paginator::load_initial(store, query)
        .await
        .context("Failed to load initial listing page")?;

    loop {
        match paginator.load_next(store, query).await {
            Ok(LoadOutcome::Appended { appended }) => {
                info!(appended, "loaded another listing page");
            }
            Ok(LoadOutcome::NoMorePages | LoadOutcome::AlreadyLoading) => break,
            Err(e) => {
                // Cursor is unchanged; a retry would fetch the same page.
                error!("Failed to load next page: {e}");
                break;
            }
        }
    }

    let state = paginator.snapshot().await;
    for post in state.posts() {
        let date = post
            .published_at()
            .map_or_else(|| "draft".to_string(), |d| d.format("%d %b %Y").to_string());
        println!("{}  {}  — {} ({})", post.uid, post.title, post.author, date);
    }
    info!(total = state.posts().len(), "listing complete");

    Ok(())
}

/// Fetch one post and print its rendered body and reading-time label.
async fn show_post(store: &HttpContentStore, config: &Config, uid: &str) -> Result<()> {
    let raw = store
        .fetch_by_uid(&config.document_type, uid)
        .await
        .with_context(|| format!("Failed to fetch post '{uid}'"))?;

    let detail = normalize_detail(&raw).context("Record is malformed")?;
    let minutes = estimate_minutes(&detail.content);

    println!("# {}", detail.post.title);
    println!("by {} — {minutes} min", detail.post.author);
    if let Some(banner) = &detail.banner_url {
        println!("banner: {banner}");
    }
    println!();
    for block in &detail.content {
        if let Some(heading) = &block.heading {
            println!("{}", maud::html! { h2 { (heading) } }.into_string());
        }
        println!("{}", to_markup(&block.body));
    }

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,blog_content_pipeline=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
