use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use colored::Colorize;
use content::{ContentType, Model, ModelImage, NsfwLevel, load_content_list, read_json};
use pipeline::{FilterOptions, VisibilityPipeline};
use preferences::{FilterContext, HiddenRegistries, ViewerContext, load_filter_context};
use rand::Rng;
use service::{FileRow, HiddenPreferencesService, ModelVersionSummary, SummaryRequest, VersionRow};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

/// Visibility - hidden-preference filtering for content feeds
#[derive(Parser)]
#[command(name = "visibility")]
#[command(about = "Filter content lists against a viewer's hidden preferences", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter a content list for a viewer
    Filter {
        /// Content type of the list (models, images, articles, users, collections, bounties, posts)
        #[arg(long = "type")]
        content_type: String,

        /// JSON array of items
        #[arg(long)]
        items: PathBuf,

        /// JSON preferences document
        #[arg(long)]
        preferences: PathBuf,

        /// Reveal items the viewer hid themselves (owner and tag hiding still apply)
        #[arg(long)]
        show_hidden: bool,

        /// Return the list unfiltered
        #[arg(long)]
        disabled: bool,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Build the model-version summary payload
    Summary {
        /// JSON model-version row
        #[arg(long)]
        version: PathBuf,

        /// JSON array of the version's files
        #[arg(long)]
        files: PathBuf,

        /// Request as a moderator
        #[arg(long)]
        moderator: bool,

        /// Host header of the request
        #[arg(long)]
        host: Option<String>,

        /// Base URL for download links
        #[arg(long, default_value = "https://civitai.com")]
        base_url: String,
    },

    /// Run benchmark to test filter performance
    Benchmark {
        /// Number of models per feed
        #[arg(long, default_value = "1000")]
        items: usize,

        /// Number of filter runs
        #[arg(long, default_value = "100")]
        iterations: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Filter {
            content_type,
            items,
            preferences,
            show_hidden,
            disabled,
            pretty,
        } => {
            let content_type: ContentType = content_type.parse()?;
            let options = FilterOptions {
                show_hidden,
                disabled,
            };
            handle_filter(content_type, items, preferences, options, pretty).await?
        }
        Commands::Summary {
            version,
            files,
            moderator,
            host,
            base_url,
        } => handle_summary(version, files, moderator, host, base_url)?,
        Commands::Benchmark { items, iterations } => handle_benchmark(items, iterations)?,
    }

    Ok(())
}

/// Handle the 'filter' command
async fn handle_filter(
    content_type: ContentType,
    items_path: PathBuf,
    preferences_path: PathBuf,
    options: FilterOptions,
    pretty: bool,
) -> Result<()> {
    let start = Instant::now();
    let (items, context) = rayon::join(
        || load_content_list(content_type, &items_path),
        || load_filter_context(&preferences_path),
    );
    let items = items.with_context(|| format!("Failed to load {}", items_path.display()))?;
    let context = context
        .with_context(|| format!("Failed to load {}", preferences_path.display()))?;
    eprintln!(
        "{} Loaded {} {} in {:?}",
        "✓".green(),
        items.len(),
        content_type,
        start.elapsed()
    );

    let service = HiddenPreferencesService::new(context.viewer);
    service.load(context.registries).await;
    let outcome = service.apply(content_type, Some(items), options).await?;

    let json = if pretty {
        serde_json::to_string_pretty(&outcome.items)?
    } else {
        serde_json::to_string(&outcome.items)?
    };
    println!("{}", json);

    eprintln!(
        "{} {} visible, {} hidden",
        content_type.to_string().bold().blue(),
        outcome.items.len().to_string().green(),
        outcome.hidden_count.to_string().red()
    );
    Ok(())
}

/// Handle the 'summary' command
fn handle_summary(
    version_path: PathBuf,
    files_path: PathBuf,
    moderator: bool,
    host: Option<String>,
    base_url: String,
) -> Result<()> {
    let version: VersionRow = read_json(&version_path)
        .with_context(|| format!("Failed to load {}", version_path.display()))?;
    let files: Vec<FileRow> = read_json(&files_path)
        .with_context(|| format!("Failed to load {}", files_path.display()))?;

    let mut request = SummaryRequest::new(version.id, base_url);
    request.is_moderator = moderator;
    request.host = host;

    match ModelVersionSummary::build(&request, Some(&version), &files) {
        Ok(summary) => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        Err(err) => {
            println!("{}", err.to_body());
            Err(anyhow!("{} ({})", err, err.status_code()))
        }
    }
}

/// Handle the 'benchmark' command
fn handle_benchmark(items: usize, iterations: usize) -> Result<()> {
    if iterations == 0 {
        return Err(anyhow!("iterations must be at least 1"));
    }

    info!("Benchmarking {} iterations over {} models", iterations, items);
    let mut rng = rand::rng();
    let context = random_context(&mut rng, items);
    let pipeline = VisibilityPipeline::standard();

    let mut timings: Vec<Duration> = Vec::with_capacity(iterations);
    let mut hidden = 0;
    for _ in 0..iterations {
        let feed = random_models(&mut rng, items);
        let start = Instant::now();
        let outcome = pipeline.apply(
            ContentType::Models,
            Some(feed),
            &context,
            FilterOptions::default(),
        )?;
        timings.push(start.elapsed());
        hidden += outcome.hidden_count;
    }

    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f64| timings[((timings.len() - 1) as f64 * p) as usize];

    println!("{}", "Benchmark results:".bold().blue());
    println!("Items per feed: {}", items);
    println!("Average hidden per feed: {:.1}", hidden as f64 / iterations as f64);
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!(
        "Throughput: {:.0} items/second",
        (items * iterations) as f64 / total_time.as_secs_f64()
    );

    Ok(())
}

fn random_level(rng: &mut impl Rng) -> NsfwLevel {
    NsfwLevel::from_bits_retain(1 << rng.random_range(0..5))
}

/// Hide roughly 5% of the id space in every registry.
fn random_context(rng: &mut impl Rng, items: usize) -> FilterContext {
    let space = (items as u32).max(20);
    let mut registries = HiddenRegistries::new();
    for _ in 0..space / 20 {
        registries.hidden_users.hide(rng.random_range(1..=space));
        registries.hidden_models.hide(rng.random_range(1..=space));
        registries.hidden_images.hide(rng.random_range(1..=space * 4));
        registries.hidden_tags.hide(rng.random_range(1..=200));
    }
    let viewer = ViewerContext::new(1, NsfwLevel::PG | NsfwLevel::PG13);
    FilterContext::new(registries, viewer)
}

fn random_models(rng: &mut impl Rng, items: usize) -> content::ContentList {
    let space = (items as u32).max(20);
    let models = (1..=items as u32)
        .map(|id| {
            let images: Vec<ModelImage> = (0..rng.random_range(1..=4u32))
                .map(|n| {
                    ModelImage::new(id * 4 + n, random_level(rng))
                        .with_tags([rng.random_range(1..=200)])
                })
                .collect();
            Model::new(id, rng.random_range(1..=space), random_level(rng))
                .with_tags([rng.random_range(1..=200), rng.random_range(1..=200)])
                .with_images(images)
        })
        .collect();
    content::ContentList::Models(models)
}
