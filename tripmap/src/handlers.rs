use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tripmap_core::builder::{DEFAULT_CONCURRENCY, Feature, ProgressCallback};
use tripmap_core::kml::save_kml;
use tripmap_core::report::{gather_report_data, generate_build_report, write_json_report};
use tripmap_core::{BuildStats, Document, LinkCache, Link, MapContent, MapMaker};
use tripmap_resolver::{CachedResolver, HttpResolver, MemoryStore, Resolve};

/// Expand `~` and environment variables in a user supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(raw).as_ref()),
    }
}

pub fn default_output_path(document: &Path) -> PathBuf {
    document.with_extension("kml")
}

/// Name of the KML document, taken from the input file name.
pub fn document_title(document: &Path) -> String {
    document
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "tripmap".to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    pub document: PathBuf,
    pub output: PathBuf,
    /// `None` keeps resolutions in memory for this run only
    pub cache_dir: Option<PathBuf>,
    pub concurrency: usize,
    pub timeout_secs: u64,
    pub report: Option<PathBuf>,
    pub quiet: bool,
}

impl BuildOptions {
    pub fn from_matches(args: &ArgMatches, quiet: bool) -> Result<Self> {
        let document = args
            .get_one::<PathBuf>("DOCUMENT")
            .context("missing DOCUMENT argument")?;
        let document = expand_path(&document.to_string_lossy());

        let output = match args.get_one::<PathBuf>("out") {
            Some(out) => expand_path(&out.to_string_lossy()),
            None => default_output_path(&document),
        };

        let cache_dir = if args.get_flag("no-cache") {
            None
        } else {
            args.get_one::<String>("cache").map(|dir| expand_path(dir))
        };

        Ok(Self {
            document,
            output,
            cache_dir,
            concurrency: args
                .get_one::<usize>("concurrency")
                .copied()
                .unwrap_or(DEFAULT_CONCURRENCY),
            timeout_secs: args.get_one::<u64>("timeout").copied().unwrap_or(10),
            report: args
                .get_one::<PathBuf>("report")
                .map(|path| expand_path(&path.to_string_lossy())),
            quiet,
        })
    }
}

fn spinner(quiet: bool) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

async fn make_map<R: Resolve>(
    resolver: R,
    document: &Document,
    options: &BuildOptions,
    progress: ProgressCallback,
) -> (MapContent, BuildStats, R) {
    let maker = MapMaker::new(resolver)
        .with_concurrency(options.concurrency)
        .with_progress_callback(progress);
    let (content, stats) = maker.build(document).await;
    (content, stats, maker.into_resolver())
}

/// Read the document, build the map and write every requested output.
pub async fn run_build(options: &BuildOptions) -> Result<(MapContent, BuildStats)> {
    let document = Document::open(&options.document)
        .with_context(|| format!("Failed to read {}", options.document.display()))?;
    let http = HttpResolver::with_timeout(options.timeout_secs).context("Failed to set up HTTP client")?;

    let spinner = spinner(options.quiet)?;
    spinner.set_message(format!("Reading links from {}", options.document.display()));
    let progress_bar = spinner.clone();
    let progress: ProgressCallback = Arc::new(move |link: &Link| {
        let label = if link.text.trim().is_empty() {
            link.address.as_str()
        } else {
            link.text.trim()
        };
        progress_bar.set_message(format!("Looking up {}", label));
    });

    let (content, stats) = match &options.cache_dir {
        Some(dir) => {
            let cache = LinkCache::open(dir)
                .with_context(|| format!("Failed to open link cache in {}", dir.display()))?;
            let resolver = CachedResolver::new(http, cache);
            let (content, stats, resolver) = make_map(resolver, &document, options, progress).await;
            resolver
                .into_store()
                .close()
                .context("Failed to close link cache")?;
            (content, stats)
        }
        None => {
            let resolver = CachedResolver::new(http, MemoryStore::new());
            let (content, stats, _) = make_map(resolver, &document, options, progress).await;
            (content, stats)
        }
    };
    spinner.finish_and_clear();

    save_kml(&content, &document_title(&options.document), &options.output)
        .with_context(|| format!("Failed to write {}", options.output.display()))?;

    if let Some(report_path) = &options.report {
        let data = gather_report_data(&options.document.to_string_lossy(), &content, &stats);
        write_json_report(&data, report_path)
            .with_context(|| format!("Failed to write report {}", report_path.display()))?;
    }

    Ok((content, stats))
}

pub async fn handle_build(args: &ArgMatches, quiet: bool) -> Result<()> {
    let options = BuildOptions::from_matches(args, quiet)?;
    let (content, stats) = run_build(&options).await?;

    if !quiet {
        print!("{}", generate_build_report(&content, &stats));
        println!(
            "\n{} Wrote {} points and {} routes to {}",
            "✓".green().bold(),
            stats.points,
            stats.lines,
            options.output.display().to_string().bold()
        );
        if stats.failed > 0 {
            println!(
                "{} {} links could not be used, see the warnings above",
                "⚠".yellow().bold(),
                stats.failed
            );
        }
        if let Some(report) = &options.report {
            println!("{} Report saved to {}", "✓".green().bold(), report.display());
        }
    }
    Ok(())
}

/// Decode one URL, following it first if it is a short link.
pub async fn decode_url<R: Resolve>(resolver: R, url: &str) -> Result<Feature> {
    let link = Link {
        address: url.to_string(),
        text: String::new(),
        headings: Vec::new(),
    };
    let feature = MapMaker::new(resolver)
        .process_link(&link)
        .await
        .with_context(|| format!("Could not decode {}", url))?;
    Ok(feature)
}

pub async fn handle_decode(args: &ArgMatches) -> Result<()> {
    let Some(url) = args.get_one::<String>("URL") else {
        bail!("missing URL argument");
    };
    let timeout = args.get_one::<u64>("timeout").copied().unwrap_or(10);
    let resolver = HttpResolver::with_timeout(timeout).context("Failed to set up HTTP client")?;

    match decode_url(resolver, url).await? {
        Feature::Point(point) => {
            let name = if point.name().is_empty() { "(unnamed place)" } else { point.name() };
            println!("{} {}", "Place".cyan().bold(), name);
            println!("  lat {}  lon {}", point.coordinate().lat(), point.coordinate().lon());
        }
        Feature::Line(line) => {
            println!("{} with {} stops", "Route".cyan().bold(), line.coordinates().len());
            for (i, stop) in line.coordinates().iter().enumerate() {
                println!("  {}. lat {}  lon {}", i + 1, stop.lat(), stop.lon());
            }
        }
    }
    Ok(())
}

fn open_cache(args: &ArgMatches) -> Result<LinkCache> {
    let dir = args
        .get_one::<String>("cache")
        .map(|dir| expand_path(dir))
        .context("missing --cache argument")?;
    LinkCache::open(&dir).with_context(|| format!("Failed to open link cache in {}", dir.display()))
}

pub fn handle_cache_stats(args: &ArgMatches) -> Result<()> {
    let cache = open_cache(args)?;
    let entries = cache.len()?;
    println!("{} {}", "Cache:".bold(), cache.path().display());
    println!("{} {}", "Links:".bold(), entries);
    cache.close()?;
    Ok(())
}

pub fn handle_cache_clear(args: &ArgMatches) -> Result<()> {
    let cache = open_cache(args)?;
    let removed = cache.clear()?;
    println!(
        "{} Removed {} cached links from {}",
        "✓".green().bold(),
        removed,
        cache.path().display()
    );
    cache.close()?;
    Ok(())
}
