use anyhow::{Context, Result, anyhow};
use catalog::{ExtractedMovie, MovieId, extract_movie, parse_release_year};
use clap::{Parser, Subcommand};
use colored::Colorize;
use pipeline::{Ranker, RankingConfig, RankingJob, Recommendation};
use server::{RecommendationOrchestrator, ServiceConfig};
use sources::{CandidateGatherer, DynMovieProvider, SnapshotProvider, TmdbProvider, is_released};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// reel-match - "More like this" movie similarity ranking
#[derive(Parser)]
#[command(name = "reel-match")]
#[command(about = "Rank movies similar to a reference film", long_about = None)]
struct Cli {
    /// Offline catalog snapshot (JSON); TMDB is used when omitted
    #[arg(short, long, global = true)]
    snapshot: Option<PathBuf>,

    /// JSON file overriding ranking weights and thresholds
    #[arg(long, global = true)]
    ranking_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get similar movies for a reference movie
    Recommend {
        /// TMDB id of the reference movie
        #[arg(long)]
        movie_id: MovieId,

        /// Maximum number of results (default: ranking config)
        #[arg(long)]
        limit: Option<usize>,

        /// Show match reason and director for each result
        #[arg(long)]
        explain: bool,
    },

    /// Search for movies by title
    Search {
        /// Title to search for
        #[arg(long)]
        title: String,
    },

    /// Run the HTTP API (bind address and CORS origin from the environment)
    Serve,

    /// Rank every snapshot movie against its own candidate lists
    Batch {
        /// Number of reference movies to show in the summary
        #[arg(long, default_value = "10")]
        show: usize,
    },

    /// Run benchmark to test ranking latency
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ServiceConfig::from_env()?;

    let ranking_path = cli.ranking_config.clone().or_else(|| config.ranking_config.clone());
    let ranking = match ranking_path {
        Some(path) => RankingConfig::from_json_file(&path)?,
        None => RankingConfig::default(),
    };

    let snapshot = match &cli.snapshot {
        Some(path) => {
            let start = Instant::now();
            info!("Loading snapshot from {}", path.display());
            let provider = SnapshotProvider::load_from_file(path)
                .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
            println!(
                "{} Loaded {} movies from {} in {:?}",
                "✓".green(),
                provider.snapshot().len(),
                path.display(),
                start.elapsed()
            );
            Some(provider)
        }
        None => None,
    };

    let provider: DynMovieProvider = match &snapshot {
        Some(provider) => Arc::new(provider.clone()),
        None => Arc::new(TmdbProvider::new(
            config.tmdb_base_url.clone(),
            config.tmdb_access_token.clone(),
            config.tmdb_api_key.clone(),
        )),
    };

    match cli.command {
        Commands::Recommend {
            movie_id,
            limit,
            explain,
        } => {
            let ranking = match limit {
                Some(limit) => ranking.with_max_results(limit),
                None => ranking,
            };
            let orchestrator = orchestrator(provider, ranking, &config);
            handle_recommend(orchestrator, movie_id, explain).await?
        }
        Commands::Search { title } => handle_search(provider, title).await?,
        Commands::Serve => {
            let orchestrator = orchestrator(provider, ranking, &config);
            server::serve(orchestrator, &config.api_bind, &config.cors_origin).await?
        }
        Commands::Batch { show } => {
            let snapshot = snapshot.ok_or_else(|| anyhow!("batch requires --snapshot"))?;
            handle_batch(snapshot, ranking, &config, show).await?
        }
        Commands::Benchmark { requests } => {
            let snapshot = snapshot.ok_or_else(|| anyhow!("benchmark requires --snapshot"))?;
            let orchestrator = orchestrator(provider, ranking, &config);
            handle_benchmark(snapshot, orchestrator, requests).await?
        }
    }

    Ok(())
}

fn orchestrator(
    provider: DynMovieProvider,
    ranking: RankingConfig,
    config: &ServiceConfig,
) -> RecommendationOrchestrator {
    RecommendationOrchestrator::new(provider, ranking)
        .with_max_candidates(config.max_candidates)
        .with_filmography_limit(config.director_filmography_limit)
}

/// Handle the 'recommend' command
async fn handle_recommend(
    orchestrator: RecommendationOrchestrator,
    movie_id: MovieId,
    explain: bool,
) -> Result<()> {
    let set = orchestrator
        .recommend(movie_id)
        .await
        .with_context(|| format!("Failed to rank movies similar to {movie_id}"))?;

    println!(
        "{}",
        format!("More like {} ({}):", set.base_movie.title, set.base_movie.id)
            .bold()
            .blue()
    );
    if set.results.is_empty() {
        println!("  {}", "No sufficiently similar movies found".yellow());
        return Ok(());
    }
    print_recommendations(&set.results, explain);
    Ok(())
}

/// Handle the 'search' command
async fn handle_search(provider: DynMovieProvider, title: String) -> Result<()> {
    let query = title.trim();
    if query.is_empty() {
        return Err(anyhow!("Search title must not be blank"));
    }

    let matches = provider
        .search_movies(query)
        .await
        .with_context(|| format!("Search for '{query}' failed"))?;

    println!("{}", format!("Search results for '{}':", query).bold().blue());
    for movie in matches.iter().take(20) {
        println!(
            "{}: {} ({}) avg {:.1} ({} votes)",
            movie.id.to_string().green(),
            movie.title,
            year_label(movie.release_date.as_deref()),
            movie.vote_average,
            movie.vote_count
        );
    }
    Ok(())
}

/// Handle the 'batch' command
async fn handle_batch(
    snapshot: SnapshotProvider,
    ranking: RankingConfig,
    config: &ServiceConfig,
    show: usize,
) -> Result<()> {
    let catalog = snapshot.snapshot().clone();
    let gatherer = CandidateGatherer::new(Arc::new(snapshot))
        .with_max_candidates(config.max_candidates)
        .with_filmography_limit(config.director_filmography_limit);

    let today = chrono::Utc::now().date_naive();
    let start = Instant::now();
    let mut jobs = Vec::with_capacity(catalog.len());
    for &movie_id in catalog.movie_ids() {
        let base = catalog.require_movie(movie_id)?;
        let summaries = gatherer.gather(base).await?;
        let candidates: Vec<ExtractedMovie> = summaries
            .iter()
            .filter_map(|summary| catalog.get_movie(summary.id))
            .filter(|movie| is_released(movie, today))
            .map(extract_movie)
            .collect();
        jobs.push(RankingJob {
            reference: extract_movie(base),
            candidates,
        });
    }
    let gathered_in = start.elapsed();
    info!("Gathered candidates for {} reference movies in {:?}", jobs.len(), gathered_in);

    let ranker = Ranker::new(ranking);
    let start = Instant::now();
    let outcomes = tokio::task::spawn_blocking(move || ranker.rank_batch(&jobs))
        .await
        .context("Batch ranking task failed")?;
    let ranked_in = start.elapsed();

    let with_results = outcomes.iter().filter(|o| !o.results.is_empty()).count();
    let total_results: usize = outcomes.iter().map(|o| o.results.len()).sum();
    let total_candidates: usize = outcomes.iter().map(|o| o.candidate_count).sum();

    println!("{}", "Batch ranking summary:".bold().blue());
    println!("  References:       {}", outcomes.len());
    println!("  Candidates:       {}", total_candidates);
    println!("  With results:     {}", with_results);
    println!("  Total results:    {}", total_results);
    println!("  Gathered in:      {:?}", gathered_in);
    println!("  Ranked in:        {:?}", ranked_in);

    for outcome in outcomes.iter().take(show) {
        let title = catalog
            .get_movie(outcome.reference_id)
            .map(|movie| movie.title.as_str())
            .unwrap_or("?");
        let top = outcome
            .results
            .first()
            .map(|rec| format!("{} ({:.1}%)", rec.title, rec.similarity_score))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {} {}: {} results, top {}",
            outcome.reference_id.to_string().green(),
            title,
            outcome.results.len(),
            top
        );
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    snapshot: SnapshotProvider,
    orchestrator: RecommendationOrchestrator,
    requests: usize,
) -> Result<()> {
    let movie_ids = snapshot.snapshot().movie_ids().to_vec();
    if movie_ids.is_empty() || requests == 0 {
        return Err(anyhow!("benchmark needs a non-empty snapshot and at least one request"));
    }

    let reference_ids: Vec<MovieId> = (0..requests)
        .map(|_| movie_ids[rand::random_range(0..movie_ids.len())])
        .collect();

    info!("Running {} benchmark requests over {} movies", requests, movie_ids.len());
    let wall = Instant::now();
    let mut handles = Vec::with_capacity(requests);
    for movie_id in reference_ids {
        let orchestrator = orchestrator.clone();
        handles.push(tokio::spawn(async move {
            let start = Instant::now();
            orchestrator.recommend(movie_id).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    let mut timings = Vec::with_capacity(requests);
    for handle in handles {
        timings.push(handle.await??);
    }
    let total_time = wall.elapsed();
    info!("Benchmark finished in {:?}", total_time);

    timings.sort();
    let sum: Duration = timings.iter().sum();
    let avg_latency = sum / timings.len() as u32;
    let throughput = requests as f64 / total_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {}", requests);
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(&timings, 0.50));
    println!("P95 latency: {:?}", percentile(&timings, 0.95));
    println!("P99 latency: {:?}", percentile(&timings, 0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Nearest-rank percentile over sorted, non-empty timings
fn percentile(sorted: &[Duration], p: f64) -> Duration {
    let index = ((sorted.len() as f64 * p) as usize).min(sorted.len() - 1);
    sorted[index]
}

fn year_label(release_date: Option<&str>) -> String {
    release_date
        .and_then(parse_release_year)
        .map(|year| year.to_string())
        .unwrap_or_else(|| "n/a".to_string())
}

/// Helper function to format and print recommendations
fn print_recommendations(recommendations: &[Recommendation], explain: bool) {
    for (index, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} ({}) - {:.1}% similar",
            (index + 1).to_string().green(),
            rec.title,
            year_label(rec.release_date.as_deref()),
            rec.similarity_score
        );
        if explain {
            println!("   Why: {}", rec.match_reason.cyan());
            match rec.director_id {
                Some(director) => println!("   Director id: {}", director),
                None => println!("   Director id: unknown"),
            }
        }
    }
}
