use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use reelmatch_core::{Catalog, VectorizerOptions, Weights, DEFAULT_TOP_N};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "reelmatch")]
#[command(about = "Inspect a title catalog and its similarity index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CatalogArgs {
    /// Catalog CSV file
    #[arg(long)]
    input: PathBuf,
    /// Stem terms before indexing
    #[arg(long, default_value_t = false)]
    stem: bool,
    /// Use 1 + ln(tf) term frequencies
    #[arg(long, default_value_t = false)]
    sublinear_tf: bool,
    /// Use unsmoothed IDF = ln(N/df) + 1
    #[arg(long, default_value_t = false)]
    no_smooth_idf: bool,
}

impl CatalogArgs {
    fn load(&self) -> Result<Catalog> {
        let options = VectorizerOptions {
            stem: self.stem,
            sublinear_tf: self.sublinear_tf,
            smooth_idf: !self.no_smooth_idf,
        };
        Catalog::load(&self.input, options)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Item count and per-field vocabulary sizes
    Stats {
        #[command(flatten)]
        catalog: CatalogArgs,
    },
    /// Rank titles similar to one title
    Recommend {
        #[command(flatten)]
        catalog: CatalogArgs,
        #[arg(long)]
        title: String,
        #[arg(long, default_value_t = 1.0)]
        genre_weight: f32,
        #[arg(long, default_value_t = 1.0)]
        desc_weight: f32,
        #[arg(long, default_value_t = 1.0)]
        director_weight: f32,
        #[arg(long, default_value_t = 1.0)]
        cast_weight: f32,
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,
    },
    /// Highest-weighted description terms of a title
    TopTerms {
        #[command(flatten)]
        catalog: CatalogArgs,
        #[arg(long)]
        title: String,
    },
    /// Corpus counts for a title's own genres
    Genres {
        #[command(flatten)]
        catalog: CatalogArgs,
        #[arg(long)]
        title: String,
    },
}

#[derive(Serialize)]
struct Hit<'a> {
    title: &'a str,
    listed_in: &'a str,
    similarity: f64,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { catalog } => print(&catalog.load()?.stats()),
        Commands::Recommend { catalog, title, genre_weight, desc_weight, director_weight, cast_weight, top_n } => {
            let catalog = catalog.load()?;
            let weights = Weights::new(genre_weight, desc_weight, director_weight, cast_weight);
            let recs = catalog.recommend(&title, &weights, top_n)?;
            if recs.is_empty() {
                tracing::warn!(title = %title, "no recommendations");
            }
            let hits: Vec<Hit> = recs
                .iter()
                .map(|r| Hit { title: &r.item.title, listed_in: &r.item.listed_in, similarity: r.similarity })
                .collect();
            print(&hits)
        }
        Commands::TopTerms { catalog, title } => print(&catalog.load()?.top_terms(&title)?),
        Commands::Genres { catalog, title } => print(&catalog.load()?.genre_distribution(&title)?),
    }
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
