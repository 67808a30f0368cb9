use anyhow::Result;
use axum::Router;
use clap::Parser;
use reelmatch_core::{VectorizerOptions, Weights};
use reelmatch_server::{build_app, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Catalog CSV file
    #[arg(long, default_value = "./netflix_titles.csv")]
    catalog: PathBuf,
    /// Host to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 5000)]
    port: u16,
    /// Default genre weight when a request omits genreWeight
    #[arg(long, default_value_t = 1.0)]
    genre_weight: f32,
    #[arg(long, default_value_t = 1.0)]
    desc_weight: f32,
    #[arg(long, default_value_t = 1.0)]
    director_weight: f32,
    #[arg(long, default_value_t = 1.0)]
    cast_weight: f32,
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

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let default_weights = Weights::new(args.genre_weight, args.desc_weight, args.director_weight, args.cast_weight);
    // Reject a bad default set at startup rather than on every request.
    default_weights.normalized()?;

    let config = ServerConfig {
        catalog_path: args.catalog,
        default_weights,
        vectorizer: VectorizerOptions {
            stem: args.stem,
            sublinear_tf: args.sublinear_tf,
            smooth_idf: !args.no_smooth_idf,
        },
    };
    let app: Router = build_app(&config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
