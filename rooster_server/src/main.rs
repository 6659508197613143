//! HTTP service exposing weekly lesson schedules built from a feed.
//!
//! The feed address is given per request in the `url` query parameter.

use std::net::SocketAddr;

use anyhow::Result;
use axum::{routing::get, Router};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use tower_http::cors::CorsLayer;

mod route;

#[derive(Debug, Parser)]
struct Arguments {
    /// the address to listen on
    #[arg(long, env = "ROOSTER_ADDR", default_value = "0.0.0.0:8008")]
    addr: SocketAddr,
    /// the log level
    #[arg(long, env = "ROOSTER_LOG", default_value = "info")]
    log_level: LevelFilter,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Arguments::parse();
    TermLogger::init(
        args.log_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    let app = Router::new()
        .route("/proxy", get(route::proxy::handler))
        .route("/schedule", get(route::schedule::handler))
        .route("/calendar/week", get(route::calendar::handler))
        .layer(CorsLayer::permissive());
    info!("listening on {}", args.addr);
    axum::Server::bind(&args.addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
