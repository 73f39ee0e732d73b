// ============================================
// main.rs
// ============================================
mod config;
mod error;
mod http;
mod message;
mod presence;
mod protocol;
mod service;
mod store;
mod websocket;

use clap::Parser;
use warp::Filter;

use config::Config;
use service::ChatService;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::parse();

    let service = ChatService::new(config.presence_ttl(), config.exclude_self);

    let routes = http::api(service.clone())
        .or(websocket::route(service))
        .or(warp::fs::dir(config.static_dir.clone()));

    log::info!(
        "listening on {} (presence ttl {}s, static dir {})",
        config.listen,
        config.presence_ttl_secs,
        config.static_dir.display()
    );
    warp::serve(routes).run(config.listen).await;
}
