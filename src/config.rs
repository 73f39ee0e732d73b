// config.rs
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "ephemeral-chat", version, about = "Ephemeral chat synchronization server")]
pub struct Config {
    /// Address to bind the HTTP/WebSocket server on
    #[arg(long, default_value = "127.0.0.1:3030")]
    pub listen: SocketAddr,

    /// Seconds a poll-mode user stays active without a heartbeat
    #[arg(long, default_value_t = 10)]
    pub presence_ttl_secs: u64,

    /// Omit the requesting user from its own active-users response
    #[arg(long)]
    pub exclude_self: bool,

    /// Directory of front-end files served at the root
    #[arg(long, default_value = "static")]
    pub static_dir: PathBuf,
}

impl Config {
    pub fn presence_ttl(&self) -> Duration {
        Duration::from_secs(self.presence_ttl_secs)
    }
}
