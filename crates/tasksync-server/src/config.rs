use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use tasksync_db::DbConfig;

#[derive(Debug, Parser)]
#[command(name = "tasksync-server", about = "Task persistence server")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "TASKSYNC_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(long, env = "TASKSYNC_PORT", default_value = "5000")]
    pub port: u16,

    /// SQLite database file (defaults to the XDG data dir)
    #[arg(long, env = "TASKSYNC_DB_PATH")]
    pub db_path: Option<String>,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            sqlite_path: self.db_path.clone(),
        }
    }
}
