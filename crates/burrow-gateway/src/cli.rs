use burrow_telemetry::LogFormat;
use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::time::Duration;

pub const LISTEN_ADDR_ENV: &str = "BURROW_LISTEN_ADDR";
pub const BASE_URL_ENV: &str = "BURROW_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "BURROW_STORAGE_BACKEND";
pub const SQLITE_URL_ENV: &str = "BURROW_SQLITE_URL";
pub const CODE_LENGTH_ENV: &str = "BURROW_CODE_LENGTH";
pub const MAX_ATTEMPTS_ENV: &str = "BURROW_MAX_ATTEMPTS";
pub const STORE_TIMEOUT_ENV: &str = "BURROW_STORE_TIMEOUT_MS";
pub const CACHE_CAPACITY_ENV: &str = "BURROW_CACHE_CAPACITY";
pub const CACHE_IDLE_ENV: &str = "BURROW_CACHE_IDLE_SECS";
pub const LOG_FORMAT_ENV: &str = "BURROW_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_SQLITE_URL: &str = "sqlite://burrow.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "sqlite")]
    Sqlite,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Sqlite => write!(f, "sqlite"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "burrow-gateway", about = "HTTP front end for the burrow URL shortener")]
pub struct Cli {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Public origin that short URLs are built on.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Sqlite
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = SQLITE_URL_ENV, default_value = DEFAULT_SQLITE_URL)]
    pub sqlite_url: String,

    #[arg(
        long,
        env = CODE_LENGTH_ENV,
        default_value_t = 6,
        value_parser = clap::value_parser!(u8).range(4..=16)
    )]
    pub code_length: u8,

    /// Candidate codes tried per allocation before giving up.
    #[arg(
        long,
        env = MAX_ATTEMPTS_ENV,
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_attempts: u32,

    #[arg(long, env = STORE_TIMEOUT_ENV, default_value_t = 2000)]
    pub store_timeout_ms: u64,

    #[arg(long, env = CACHE_CAPACITY_ENV, default_value_t = 10_000)]
    pub cache_capacity: u64,

    /// Evict cached codes nobody has resolved for this many seconds.
    #[arg(long, env = CACHE_IDLE_ENV)]
    pub cache_idle_secs: Option<u64>,

    /// `pretty` or `json`.
    #[arg(long, env = LOG_FORMAT_ENV, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Cli {
    pub fn code_length(&self) -> usize {
        usize::from(self.code_length)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn cache_idle(&self) -> Option<Duration> {
        self.cache_idle_secs.map(Duration::from_secs)
    }
}
