//! Process configuration
//!
//! Every option can be given as a flag or through the environment variable named
//! next to it, which is how container deployments configure both roles.

use crate::coordinator::coordinator::CoordinatorConfig;
use crate::error::{CrackError, Result};

use clap::{Args, Parser, Subcommand};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

/// Distributed MD5 brute-force cracker
#[derive(Parser, Debug, Clone)]
#[command(name = "hash-cracker", version)]
pub struct Cli {
    /// Log verbosity (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub role: Role,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Role {
    /// Run the manager: accepts hashes, partitions work, aggregates results
    Manager(ManagerArgs),
    /// Run a worker: enumerates assigned partitions and reports matches
    Worker(WorkerArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ManagerArgs {
    /// Port of the public and internal API
    #[arg(long, env = "MAIN_SERVER_PORT", default_value_t = 8080)]
    pub main_server_port: u16,

    /// Port of the liveness probe
    #[arg(long, env = "PROBE_SERVER_PORT", default_value_t = 8081)]
    pub probe_server_port: u16,

    /// Ordered set of characters candidates are built from
    #[arg(long, env = "ALPHABET", default_value = DEFAULT_ALPHABET)]
    pub alphabet: String,

    /// Seconds after dispatch before a request with no reports is failed
    #[arg(long, env = "TTL", default_value_t = 10)]
    pub ttl: u64,

    /// Number of workers; also the number of partitions per request
    #[arg(long, env = "WORKER_COUNT", default_value_t = 3)]
    pub worker_count: usize,

    /// Comma-separated worker base URLs, one per worker
    #[arg(
        long,
        env = "WORKER_URLS",
        value_delimiter = ',',
        default_value = "http://worker1:8080,http://worker2:8080,http://worker3:8080"
    )]
    pub worker_urls: Vec<String>,

    /// SQLite ledger file, or `:memory:` for a non-durable ledger
    #[arg(long, env = "LEDGER_PATH", default_value = "./db/manager.db")]
    pub ledger_path: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct WorkerArgs {
    /// Port on which assignments are accepted
    #[arg(long, env = "MAIN_SERVER_PORT", default_value_t = 8080)]
    pub main_server_port: u16,

    /// Port of the liveness probe
    #[arg(long, env = "PROBE_SERVER_PORT", default_value_t = 8081)]
    pub probe_server_port: u16,

    /// Base URL of the manager
    #[arg(long, env = "MANAGER_URL", default_value = "http://manager:8080")]
    pub manager_url: String,

    /// Concurrent partitions; defaults to the number of CPUs
    #[arg(long, env = "CRACKER_THREADS")]
    pub cracker_threads: Option<usize>,

    /// Assignments that may wait for a free cracker before new ones are refused
    #[arg(long, env = "QUEUE_CAPACITY", default_value_t = 64)]
    pub queue_capacity: usize,
}

impl Cli {
    pub fn log_level(&self) -> Result<tracing::Level> {
        self.log_level
            .parse()
            .map_err(|_| CrackError::Validation(format!("invalid log level: {}", self.log_level)))
    }
}

impl ManagerArgs {
    pub fn is_memory_ledger(&self) -> bool {
        self.ledger_path.as_os_str() == ":memory:"
    }

    /// Checks the settings and turns them into coordinator configuration.
    pub fn coordinator_config(&self) -> Result<CoordinatorConfig> {
        if self.worker_count == 0 {
            return Err(CrackError::Validation(
                "WORKER_COUNT must be greater than zero".to_string(),
            ));
        }

        let worker_urls: Vec<String> = self
            .worker_urls
            .iter()
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
            .map(normalize_url)
            .collect();

        if worker_urls.len() != self.worker_count {
            return Err(CrackError::Validation(format!(
                "WORKER_COUNT is {} but {} worker URLs were given",
                self.worker_count,
                worker_urls.len()
            )));
        }

        validate_alphabet(&self.alphabet)?;

        if self.ttl == 0 {
            return Err(CrackError::Validation(
                "TTL must be greater than zero".to_string(),
            ));
        }

        Ok(CoordinatorConfig {
            worker_urls,
            alphabet: self.alphabet.clone(),
            ttl: Duration::from_secs(self.ttl),
        })
    }
}

impl WorkerArgs {
    pub fn threads(&self) -> usize {
        self.cracker_threads
            .filter(|&threads| threads > 0)
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
    }

    pub fn manager_url(&self) -> String {
        normalize_url(self.manager_url.trim())
    }
}

fn validate_alphabet(alphabet: &str) -> Result<()> {
    if alphabet.is_empty() {
        return Err(CrackError::Validation(
            "ALPHABET cannot be empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    if let Some(duplicate) = alphabet.chars().find(|c| !seen.insert(*c)) {
        return Err(CrackError::Validation(format!(
            "ALPHABET contains '{}' more than once",
            duplicate
        )));
    }

    Ok(())
}

/// Prefixes `http://` when no scheme is given and drops trailing slashes.
pub fn normalize_url(url: &str) -> String {
    let normalized = if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    };

    normalized.trim_end_matches('/').to_string()
}
