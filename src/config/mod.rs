//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.

pub mod cli;
pub mod toml;
pub mod validator;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Complete run configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Input text file (read by the coordinator only)
    #[serde(default)]
    pub input: Option<PathBuf>,
    #[serde(default)]
    pub counter: CounterConfig,
    #[serde(default)]
    pub cluster: ClusterConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Local parallel counter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterConfig {
    /// Counter threads per participant (1-1024)
    #[serde(default = "default_threads")]
    pub threads: usize,
}

fn default_threads() -> usize {
    num_cpus::get()
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
        }
    }
}

/// Participant layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Execution mode
    #[serde(default)]
    pub mode: ExecutionMode,
    /// Number of participants in standalone mode
    #[serde(default = "default_participants")]
    pub participants: usize,
    /// Participant addresses in index order (coordinator mode)
    #[serde(default)]
    pub hosts: Vec<String>,
    /// Port appended to hosts given without one
    #[serde(default = "default_port")]
    pub worker_port: u16,
    /// Port the participant service listens on (service mode)
    #[serde(default = "default_port")]
    pub listen_port: u16,
}

fn default_participants() -> usize {
    1
}

fn default_port() -> u16 {
    9999
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::default(),
            participants: default_participants(),
            hosts: Vec::new(),
            worker_port: default_port(),
            listen_port: default_port(),
        }
    }
}

impl ClusterConfig {
    /// Participant addresses with the worker port filled in where missing
    ///
    /// `node_addresses()[k]` is participant `k + 1`. Bare IPv6 literals are
    /// bracketed before the port is added.
    pub fn node_addresses(&self) -> Vec<String> {
        self.hosts
            .iter()
            .map(|host| with_port(host, self.worker_port))
            .collect()
    }
}

fn with_port(host: &str, port: u16) -> String {
    if let Some(rest) = host.strip_prefix('[') {
        // `[v6]:port` is complete, `[v6]` still needs the port
        return if rest.ends_with(']') {
            format!("{}:{}", host, port)
        } else {
            host.to_string()
        };
    }

    match host.rsplit_once(':') {
        None => format!("{}:{}", host, port),
        Some((name, _)) if name.contains(':') => format!("[{}]:{}", host, port),
        Some((_, explicit)) if explicit.parse::<u16>().is_ok() => host.to_string(),
        Some(_) => format!("{}:{}", host, port),
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Table order
    #[serde(default)]
    pub sort: SortOrder,
    /// Print only the first N entries
    #[serde(default)]
    pub top: Option<usize>,
    /// JSON report path
    #[serde(default)]
    pub json_output: Option<PathBuf>,
    /// Print the per-participant summary
    #[serde(default)]
    pub show_participants: bool,
}

/// Execution mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Standalone mode (default) - all participants in this process
    #[default]
    Standalone,
    /// Coordinator mode - participant 0 of a distributed run
    Coordinator,
    /// Service mode - serve runs for a remote coordinator
    Service,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Standalone => write!(f, "standalone"),
            ExecutionMode::Coordinator => write!(f, "coordinator"),
            ExecutionMode::Service => write!(f, "service"),
        }
    }
}

/// Order of the printed table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending by word
    #[default]
    Word,
    /// Descending by count, ties by word
    Count,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Word => write!(f, "word"),
            SortOrder::Count => write!(f, "count"),
        }
    }
}

/// Split a comma-separated host list
pub fn parse_host_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a clients file: one host per line, `#` starts a comment line
pub fn parse_clients_file(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.input.is_none());
        assert!(config.counter.threads >= 1);
        assert_eq!(config.cluster.participants, 1);
        assert_eq!(config.cluster.mode, ExecutionMode::Standalone);
        assert_eq!(config.cluster.worker_port, 9999);
        assert_eq!(config.output.sort, SortOrder::Word);
        assert!(config.output.top.is_none());
    }

    #[test]
    fn test_node_addresses_fill_port() {
        let cluster = ClusterConfig {
            hosts: vec!["10.0.1.10".to_string(), "10.0.1.11:7000".to_string()],
            worker_port: 8000,
            ..ClusterConfig::default()
        };
        assert_eq!(cluster.node_addresses(), vec!["10.0.1.10:8000", "10.0.1.11:7000"]);
    }

    #[test]
    fn test_node_addresses_ipv6() {
        let cluster = ClusterConfig {
            hosts: vec![
                "::1".to_string(),
                "fe80::2".to_string(),
                "[::1]".to_string(),
                "[::1]:7000".to_string(),
            ],
            worker_port: 8000,
            ..ClusterConfig::default()
        };
        assert_eq!(
            cluster.node_addresses(),
            vec!["[::1]:8000", "[fe80::2]:8000", "[::1]:8000", "[::1]:7000"]
        );
        for address in cluster.node_addresses() {
            assert!(address.parse::<std::net::SocketAddr>().is_ok(), "{}", address);
        }
    }

    #[test]
    fn test_parse_host_list() {
        assert_eq!(parse_host_list("a, b:1,,c "), vec!["a", "b:1", "c"]);
        assert!(parse_host_list("").is_empty());
    }

    #[test]
    fn test_parse_clients_file() {
        let content = "# cluster\nnode-a\n\n  node-b:9000  \n# node-c\n";
        assert_eq!(parse_clients_file(content), vec!["node-a", "node-b:9000"]);
    }
}
