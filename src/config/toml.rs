//! TOML configuration file parsing

use super::*;
use crate::config::cli::Cli;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Build the run configuration: the `--config` file if given, then CLI overrides
pub fn load_config(cli: &Cli) -> Result<Config> {
    let config = match cli.config {
        Some(ref path) => parse_toml_file(path)?,
        None => Config::default(),
    };

    merge_cli_with_config(cli, config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Result<Config> {
    if let Some(ref input) = cli.input {
        config.input = Some(input.clone());
    }

    // Override counter settings
    if let Some(threads) = cli.threads {
        config.counter.threads = threads;
    }

    // Override cluster settings
    if let Some(mode) = cli.mode {
        config.cluster.mode = mode;
    }
    if let Some(participants) = cli.participants {
        config.cluster.participants = participants;
    }
    if let Some(port) = cli.worker_port {
        config.cluster.worker_port = port;
    }
    if let Some(port) = cli.listen_port {
        config.cluster.listen_port = port;
    }
    if let Some(ref host_list) = cli.host_list {
        config.cluster.hosts = parse_host_list(host_list);
    } else if let Some(ref clients_file) = cli.clients_file {
        let content = fs::read_to_string(clients_file)
            .with_context(|| format!("Failed to read clients file: {}", clients_file.display()))?;
        config.cluster.hosts = parse_clients_file(&content);
    }

    // Override output settings
    if let Some(sort) = cli.sort {
        config.output.sort = sort;
    }
    if let Some(top) = cli.top {
        config.output.top = Some(top);
    }
    if let Some(ref path) = cli.json_output {
        config.output.json_output = Some(path.clone());
    }
    if cli.show_participants {
        config.output.show_participants = true;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_parse_full_toml() {
        let config = parse_toml_string(
            r#"
            input = "corpus.txt"

            [counter]
            threads = 6

            [cluster]
            mode = "coordinator"
            hosts = ["node-a", "node-b:7000"]
            worker_port = 8000

            [output]
            sort = "count"
            top = 20
            show_participants = true
            "#,
        )
        .unwrap();

        assert_eq!(config.input, Some(PathBuf::from("corpus.txt")));
        assert_eq!(config.counter.threads, 6);
        assert_eq!(config.cluster.mode, ExecutionMode::Coordinator);
        assert_eq!(config.cluster.node_addresses(), vec!["node-a:8000", "node-b:7000"]);
        assert_eq!(config.output.sort, SortOrder::Count);
        assert_eq!(config.output.top, Some(20));
        assert!(config.output.show_participants);
    }

    #[test]
    fn test_parse_empty_toml_uses_defaults() {
        let config = parse_toml_string("").unwrap();
        assert_eq!(config.cluster.participants, 1);
        assert_eq!(config.output.sort, SortOrder::Word);
    }

    #[test]
    fn test_parse_invalid_toml() {
        assert!(parse_toml_string("[output]\nsort = \"length\"\n").is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let config = parse_toml_string("[counter]\nthreads = 6\n[cluster]\nparticipants = 2\n").unwrap();
        let cli = Cli::try_parse_from(["wordpulse", "-t", "3", "--top", "5", "in.txt"]).unwrap();

        let merged = merge_cli_with_config(&cli, config).unwrap();
        assert_eq!(merged.counter.threads, 3);
        assert_eq!(merged.cluster.participants, 2);
        assert_eq!(merged.output.top, Some(5));
        assert_eq!(merged.input, Some(PathBuf::from("in.txt")));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cluster]\nparticipants = 4").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let cli = Cli::try_parse_from(["wordpulse", "--config", path.as_str()]).unwrap();

        let config = load_config(&cli).unwrap();
        assert_eq!(config.cluster.participants, 4);
    }

    #[test]
    fn test_clients_file_merged() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# participants\nnode-a\nnode-b:7000").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let cli = Cli::try_parse_from(["wordpulse", "--mode", "coordinator", "--clients-file", path.as_str(), "in.txt"])
            .unwrap();

        let config = merge_cli_with_config(&cli, Config::default()).unwrap();
        assert_eq!(config.cluster.node_addresses(), vec!["node-a:9999", "node-b:7000"]);
    }
}
