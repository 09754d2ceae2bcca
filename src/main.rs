//! Interactive ticket pool simulation.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::warn;

use ticket_pool::util::init_tracing_with_default;
use ticket_pool::{AppResult, Shell, Simulation, SimulationConfig};

/// Drive a bounded ticket pool with producer, consumer and reader threads.
#[derive(Debug, Parser)]
#[command(name = "ticket_pool", version, about)]
struct Args {
    /// Pool capacity. Falls back to the configured value when absent or not a
    /// positive integer.
    #[arg(allow_negative_numbers = true)]
    capacity: Option<String>,

    /// Anything after the capacity is ignored.
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    extra: Vec<String>,

    /// JSON configuration file. Without it, defaults are overlaid with
    /// `TICKET_POOL_*` environment variables.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Apply the capacity argument. Returns `false` when it is not a positive
/// integer, leaving `config` untouched.
fn apply_capacity(config: &mut SimulationConfig, raw: &str) -> bool {
    match raw.trim().parse::<usize>().ok().filter(|c| *c > 0) {
        Some(capacity) => {
            config.capacity = capacity;
            true
        }
        None => false,
    }
}

fn load_config(args: &Args) -> AppResult<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimulationConfig::from_env().unwrap_or_else(|err| {
            warn!(error = %err, "ignoring environment overrides");
            SimulationConfig::default()
        }),
    };

    if !args.extra.is_empty() {
        warn!(ignored = ?args.extra, "ignoring extra arguments");
    }
    if let Some(raw) = &args.capacity {
        if !apply_capacity(&mut config, raw) {
            println!("Invalid pool capacity. Using default: {}", config.capacity);
        }
    }
    Ok(config)
}

fn main() -> AppResult<()> {
    init_tracing_with_default("ticket_pool=info");

    let args = Args::parse();
    let config = load_config(&args)?;
    let simulation = Simulation::new(config).context("building the ticket pool")?;

    let mut shell = Shell::new(simulation, io::stdout().lock());
    shell.run(io::stdin().lock())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_file(name: &str, json: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "ticket_pool_main_{name}_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, json).unwrap();
        path
    }

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_capacity_argument_parsing() {
        let mut config = SimulationConfig::default();
        assert!(apply_capacity(&mut config, "25"));
        assert_eq!(config.capacity, 25);

        for raw in ["abc", "0", "-5", "", "1.5"] {
            let mut config = SimulationConfig::default();
            assert!(!apply_capacity(&mut config, raw), "{raw}");
            assert_eq!(config.capacity, 10, "{raw}");
        }
    }

    #[test]
    fn test_negative_capacity_is_a_value_not_a_flag() {
        let args = parse(&["ticket_pool", "-5"]);
        assert_eq!(args.capacity.as_deref(), Some("-5"));
        assert!(args.extra.is_empty());
    }

    #[test]
    fn test_extra_arguments_are_ignored() {
        let args = parse(&["ticket_pool", "5", "extra", "-x"]);
        assert_eq!(args.capacity.as_deref(), Some("5"));
        assert_eq!(args.extra, vec!["extra".to_string(), "-x".to_string()]);
    }

    #[test]
    fn test_no_arguments() {
        let args = parse(&["ticket_pool"]);
        assert_eq!(args.capacity, None);
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_load_config_falls_back_on_bad_capacity() {
        let path = config_file("fallback", r#"{ "capacity": 10 }"#);
        for raw in ["-5", "abc", "0"] {
            let args = parse(&["ticket_pool", "--config", path.to_str().unwrap(), raw]);
            assert_eq!(load_config(&args).unwrap().capacity, 10, "{raw}");
        }
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_config_applies_capacity_over_file() {
        let path = config_file("override", r#"{ "capacity": 4, "mechanism": "CHANNEL" }"#);
        let args = parse(&["ticket_pool", "12", "--config", path.to_str().unwrap()]);
        let config = load_config(&args).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.capacity, 12);
        assert_eq!(config.mechanism.to_string(), "CHANNEL");
    }
}
