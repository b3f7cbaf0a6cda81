mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

use tc_core::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on the
    // verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "tubecast=trace,tc_server=trace,tc_db=debug,tc_core=debug,tower_http=debug".to_string()
        } else {
            "tubecast=debug,tc_server=debug,tc_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let mut config = Config::load_or_default(cli.config.as_deref());
            config.server.host = host;
            config.server.port = port;

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(tc_server::start(config))?;
            Ok(())
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("tubecast {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    let config = match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)?;
            Config::from_json(&contents)?
        }
        None => Config::default(),
    };

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("Configuration is valid.");
    } else {
        println!("Configuration parsed with {} warning(s):", warnings.len());
        for warning in &warnings {
            println!("  - {warning}");
        }
    }

    println!(
        "Timeline: start_time={}, window={}+{}",
        config.timeline.start_time, config.timeline.window_before, config.timeline.window_after
    );
    println!("Server: {}:{}", config.server.host, config.server.port);

    Ok(())
}
