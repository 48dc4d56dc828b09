use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde_json::json;
use tracing::debug;

use geoip_resolver::cli::{Cli, Commands};
use geoip_resolver::config::StaticConfig;
use geoip_resolver::services::GeoIpResolver;
use geoip_resolver::system::init_logging;

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = StaticConfig::load(&cli.config);
    let _guard = init_logging(&config.logging).context("failed to initialize logging")?;

    match cli.command {
        Commands::Lookup {
            ips,
            no_remote,
            json,
        } => {
            if no_remote {
                config.remote.enabled = false;
            }
            let resolver = GeoIpResolver::new(&config);
            Ok(run_lookup(&resolver, &ips, json))
        }
        Commands::Source => {
            config.remote.enabled = false;
            let resolver = GeoIpResolver::new(&config);
            match resolver.database() {
                Ok(db) => {
                    println!("{} [{}]", db.source(), db.database_type());
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("{}", e.format_colored());
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::ConfigGen { output } => config_gen(output.as_deref()),
    }
}

fn run_lookup(resolver: &GeoIpResolver, ips: &[String], as_json: bool) -> ExitCode {
    let mut failed = false;

    for ip in ips {
        let result = resolver.lookup_str(ip);
        debug!("Lookup {} -> {:?}", ip, result);

        match (result, as_json) {
            (Ok(code), true) => println!("{}", json!({ "ip": ip, "code": code })),
            (Ok(code), false) => println!("{} {}", ip, code),
            (Err(e), true) => {
                failed = true;
                println!(
                    "{}",
                    json!({ "ip": ip, "error": { "code": e.code(), "message": e.format_simple() } })
                );
            }
            (Err(e), false) => {
                failed = true;
                eprintln!("{}: {}", ip, e.format_colored());
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn config_gen(output: Option<&str>) -> anyhow::Result<ExitCode> {
    match output {
        Some(path) => {
            StaticConfig::default()
                .save_to_file(path)
                .map_err(|e| anyhow::anyhow!("failed to write {}: {}", path, e))?;
            println!("Sample configuration written to {}", path);
        }
        None => print!("{}", StaticConfig::generate_sample_config()),
    }
    Ok(ExitCode::SUCCESS)
}
