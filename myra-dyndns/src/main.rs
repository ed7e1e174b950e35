//! myra-dyndns
//!
//! Points the A and AAAA records of one name at the addresses given on the command line.
//!
//! ```bash
//! MYRA_DOMAIN=example.com myra-dyndns 203.0.113.5 2001:db8::5
//! ```
//!
//! Credentials are read from `<MYRA_CREDENTIALS_DIR>/<MYRA_CREDENTIALS_NAME>.key` and `.secret`.
//! See [`config`] for every variable. Log verbosity follows `RUST_LOG` (default `info`).
//!
//! Exit status is 0 when both records were written, 1 otherwise.

mod config;

use std::net::{Ipv4Addr, Ipv6Addr};
use std::process::ExitCode;

use anyhow::{Context, Result};
use config::DyndnsConfig;
use myra_api::{ApiError, DynDnsUpdater, FileCredentialSource, MyraClient};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // stdout carries the status lines
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (ipv4, ipv6) = match parse_addresses(&args) {
        Ok(addresses) => addresses,
        Err(e) => {
            eprintln!("[ERROR]: {e}");
            return ExitCode::FAILURE;
        }
    };

    let config = match DyndnsConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&config, ipv4, ipv6).await {
        Ok(()) => {
            println!();
            ExitCode::SUCCESS
        }
        Err(e) => {
            let expected = e
                .downcast_ref::<ApiError>()
                .is_some_and(ApiError::is_expected);
            if expected {
                tracing::warn!("{e:#}");
            } else {
                tracing::error!("{e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

/// `<ipv4> <ipv6>`
fn parse_addresses(args: &[String]) -> Result<(Ipv4Addr, Ipv6Addr), ApiError> {
    let [ipv4, ipv6, ..] = args else {
        return Err(ApiError::InvalidArgument {
            param: "addresses".to_string(),
            detail: "please provide ipv4 and ipv6".to_string(),
        });
    };

    let ipv4 = ipv4.parse().map_err(|e| ApiError::InvalidArgument {
        param: "ipv4".to_string(),
        detail: format!("'{ipv4}': {e}"),
    })?;
    let ipv6 = ipv6.parse().map_err(|e| ApiError::InvalidArgument {
        param: "ipv6".to_string(),
        detail: format!("'{ipv6}': {e}"),
    })?;
    Ok((ipv4, ipv6))
}

async fn run(config: &DyndnsConfig, ipv4: Ipv4Addr, ipv6: Ipv6Addr) -> Result<()> {
    let credentials = FileCredentialSource::new(&config.credentials_dir, &config.credentials_name)
        .load()
        .context("reading API credentials")?;

    let client = MyraClient::builder(credentials)
        .host(&config.host)
        .language(&config.language)
        .danger_accept_invalid_certs(config.insecure_tls)
        .build()?;

    tracing::info!(
        "Updating {} in {} to {ipv4} / {ipv6}",
        config.subdomain,
        config.domain
    );

    let report = DynDnsUpdater::new(&client)
        .ttl(config.ttl)
        .update_addresses(&config.domain, &config.subdomain, ipv4, ipv6)
        .await
        .with_context(|| format!("DNS change for {}", config.subdomain))?;

    for update in &report.updates {
        println!(
            "[SUCCESS]: {} {} {} -> {}",
            update.record_type, config.subdomain, update.previous_value, update.value
        );
    }
    Ok(())
}
