// Subcommand implementations

use anyhow::{Context, Result};
use soltest_common::config::Config;
use soltest_engine::TestSession;
use soltest_relay::QuestionStore;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::process::ExitCode;
use tokio::signal;
use tracing::{error, info, warn};

/// The relay has no authentication, so it only listens on loopback
fn relay_addr(port: u16) -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, port))
}

/// Run the relay until Ctrl-C
pub async fn judge(config: &Config) -> Result<()> {
    let addr = relay_addr(config.port);
    info!("soltest relay booting on port {}", config.port);

    let shutdown = async {
        match signal::ctrl_c().await {
            Ok(()) => warn!("Received shutdown signal"),
            Err(e) => {
                error!(error = %e, "Failed to listen for Ctrl-C, relay will run until killed");
                std::future::pending::<()>().await;
            }
        }
    };

    soltest_relay::serve(addr, QuestionStore::new(), shutdown).await
}

/// Compile and test `file` in the current directory
pub async fn test(config: &Config, file: &Path) -> Result<ExitCode> {
    let work_dir = std::env::current_dir().context("Failed to resolve working directory")?;
    let session = TestSession::new(config, work_dir)?;

    let outcome = session.run(file).await?;

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_binds_loopback_only() {
        let addr = relay_addr(12121);

        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 12121);
    }
}
