//! Server mode CLI logic

use crate::{server::app, utils::version};
use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Arguments for server mode
#[derive(Debug)]
pub struct ServerArgs {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub config: Option<String>,
    pub verbose: bool,
}

/// Log filter for server mode
///
/// Precedence: `--verbose`, then `RUST_LOG`, then the configured level.
fn env_filter(verbose: bool, configured_level: &str) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(configured_level)
    }
}

/// Run server mode with the given arguments
pub async fn run_server_mode(args: ServerArgs) -> Result<()> {
    // Configuration precedence: CLI arguments, environment, config file, defaults.
    // It is loaded before logging so the configured level can be used.
    let mut settings = super::load_settings(args.config.as_deref());

    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    if args.verbose {
        settings.logging.verbose = true;
    }

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter(settings.logging.verbose, &settings.logging.level))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
    {
        eprintln!("Warning: logging already initialised: {}", e);
    }

    tracing::info!(
        "Starting banking error handler v{}",
        version::get_version()
    );

    let app = app::create_app(settings.clone())?;

    let addr = parse_and_bind_address(&settings.server.host, settings.server.port).await?;

    tracing::info!(
        "Banking error handler v{} listening on {}",
        version::get_version(),
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Parse host string and attempt to bind to the address
///
/// `::` falls back to `0.0.0.0` when IPv6 is unavailable.
pub async fn parse_and_bind_address(host: &str, port: u16) -> Result<std::net::SocketAddr> {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

    if let Ok(ip) = host.parse::<IpAddr>() {
        let addr = SocketAddr::new(ip, port);
        tracing::debug!("Parsed address: {}", addr);
        // "::" parses as an address too, so probe it before handing it out
        if ip != IpAddr::V6(Ipv6Addr::UNSPECIFIED) {
            return Ok(addr);
        }

        return match tokio::net::TcpListener::bind(addr).await {
            Ok(_) => {
                tracing::info!("Successfully bound to IPv6 address {}", addr);
                Ok(addr)
            }
            Err(e) => {
                tracing::warn!(
                    "Could not listen on [::]:{} (Caused by {}), falling back to 0.0.0.0",
                    port,
                    e
                );
                Ok(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port))
            }
        };
    }

    anyhow::bail!(
        "Invalid host address: {}. Use an IP address such as '127.0.0.1', '::' or '0.0.0.0'",
        host
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::ENV_TEST_MUTEX;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_parse_and_bind_ipv4_address() {
        let addr = parse_and_bind_address("127.0.0.1", 0).await.unwrap();
        assert_eq!(
            addr.ip(),
            std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
        );
    }

    #[tokio::test]
    async fn test_parse_and_bind_ipv6_address() {
        let addr = parse_and_bind_address("::1", 0).await.unwrap();
        assert_eq!(addr.ip(), std::net::IpAddr::V6(std::net::Ipv6Addr::LOCALHOST));
    }

    #[tokio::test]
    async fn test_parse_and_bind_ipv4_any_address() {
        let addr = parse_and_bind_address("0.0.0.0", 0).await.unwrap();
        assert_eq!(addr.ip(), std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));
    }

    #[tokio::test]
    async fn test_parse_and_bind_ipv6_any_fallback() {
        let addr = parse_and_bind_address("::", 0).await.unwrap();
        assert!(
            addr.ip() == std::net::IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
                || addr.ip() == std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)
        );
    }

    #[tokio::test]
    async fn test_parse_and_bind_invalid_address() {
        let error = parse_and_bind_address("invalid-host", 8080).await.unwrap_err();
        assert!(error.to_string().contains("Invalid host address: invalid-host"));
    }

    #[tokio::test]
    async fn test_parse_and_bind_hostnames_are_rejected() {
        assert!(parse_and_bind_address("localhost", 8080).await.is_err());
        assert!(parse_and_bind_address("", 8080).await.is_err());
    }

    #[tokio::test]
    async fn test_run_server_mode_with_cli_config_path() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[server]
host = "127.0.0.1"
port = 9999
        "#
        )
        .unwrap();
        temp_file.flush().unwrap();

        let args = ServerArgs {
            port: Some(0),
            host: Some("127.0.0.1".to_string()),
            config: Some(temp_file.path().to_str().unwrap().to_string()),
            verbose: false,
        };

        let handle = tokio::spawn(async move { run_server_mode(args).await });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        assert!(!handle.is_finished(), "server should still be running");
        handle.abort();
    }

    #[tokio::test]
    async fn test_run_server_mode_rejects_invalid_host() {
        let args = ServerArgs {
            port: Some(0),
            host: Some("not-an-ip".to_string()),
            config: Some("/nonexistent/config.toml".to_string()),
            verbose: false,
        };

        assert!(run_server_mode(args).await.is_err());
    }

    #[test]
    fn test_logging_level_from_config_is_respected() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        let original_rust_log = std::env::var("RUST_LOG").ok();
        unsafe {
            std::env::remove_var("RUST_LOG");
        }

        let filter_str = format!("{:?}", env_filter(false, "error")).to_lowercase();
        assert!(
            filter_str.contains("error"),
            "EnvFilter should use the configured level, got: {}",
            filter_str
        );

        unsafe {
            if let Some(rust_log) = original_rust_log {
                std::env::set_var("RUST_LOG", rust_log);
            }
        }
    }

    #[test]
    fn test_rust_log_env_overrides_config() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        let original_rust_log = std::env::var("RUST_LOG").ok();
        unsafe {
            std::env::set_var("RUST_LOG", "warn");
        }

        let filter_str = format!("{:?}", env_filter(false, "error")).to_lowercase();
        assert!(
            filter_str.contains("warn"),
            "EnvFilter should use RUST_LOG over the configured level, got: {}",
            filter_str
        );

        unsafe {
            std::env::remove_var("RUST_LOG");
            if let Some(rust_log) = original_rust_log {
                std::env::set_var("RUST_LOG", rust_log);
            }
        }
    }

    #[test]
    fn test_verbose_flag_takes_highest_precedence() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        let original_rust_log = std::env::var("RUST_LOG").ok();
        unsafe {
            std::env::set_var("RUST_LOG", "warn");
        }

        let filter_str = format!("{:?}", env_filter(true, "error")).to_lowercase();
        assert!(
            filter_str.contains("debug"),
            "EnvFilter should use 'debug' when verbose, got: {}",
            filter_str
        );

        unsafe {
            std::env::remove_var("RUST_LOG");
            if let Some(rust_log) = original_rust_log {
                std::env::set_var("RUST_LOG", rust_log);
            }
        }
    }
}
