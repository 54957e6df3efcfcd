//! Command-line interface for the banking error handler
//!
//! # Usage
//!
//! ## Server Mode
//! ```bash
//! banking-errors server --port 8417 --host 0.0.0.0
//! ```
//!
//! ## Classify Mode
//! ```bash
//! banking-errors classify --status 502 --content-type text/html --body page.html
//! curl -s https://bank.example/api | banking-errors classify --status 400 --body -
//! ```

use clap::{Parser, Subcommand};

use banking_error_handler::cli::{
    classify::{ClassifyArgs, run_classify_mode},
    server::{ServerArgs, run_server_mode},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "banking-errors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server mode
    Server {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Configuration file path
        #[arg(long)]
        config: Option<String>,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Classify a single failed banking response
    Classify {
        /// HTTP status of the response
        #[arg(short, long)]
        status: u16,

        /// Content-Type header of the response
        #[arg(short = 't', long)]
        content_type: Option<String>,

        /// File holding the response body, or `-` for stdin
        #[arg(short, long, allow_hyphen_values = true)]
        body: Option<String>,

        /// Bank account the error is recorded on
        #[arg(short, long)]
        account: Option<String>,

        /// Configuration file path
        #[arg(long)]
        config: Option<String>,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Server {
            port,
            host,
            config,
            verbose,
        } => {
            let args = ServerArgs {
                port,
                host,
                config,
                verbose,
            };
            run_server_mode(args).await
        }
        Commands::Classify {
            status,
            content_type,
            body,
            account,
            config,
            verbose,
        } => {
            let args = ClassifyArgs {
                status,
                content_type,
                body,
                account,
                config,
                verbose,
            };
            run_classify_mode(args).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_server_subcommand() {
        let cli = Cli::parse_from([
            "banking-errors",
            "server",
            "--port",
            "8080",
            "--host",
            "0.0.0.0",
        ]);

        match cli.command {
            Commands::Server {
                port, host, config, ..
            } => {
                assert_eq!(port, Some(8080));
                assert_eq!(host, Some("0.0.0.0".to_string()));
                assert_eq!(config, None);
            }
            _ => panic!("Expected server subcommand"),
        }
    }

    #[test]
    fn test_server_default_values() {
        let cli = Cli::parse_from(["banking-errors", "server"]);

        match cli.command {
            Commands::Server {
                port,
                host,
                config,
                verbose,
            } => {
                assert_eq!(port, None);
                assert_eq!(host, None);
                assert_eq!(config, None);
                assert!(!verbose);
            }
            _ => panic!("Expected server subcommand"),
        }
    }

    #[test]
    fn test_classify_subcommand() {
        let cli = Cli::parse_from([
            "banking-errors",
            "classify",
            "--status",
            "403",
            "--content-type",
            "application/json",
            "--body",
            "-",
            "--account",
            "ACC-1",
        ]);

        match cli.command {
            Commands::Classify {
                status,
                content_type,
                body,
                account,
                verbose,
                ..
            } => {
                assert_eq!(status, 403);
                assert_eq!(content_type, Some("application/json".to_string()));
                assert_eq!(body, Some("-".to_string()));
                assert_eq!(account, Some("ACC-1".to_string()));
                assert!(!verbose);
            }
            _ => panic!("Expected classify subcommand"),
        }
    }

    #[test]
    fn test_classify_requires_status() {
        assert!(Cli::try_parse_from(["banking-errors", "classify"]).is_err());
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["banking-errors"]).is_err());
    }

    #[test]
    fn test_parameter_conflicts() {
        let result = Cli::try_parse_from(["banking-errors", "server", "--status", "500"]);
        assert!(result.is_err());
    }
}
