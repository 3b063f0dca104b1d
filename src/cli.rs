//! Command-line argument parsing for askchart.

use clap::Parser;
use std::path::PathBuf;

/// Ask a natural-language question of a SQL database and get back SQL,
/// rows, a chart config, and an answer.
#[derive(Parser, Debug)]
#[command(name = "askchart")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// The natural-language question (e.g., "Show me total sales per category")
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Path to the SQLite database file
    #[arg(short = 'd', long, value_name = "PATH")]
    pub db: Option<String>,

    /// LLM provider to use (groq, ollama, mock)
    #[arg(long, value_name = "PROVIDER")]
    pub llm: Option<String>,

    /// Model name (overrides provider default)
    #[arg(short = 'm', long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Config file path
    #[arg(long, value_name = "PATH", default_value = "askchart.toml")]
    pub config: PathBuf,

    /// Pretty-print the JSON response
    #[arg(long)]
    pub pretty: bool,

    /// Use a mock database and LLM (no network, for smoke testing)
    #[arg(long)]
    pub mock: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::parse_from(["askchart", "total sales per category"]);
        assert_eq!(cli.query, "total sales per category");
        assert!(cli.db.is_none());
        assert!(!cli.pretty);
    }

    #[test]
    fn test_parse_full() {
        let cli = Cli::parse_from([
            "askchart",
            "monthly revenue",
            "--db",
            "northwind.db",
            "--llm",
            "ollama",
            "-m",
            "llama3.2:3b",
            "--pretty",
        ]);
        assert_eq!(cli.db.as_deref(), Some("northwind.db"));
        assert_eq!(cli.llm.as_deref(), Some("ollama"));
        assert_eq!(cli.model.as_deref(), Some("llama3.2:3b"));
        assert!(cli.pretty);
    }

    #[test]
    fn test_query_is_required() {
        assert!(Cli::try_parse_from(["askchart"]).is_err());
    }
}
