mod stdio;

use anyhow::{anyhow, Context};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use weather_core::config::{Config, WarnLevel};
use weather_server::{AppState, ToolContext};

#[derive(Parser)]
#[command(
    name = "mcp-weather-server",
    about = "MCP server exposing weather and time tools over stdio or SSE",
    version
)]
struct Cli {
    /// Transport to serve
    #[arg(long, value_enum, default_value_t = Mode::Stdio)]
    mode: Mode,

    /// Address to bind in sse mode
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on in sse mode
    #[arg(long, env = "PORT", default_value_t = 8081)]
    port: u16,

    /// YAML config file with upstream settings
    #[arg(long, env = "WEATHER_CONFIG")]
    config: Option<PathBuf>,

    /// Override the geocoding endpoint
    #[arg(long, env = "WEATHER_GEOCODING_URL")]
    geocoding_url: Option<String>,

    /// Override the forecast endpoint
    #[arg(long, env = "WEATHER_FORECAST_URL")]
    forecast_url: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Stdio,
    Sse,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr: stdout carries the stdio transport.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let ctx = ToolContext::new(config).context("failed to build HTTP client")?;
    let state = AppState::new(ctx);

    tracing::info!(
        mode = ?cli.mode,
        tools = ?state.tools.iter().map(|t| t.name()).collect::<Vec<_>>(),
        "starting mcp-weather-server {}",
        env!("CARGO_PKG_VERSION")
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        match cli.mode {
            Mode::Stdio => stdio::run(&state.tools, &state.ctx).await,
            Mode::Sse => weather_server::serve(state, &cli.host, cli.port).await,
        }
    })
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config =
        Config::load_or_default(cli.config.as_deref()).context("failed to load config")?;

    if let Some(url) = &cli.geocoding_url {
        config.geocoding_url = url.clone();
    }
    if let Some(url) = &cli.forecast_url {
        config.forecast_url = url.clone();
    }

    let mut errors = Vec::new();
    for warning in config.validate() {
        match warning.level {
            WarnLevel::Warning => tracing::warn!("{}", warning.message),
            WarnLevel::Error => errors.push(warning.message),
        }
    }
    if !errors.is_empty() {
        return Err(anyhow!("invalid configuration: {}", errors.join("; ")));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_container_contract() {
        std::env::remove_var("PORT");
        let cli = Cli::try_parse_from(["mcp-weather-server"]).unwrap();
        assert_eq!(cli.mode, Mode::Stdio);
        assert_eq!(cli.host, "127.0.0.1");
        assert_eq!(cli.port, 8081);
    }

    #[test]
    fn parses_sse_mode_and_host() {
        let cli = Cli::try_parse_from([
            "mcp-weather-server",
            "--mode",
            "sse",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
        ])
        .unwrap();
        assert_eq!(cli.mode, Mode::Sse);
        assert_eq!(cli.host, "0.0.0.0");
        assert_eq!(cli.port, 9000);
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["mcp-weather-server", "--mode", "websocket"]).is_err());
    }

    #[test]
    fn flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("weather.yaml");
        std::fs::write(
            &path,
            "forecast_url: http://file.example/forecast\nrequest_timeout_secs: 4\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "mcp-weather-server",
            "--config",
            path.to_str().unwrap(),
            "--forecast-url",
            "http://flag.example/forecast",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.forecast_url, "http://flag.example/forecast");
        assert_eq!(config.request_timeout_secs, 4);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cli = Cli::try_parse_from([
            "mcp-weather-server",
            "--geocoding-url",
            "not-a-url",
        ])
        .unwrap();
        let err = load_config(&cli).unwrap_err();
        assert!(err.to_string().contains("invalid configuration"));
    }
}
