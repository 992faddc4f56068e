use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

/// Live cricket scoreboard ticker
#[derive(Parser, Debug, Clone)]
#[command(name = "cricket-ticker", version, about)]
pub struct Config {
    /// Live scoreboard page to scrape
    #[arg(
        long,
        env = "MATCH_URL",
        default_value = "https://crex.com/scoreboard/WZ9/1UA/7th-Match/X/IM/bot-vs-zim-7th-match-mens-t20-world-cup-africa-regional-final-2025/live"
    )]
    pub match_url: String,

    /// Ticker listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "0.0.0.0:8080")]
    pub dashboard_addr: String,

    /// Milliseconds between snapshot refreshes
    #[arg(long, env = "REFRESH_INTERVAL_MS", default_value = "30000")]
    pub refresh_interval_ms: u64,

    /// Per-request timeout when loading the match page (seconds)
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value = "10")]
    pub fetch_timeout_secs: u64,

    /// User-Agent sent with page requests
    #[arg(
        long,
        env = "USER_AGENT",
        default_value = "Mozilla/5.0 (X11; Linux x86_64) cricket-ticker"
    )]
    pub user_agent: String,

    /// Scrape the page once, print the snapshot as JSON and exit
    #[arg(long, default_value = "false")]
    pub once: bool,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = Url::parse(&self.match_url)
            .map_err(|e| anyhow::anyhow!("match_url is not a valid URL: {}", e))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("match_url must use http or https, got '{}'", url.scheme());
        }
        if self.refresh_interval_ms < 1000 {
            anyhow::bail!("refresh_interval_ms must be at least 1000");
        }
        if self.fetch_timeout_secs == 0 {
            anyhow::bail!("fetch_timeout_secs must be positive");
        }
        if !self.once {
            self.dashboard_addr
                .parse::<SocketAddr>()
                .map_err(|e| anyhow::anyhow!("dashboard_addr is invalid: {}", e))?;
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
