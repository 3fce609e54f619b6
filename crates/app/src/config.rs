use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use weekly_core::WeekZone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WeekZoneArg {
    /// Weeks start at Monday 00:00 in the server's local time zone.
    Local,
    /// Weeks start at Monday 00:00 UTC.
    Utc,
}

impl From<WeekZoneArg> for WeekZone {
    fn from(arg: WeekZoneArg) -> Self {
        match arg {
            WeekZoneArg::Local => WeekZone::Local,
            WeekZoneArg::Utc => WeekZone::Utc,
        }
    }
}

/// Weekly goal tracker HTTP server.
#[derive(Debug, Parser)]
#[command(name = "weekly", version, about, long_about = None)]
pub struct Config {
    /// Address to bind.
    #[arg(long, env = "WEEKLY_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// SQLite database URL or file path.
    #[arg(long = "db", env = "DATABASE_URL", default_value = "sqlite://weekly.sqlite3")]
    pub db_url: String,

    /// Origin allowed by CORS; `*` allows any.
    #[arg(long, env = "FRONTEND_URL", default_value = "http://localhost:5173")]
    pub frontend_url: String,

    /// Time zone in which week boundaries are computed.
    #[arg(long, env = "WEEKLY_WEEK_ZONE", value_enum, default_value_t = WeekZoneArg::Local)]
    pub week_zone: WeekZoneArg,
}

impl Config {
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Absolute `sqlite://` form of the configured database.
    #[must_use]
    pub fn database_url(&self) -> String {
        normalize_sqlite_url(&self.db_url)
    }
}

pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:"
        || trimmed.starts_with("sqlite://")
        || trimmed.starts_with("sqlite:file:")
    {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its directory so sqlx can open it.
pub fn prepare_sqlite_file(db_url: &str) -> Result<()> {
    if db_url == "sqlite::memory:" || db_url.starts_with("sqlite:file:") {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("invalid database url: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid database url: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("creating {}", path.display()))?;
    }
    Ok(())
}
