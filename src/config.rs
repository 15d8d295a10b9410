use anyhow::{anyhow, Context};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DB_ENV: &str = "RECORDS_DB";
const DEFAULT_PORT: u16 = 3000;

/// How the result view treats a result whose student or course is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingReferencePolicy {
    /// Keep the row and show `"unknown"` for the name that did not resolve.
    #[default]
    Placeholder,
    /// Drop the row from the listing.
    Omit,
    /// Fail the whole listing with an internal error.
    Fail,
}

impl MissingReferencePolicy {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "placeholder" => Ok(Self::Placeholder),
            "omit" => Ok(Self::Omit),
            "fail" => Ok(Self::Fail),
            other => Err(anyhow!(
                "unknown missing reference policy {other:?} (expected placeholder, omit or fail)"
            )),
        }
    }
}

/// Behaviour switches shared by the handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    /// Reject results whose references do not resolve.
    pub strict_references: bool,
    /// Answer student validation failures with 500 instead of 400.
    pub legacy_status_codes: bool,
    pub missing_reference_policy: MissingReferencePolicy,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub bind: SocketAddr,
    pub options: Options,
}

impl Config {
    /// Reads the process environment. `.env` should already be loaded.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let db_path = get(DB_ENV)
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("{DB_ENV} is not defined"))?;

        let host: IpAddr = match get("HOST") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("invalid HOST {v:?}"))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let port: u16 = match get("PORT") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("invalid PORT {v:?}"))?,
            None => DEFAULT_PORT,
        };

        let options = Options {
            strict_references: parse_flag("STRICT_REFERENCES", get("STRICT_REFERENCES"))?,
            legacy_status_codes: parse_flag("LEGACY_STATUS_CODES", get("LEGACY_STATUS_CODES"))?,
            missing_reference_policy: match get("MISSING_REFERENCE_POLICY") {
                Some(v) => MissingReferencePolicy::parse(&v)?,
                None => MissingReferencePolicy::default(),
            },
        };

        Ok(Self {
            db_path,
            bind: SocketAddr::new(host, port),
            options,
        })
    }
}

fn parse_flag(key: &str, raw: Option<String>) -> anyhow::Result<bool> {
    let Some(raw) = raw else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow!("invalid boolean for {key}: {raw:?}")),
    }
}
