use crate::errors::FetchError;
use crate::models::RawReport;
use reqwest::header::{CACHE_CONTROL, HeaderValue};
use serde_json::Value;
use std::{path::Path, time::Duration};
use tokio::fs;
use tracing::{error, warn};

/// Sample report shipped with the binary, shown whenever the live fetch fails.
pub const BUNDLED_FALLBACK: &str = include_str!("../data/dashboard-payload-example.json");

#[derive(Debug, Clone)]
pub struct ReportClient {
    http: reqwest::Client,
    url: String,
}

impl ReportClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// GETs the report, bypassing caches. Non-2xx and non-object bodies are
    /// failures.
    pub async fn fetch(&self) -> Result<RawReport, FetchError> {
        let response = self
            .http
            .get(&self.url)
            .header(CACHE_CONTROL, HeaderValue::from_static("no-store"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        parse_report(&body)
    }
}

pub fn parse_report(bytes: &[u8]) -> Result<RawReport, FetchError> {
    let value: Value = serde_json::from_slice(bytes)?;
    if !value.is_object() {
        return Err(FetchError::Shape);
    }
    Ok(serde_json::from_value(value)?)
}

pub fn bundled_fallback() -> RawReport {
    match parse_report(BUNDLED_FALLBACK.as_bytes()) {
        Ok(report) => report,
        Err(err) => {
            error!("bundled fallback report is unreadable: {err}");
            RawReport::default()
        }
    }
}

/// Reads the fallback report from `path` when given, reverting to the
/// bundled sample if that file is missing or malformed.
pub async fn load_fallback(path: Option<&Path>) -> RawReport {
    let Some(path) = path else {
        return bundled_fallback();
    };

    match fs::read(path).await {
        Ok(bytes) => match parse_report(&bytes) {
            Ok(report) => report,
            Err(err) => {
                warn!("failed to parse fallback file {}: {err}", path.display());
                bundled_fallback()
            }
        },
        Err(err) => {
            warn!("failed to read fallback file {}: {err}", path.display());
            bundled_fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bundled_fallback_parses() {
        let report = bundled_fallback();
        assert_ne!(report, RawReport::default());
        assert!(report.daily_login_completions.is_array());
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        assert!(matches!(parse_report(b"[1, 2, 3]"), Err(FetchError::Shape)));
        assert!(matches!(parse_report(b"null"), Err(FetchError::Shape)));
        assert!(matches!(parse_report(b"{ nope"), Err(FetchError::Decode(_))));
    }

    #[test]
    fn partial_objects_are_accepted() {
        let report = parse_report(br#"{ "total_students": 3 }"#).unwrap();
        assert_eq!(report.total_students, json!(3));
        assert!(report.school_user_counts.is_null());
    }

    #[tokio::test]
    async fn missing_fallback_file_uses_bundled_report() {
        let path = std::env::temp_dir().join("gamification_dashboard_missing_fallback.json");
        let report = load_fallback(Some(&path)).await;
        assert_eq!(report, bundled_fallback());
    }

    #[tokio::test]
    async fn fallback_file_overrides_bundled_report() {
        let path = std::env::temp_dir().join(format!(
            "gamification_dashboard_fallback_{}.json",
            std::process::id()
        ));
        fs::write(&path, br#"{ "total_students": 77 }"#).await.unwrap();
        let report = load_fallback(Some(&path)).await;
        let _ = fs::remove_file(&path).await;
        assert_eq!(report.total_students, json!(77));
    }
}
