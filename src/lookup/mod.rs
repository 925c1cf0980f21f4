//! Paid phone-number lookups: the record model, display formatting, and the
//! orchestration workflow around the external API.

pub mod client;
pub mod orchestrator;

use async_trait::async_trait;
use serde::Deserialize;

use crate::constants::MIN_QUERY_DIGITS;
use crate::error::BotResult;

/// One record returned by the lookup API. Every field is optional; the API
/// simply omits whatever it does not know.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupRecord {
    pub name: Option<String>,
    pub fname: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub circle: Option<String>,
}

/// The external record API. Implementations are expected to fail rather
/// than block past the orchestrator's time budget.
#[async_trait]
pub trait LookupApi: Send + Sync {
    async fn lookup(&self, query: &str) -> BotResult<Vec<LookupRecord>>;
}

/// A lookup query is raw digits, at least ten of them.
pub fn is_valid_query(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.len() >= MIN_QUERY_DIGITS && trimmed.chars().all(|c| c.is_ascii_digit())
}

/// Collapses the API's `!`-delimited (sometimes doubled) address format into
/// a comma-separated display string, dropping empty segments.
pub fn normalize_address(raw: &str) -> String {
    raw.replace("!!", "!")
        .split('!')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders one record as an outbound message body.
pub fn format_record(record: &LookupRecord, index: usize, total: usize) -> String {
    let address = record
        .address
        .as_deref()
        .map(normalize_address)
        .filter(|cleaned| !cleaned.is_empty())
        .unwrap_or_else(|| "N/A".to_string());
    format!(
        "📊 Record {} of {}\n➖➖➖➖➖➖➖➖➖➖\n👤 Name: {}\n👨 Father's Name: {}\n📱 Mobile: {}\n🏠 Address: {}\n📡 Circle: {}",
        index + 1,
        total,
        record.name.as_deref().unwrap_or("N/A"),
        record.fname.as_deref().unwrap_or("N/A"),
        record.mobile.as_deref().unwrap_or("N/A"),
        address,
        record.circle.as_deref().unwrap_or("N/A"),
    )
}
