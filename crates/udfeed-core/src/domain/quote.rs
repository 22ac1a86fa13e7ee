use serde::{Deserialize, Serialize};

/// Per-entry / per-batch status tag (`s` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Ok,
    Error,
}

/// Quote value fields in the UDF `v` object. All fields are optional strings
/// straight from the upstream payload; absent values are omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteValues {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_close_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
}

/// One quote in the batch. `n` is the caller's original `EXCHANGE:SYMBOL`
/// label, not the bare upstream symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteEntry {
    pub s: QuoteStatus,
    pub n: String,
    pub v: QuoteValues,
}

impl QuoteEntry {
    /// Error entry with empty value fields, as mandated for rows the upstream
    /// flagged or could not resolve.
    pub fn error(label: impl Into<String>) -> Self {
        Self {
            s: QuoteStatus::Error,
            n: label.into(),
            v: QuoteValues::default(),
        }
    }
}

/// UDF quote batch: `d` entries in the caller's request order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteBatch {
    pub s: QuoteStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errmsg: Option<String>,
    pub d: Vec<QuoteEntry>,
}

impl QuoteBatch {
    pub fn ok(entries: Vec<QuoteEntry>) -> Self {
        Self {
            s: QuoteStatus::Ok,
            errmsg: None,
            d: entries,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            s: QuoteStatus::Error,
            errmsg: Some(message.into()),
            d: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_entry_has_empty_values() {
        let entry = QuoteEntry::error("NYSE:IBM");
        let json = serde_json::to_value(&entry).expect("must serialize");
        assert_eq!(json["s"], "error");
        assert_eq!(json["n"], "NYSE:IBM");
        assert_eq!(json["v"], serde_json::json!({}));
    }

    #[test]
    fn batch_error_carries_errmsg() {
        let batch = QuoteBatch::error("empty quotes response");
        let json = serde_json::to_value(&batch).expect("must serialize");
        assert_eq!(json["s"], "error");
        assert_eq!(json["errmsg"], "empty quotes response");
    }
}
