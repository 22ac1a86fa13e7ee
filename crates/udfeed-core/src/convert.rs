//! Format converters: each upstream payload into the common UDF schema.

use std::collections::HashMap;

use serde_json::Value;
use time::{Date, Month};

use crate::domain::{
    Bar, QuoteBatch, QuoteEntry, QuoteStatus, QuoteValues, Series, TickerLabel,
};

/// Upstream error token carried inside otherwise well-formed quote rows.
const QUOTE_ERROR_FIELD: &str = "ErrorIndicationreturnedforsymbolchangedinvalid";

/// Parse a `yyyy-mm-dd` calendar day into seconds since the epoch (UTC midnight).
pub fn parse_day_to_unix(input: &str) -> Option<i64> {
    let mut parts = input.trim().splitn(3, '-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u8 = parts.next()?.parse().ok()?;
    let day: u8 = parts.next()?.parse().ok()?;

    let date = Date::from_calendar_date(year, Month::try_from(month).ok()?, day).ok()?;
    Some(date.midnight().assume_utc().unix_timestamp())
}

fn parse_float_soft(field: Option<&str>) -> f64 {
    field
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Convert the primary provider's delimited-text history into a [`Series`].
///
/// Input rows are most-recent-first with a header at line 0 and a blank
/// footer line at the end; iterating the data rows backward yields ascending
/// timestamps. Individual field parse failures degrade to NaN; a row whose
/// date cannot be parsed is dropped (the wire timestamp is an integer and
/// has no NaN slot).
pub fn convert_primary_history(raw: &str) -> Series {
    let lines: Vec<&str> = raw.split('\n').collect();
    let mut bars = Vec::new();

    if lines.len() >= 2 {
        for line in lines[1..lines.len() - 1].iter().rev() {
            let mut items = line.split(',');
            let date = items.next().unwrap_or("");
            let Some(ts) = parse_day_to_unix(date) else {
                tracing::debug!(row = line, "skipping primary history row with unparseable date");
                continue;
            };

            bars.push(Bar {
                ts,
                open: parse_float_soft(items.next()),
                high: parse_float_soft(items.next()),
                low: parse_float_soft(items.next()),
                close: parse_float_soft(items.next()),
                volume: parse_float_soft(items.next()),
            });
        }
    }

    Series::from_bars(bars)
}

/// Convert the secondary provider's JSON datatable into a [`Series`].
///
/// Rows keep the upstream order; no re-sorting happens here. Any structural
/// failure (malformed JSON, missing table, missing columns) is logged and
/// degrades to an empty `ok` series so that bad upstream data never fails
/// the request.
pub fn convert_secondary_history(raw: &str) -> Series {
    match parse_datatable(raw) {
        Ok(bars) => Series::ok_with(bars),
        Err(detail) => {
            tracing::error!(detail, "malformed secondary history payload");
            Series::empty_ok()
        }
    }
}

fn parse_datatable(raw: &str) -> Result<Vec<Bar>, &'static str> {
    let document: Value = serde_json::from_str(raw).map_err(|_| "payload is not valid JSON")?;
    let datatable = document.get("datatable").ok_or("missing 'datatable'")?;
    let columns = datatable
        .get("columns")
        .and_then(Value::as_array)
        .ok_or("missing 'columns' array")?;
    let data = datatable
        .get("data")
        .and_then(Value::as_array)
        .ok_or("missing 'data' array")?;

    let mut indices = HashMap::new();
    for (index, column) in columns.iter().enumerate() {
        if let Some(name) = column.get("name").and_then(Value::as_str) {
            indices.insert(name.to_owned(), index);
        }
    }

    let column = |name: &str| indices.get(name).copied().ok_or("missing expected column");
    let date_idx = column("date")?;
    let open_idx = column("open")?;
    let high_idx = column("high")?;
    let low_idx = column("low")?;
    let close_idx = column("close")?;
    let volume_idx = column("volume")?;

    let cell = |row: &[Value], index: usize| row.get(index).and_then(Value::as_f64).unwrap_or(f64::NAN);

    let mut bars = Vec::with_capacity(data.len());
    for row in data {
        let Some(row) = row.as_array() else { continue };
        let Some(ts) = row
            .get(date_idx)
            .and_then(Value::as_str)
            .and_then(parse_day_to_unix)
        else {
            tracing::debug!("skipping secondary history row with unparseable date");
            continue;
        };

        bars.push(Bar {
            ts,
            open: cell(row, open_idx),
            high: cell(row, high_idx),
            low: cell(row, low_idx),
            close: cell(row, close_idx),
            volume: cell(row, volume_idx),
        });
    }

    Ok(bars)
}

/// Convert the upstream quote payload into a [`QuoteBatch`].
///
/// `requested` is the caller's ticker list in request order; entries are
/// emitted in that order regardless of how the upstream ordered its rows.
/// Rows flagged with the upstream error token, rows without an exchange, and
/// requested tickers with no row at all become `error` entries with empty
/// values.
pub fn convert_quote_batch(requested: &[TickerLabel], raw: &str) -> QuoteBatch {
    let document: Value = match serde_json::from_str(raw) {
        Ok(document) => document,
        Err(_) => return QuoteBatch::error("empty quotes response: payload is not valid JSON"),
    };

    let Some(rows) = document
        .pointer("/query/results/quote")
        .map(normalize_to_array)
    else {
        return QuoteBatch::error("empty quotes response: missing query.results.quote");
    };

    // Index upstream rows by their bare symbol so request order wins.
    let mut by_symbol: HashMap<String, &Value> = HashMap::new();
    for row in &rows {
        if let Some(symbol) = row.get("symbol").and_then(Value::as_str) {
            by_symbol.insert(symbol.to_owned(), row);
        }
    }

    let entries = requested
        .iter()
        .map(|label| match by_symbol.get(label.bare()) {
            Some(row) => convert_quote_row(label, row),
            None => QuoteEntry::error(label.original()),
        })
        .collect();

    QuoteBatch::ok(entries)
}

fn normalize_to_array(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(values) => values.iter().collect(),
        other => vec![other],
    }
}

fn convert_quote_row(label: &TickerLabel, row: &Value) -> QuoteEntry {
    let field = |name: &str| value_to_string(row.get(name));

    let flagged = row
        .get(QUOTE_ERROR_FIELD)
        .is_some_and(|value| !value.is_null());
    let exchange = field("StockExchange");
    if flagged || exchange.is_none() {
        return QuoteEntry::error(label.original());
    }

    let short_name = field("Symbol");
    let original_name = match (exchange.as_deref(), short_name.as_deref()) {
        (Some(exchange), Some(symbol)) => Some(format!("{exchange}:{symbol}")),
        _ => None,
    };

    QuoteEntry {
        s: QuoteStatus::Ok,
        n: label.original().to_owned(),
        v: QuoteValues {
            ch: field("ChangeRealtime").or_else(|| field("Change")),
            chp: field("PercentChange")
                .or_else(|| field("ChangeinPercent"))
                .map(|raw| strip_percent(&raw)),
            short_name,
            exchange,
            original_name,
            description: field("Name"),
            lp: field("LastTradePriceOnly"),
            ask: field("AskRealtime"),
            bid: field("BidRealtime"),
            open_price: field("Open"),
            high_price: field("DaysHigh"),
            low_price: field("DaysLow"),
            prev_close_price: field("PreviousClose"),
            volume: field("Volume"),
        },
    }
}

fn value_to_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// `"+1.25%"` / `"-1.25%"` / `"1.25%"` → `"1.25"`.
fn strip_percent(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_suffix = trimmed.strip_suffix('%').unwrap_or(trimmed);
    without_suffix
        .strip_prefix(['+', '-'])
        .unwrap_or(without_suffix)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeriesStatus;

    const PRIMARY_SAMPLE: &str = "Date,Open,High,Low,Close,Volume\n\
        2020-01-03,74.29,75.14,74.13,74.36,146322800\n\
        2020-01-02,74.06,75.15,73.80,75.09,135480400\n";

    #[test]
    fn primary_history_is_ascending_and_ok() {
        let series = convert_primary_history(PRIMARY_SAMPLE);
        assert_eq!(series.status, SeriesStatus::Ok);
        assert_eq!(series.bars.len(), 2);
        assert!(series.bars[0].ts < series.bars[1].ts);
        assert_eq!(series.bars[0].close, 75.09);
        assert_eq!(series.bars[1].close, 74.36);
    }

    #[test]
    fn primary_history_empty_input_is_no_data() {
        assert_eq!(convert_primary_history("").status, SeriesStatus::NoData);
        assert_eq!(
            convert_primary_history("Date,Open,High,Low,Close,Volume\n").status,
            SeriesStatus::NoData
        );
    }

    #[test]
    fn primary_history_bad_field_degrades_to_nan() {
        let raw = "Date,Open,High,Low,Close,Volume\n2020-01-02,74.06,notanumber,73.80,75.09,1000\n";
        let series = convert_primary_history(raw);
        assert_eq!(series.bars.len(), 1);
        assert!(series.bars[0].high.is_nan());
        assert_eq!(series.bars[0].low, 73.80);
    }

    #[test]
    fn primary_history_drops_rows_with_bad_dates() {
        let raw = "Date,Open,High,Low,Close,Volume\nnot-a-date,1,2,3,4,5\n2020-01-02,1,2,1,2,5\n";
        let series = convert_primary_history(raw);
        assert_eq!(series.bars.len(), 1);
        assert_eq!(series.bars[0].ts, parse_day_to_unix("2020-01-02").expect("valid date"));
    }

    fn secondary_sample() -> String {
        serde_json::json!({
            "datatable": {
                "columns": [
                    {"name": "ticker"}, {"name": "date"}, {"name": "open"},
                    {"name": "high"}, {"name": "low"}, {"name": "close"},
                    {"name": "volume"}
                ],
                "data": [
                    ["AAPL", "2020-01-02", 74.06, 75.15, 73.80, 75.09, 135480400.0],
                    ["AAPL", "2020-01-03", 74.29, 75.14, 74.13, 74.36, 146322800.0]
                ]
            }
        })
        .to_string()
    }

    #[test]
    fn secondary_history_maps_columns_by_name() {
        let series = convert_secondary_history(&secondary_sample());
        assert_eq!(series.status, SeriesStatus::Ok);
        assert_eq!(series.bars.len(), 2);
        assert_eq!(series.bars[0].open, 74.06);
        assert_eq!(series.bars[1].volume, 146322800.0);
    }

    #[test]
    fn secondary_history_is_idempotent() {
        let raw = secondary_sample();
        assert_eq!(convert_secondary_history(&raw), convert_secondary_history(&raw));
    }

    #[test]
    fn secondary_history_malformed_payload_degrades_to_empty_ok() {
        for raw in ["not json", "{}", r#"{"datatable":{"columns":[]}}"#] {
            let series = convert_secondary_history(raw);
            assert_eq!(series.status, SeriesStatus::Ok);
            assert!(series.bars.is_empty());
        }
    }

    fn quote_sample() -> String {
        serde_json::json!({
            "query": {
                "results": {
                    "quote": [
                        {
                            "symbol": "IBM",
                            "Symbol": "IBM",
                            "StockExchange": "NYSE",
                            "Name": "International Business Machines",
                            "ChangeRealtime": "+1.50",
                            "PercentChange": "+1.25%",
                            "LastTradePriceOnly": "121.50",
                            "AskRealtime": "121.60",
                            "BidRealtime": "121.40",
                            "Open": "120.00",
                            "DaysHigh": "122.00",
                            "DaysLow": "119.50",
                            "PreviousClose": "120.00",
                            "Volume": "4012345"
                        },
                        {
                            "symbol": "AAPL",
                            "Symbol": "AAPL",
                            "StockExchange": "NASDAQ",
                            "Name": "Apple Inc.",
                            "ChangeinPercent": "-0.40%",
                            "LastTradePriceOnly": "74.36"
                        }
                    ]
                }
            }
        })
        .to_string()
    }

    fn labels(inputs: &[&str]) -> Vec<TickerLabel> {
        inputs.iter().map(|input| TickerLabel::parse(input)).collect()
    }

    #[test]
    fn quote_batch_preserves_request_order() {
        let requested = labels(&["NASDAQ:AAPL", "NYSE:IBM"]);
        let batch = convert_quote_batch(&requested, &quote_sample());
        assert_eq!(batch.s, QuoteStatus::Ok);
        assert_eq!(batch.d.len(), 2);
        assert_eq!(batch.d[0].n, "NASDAQ:AAPL");
        assert_eq!(batch.d[1].n, "NYSE:IBM");
    }

    #[test]
    fn quote_batch_strips_percent_sign_and_plus() {
        let requested = labels(&["NYSE:IBM", "NASDAQ:AAPL"]);
        let batch = convert_quote_batch(&requested, &quote_sample());
        assert_eq!(batch.d[0].v.chp.as_deref(), Some("1.25"));
        assert_eq!(batch.d[1].v.chp.as_deref(), Some("0.40"));
        assert_eq!(
            batch.d[0].v.original_name.as_deref(),
            Some("NYSE:IBM")
        );
    }

    #[test]
    fn quote_row_with_error_token_becomes_error_entry() {
        let raw = serde_json::json!({
            "query": {"results": {"quote": {
                "symbol": "BOGUS",
                "ErrorIndicationreturnedforsymbolchangedinvalid": "No such ticker symbol.",
                "StockExchange": "NYSE"
            }}}
        })
        .to_string();

        let requested = labels(&["NYSE:BOGUS"]);
        let batch = convert_quote_batch(&requested, &raw);
        assert_eq!(batch.d.len(), 1);
        assert_eq!(batch.d[0].s, QuoteStatus::Error);
        assert_eq!(batch.d[0].v, QuoteValues::default());
    }

    #[test]
    fn quote_row_without_exchange_becomes_error_entry() {
        let raw = serde_json::json!({
            "query": {"results": {"quote": {"symbol": "XYZ", "Symbol": "XYZ"}}}
        })
        .to_string();

        let batch = convert_quote_batch(&labels(&["XYZ"]), &raw);
        assert_eq!(batch.d[0].s, QuoteStatus::Error);
    }

    #[test]
    fn missing_wrapper_is_a_batch_error() {
        let batch = convert_quote_batch(&labels(&["NYSE:IBM"]), r#"{"query":{}}"#);
        assert_eq!(batch.s, QuoteStatus::Error);
        assert!(batch.errmsg.as_deref().is_some_and(|m| m.contains("empty quotes response")));
    }

    #[test]
    fn single_quote_object_is_normalized_to_an_array() {
        let raw = serde_json::json!({
            "query": {"results": {"quote": {
                "symbol": "IBM", "Symbol": "IBM", "StockExchange": "NYSE"
            }}}
        })
        .to_string();

        let batch = convert_quote_batch(&labels(&["NYSE:IBM"]), &raw);
        assert_eq!(batch.d.len(), 1);
        assert_eq!(batch.d[0].s, QuoteStatus::Ok);
    }
}
