use serde::{Deserialize, Serialize};

/// One OHLCV sample. Volume is kept as a float because upstream feeds report
/// fractional volume for some instruments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Seconds since the Unix epoch, UTC.
    pub ts: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Series status tag carried on the wire (`s` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesStatus {
    Ok,
    NoData,
    Error,
}

/// An ordered OHLCV series plus its status tag.
///
/// Invariant: bars are ascending by timestamp. Converters are responsible for
/// producing that order; the series itself never re-sorts.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub status: SeriesStatus,
    pub bars: Vec<Bar>,
}

impl Series {
    /// Series from converted bars; an empty bar list is tagged `no_data`.
    pub fn from_bars(bars: Vec<Bar>) -> Self {
        let status = if bars.is_empty() {
            SeriesStatus::NoData
        } else {
            SeriesStatus::Ok
        };
        Self { status, bars }
    }

    /// Empty series that still reports `ok`. Used by the secondary converter,
    /// where malformed upstream data degrades instead of failing the request.
    pub fn empty_ok() -> Self {
        Self {
            status: SeriesStatus::Ok,
            bars: Vec::new(),
        }
    }

    pub fn ok_with(bars: Vec<Bar>) -> Self {
        Self {
            status: SeriesStatus::Ok,
            bars,
        }
    }

    /// UDF column-array wire form.
    pub fn to_wire(&self) -> UdfSeries {
        let mut wire = UdfSeries::empty(self.status);
        for bar in &self.bars {
            wire.t.push(bar.ts);
            wire.o.push(bar.open);
            wire.h.push(bar.high);
            wire.l.push(bar.low);
            wire.c.push(bar.close);
            wire.v.push(bar.volume);
        }
        wire
    }

    /// Serialized wire payload, as returned to the charting client.
    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_wire())
    }
}

/// The fixed UDF history schema: parallel columns plus a status tag.
///
/// Non-finite floats (the fail-soft slots) serialize as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UdfSeries {
    pub s: SeriesStatus,
    pub t: Vec<i64>,
    pub o: Vec<f64>,
    pub h: Vec<f64>,
    pub l: Vec<f64>,
    pub c: Vec<f64>,
    pub v: Vec<f64>,
}

impl UdfSeries {
    pub fn empty(status: SeriesStatus) -> Self {
        Self {
            s: status,
            t: Vec::new(),
            o: Vec::new(),
            h: Vec::new(),
            l: Vec::new(),
            c: Vec::new(),
            v: Vec::new(),
        }
    }
}
