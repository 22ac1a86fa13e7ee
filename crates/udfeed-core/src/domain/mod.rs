//! Canonical UDF wire types.
//!
//! These are the fixed shapes of the UDF protocol: the column-array history
//! series, the quote batch, and the small set of accepted resolutions.

mod quote;
mod resolution;
mod series;
mod ticker;

pub use quote::{QuoteBatch, QuoteEntry, QuoteStatus, QuoteValues};
pub use resolution::Resolution;
pub use series::{Bar, Series, SeriesStatus, UdfSeries};
pub use ticker::TickerLabel;
