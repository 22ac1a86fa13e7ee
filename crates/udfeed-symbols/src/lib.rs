//! DuckDB-backed symbol store.
//!
//! Holds the canonical symbol universe behind [`SymbolStore`]: exact lookup
//! for `/symbols` and history resolution, fuzzy search for `/search`.

pub mod migrations;

use std::path::Path;
use std::sync::Mutex;

use duckdb::{params, Connection};

use udfeed_core::{StoreError, SymbolInfo, SymbolMatch, SymbolStore};

/// Upper bound applied to `/search` result sets regardless of the caller's
/// requested limit.
pub const MAX_SEARCH_RESULTS: usize = 500;

pub struct SymbolDb {
    connection: Mutex<Connection>,
}

impl SymbolDb {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let connection = Connection::open(path.as_ref()).map_err(to_store_error)?;
        Self::from_connection(connection)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let connection = Connection::open_in_memory().map_err(to_store_error)?;
        Self::from_connection(connection)
    }

    fn from_connection(connection: Connection) -> Result<Self, StoreError> {
        migrations::apply_migrations(&connection).map_err(to_store_error)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn upsert(&self, info: &SymbolInfo) -> Result<(), StoreError> {
        let connection = self.lock();
        connection
            .execute(
                "INSERT OR REPLACE INTO symbol_infos (name, description, exchange, symbol_type) \
                 VALUES (?, ?, ?, ?)",
                params![info.name, info.description, info.exchange, info.symbol_type],
            )
            .map_err(to_store_error)?;
        Ok(())
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        let connection = self.lock();
        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM symbol_infos", [], |row| row.get(0))
            .map_err(to_store_error)?;
        Ok(count as usize)
    }

    /// Populate a small demo universe so a fresh install answers queries.
    pub fn seed_demo(&self) -> Result<(), StoreError> {
        const DEMO: &[(&str, &str, &str, &str)] = &[
            ("AAPL", "Apple Inc.", "NASDAQ", "stock"),
            ("MSFT", "Microsoft Corporation", "NASDAQ", "stock"),
            ("GOOG", "Alphabet Inc.", "NASDAQ", "stock"),
            ("IBM", "International Business Machines", "NYSE", "stock"),
            ("GE", "General Electric Company", "NYSE", "stock"),
            ("SPY", "SPDR S&P 500 ETF Trust", "NYSEARCA", "index"),
        ];

        for (name, description, exchange, symbol_type) in DEMO {
            self.upsert(&SymbolInfo {
                name: (*name).to_owned(),
                description: (*description).to_owned(),
                exchange: (*exchange).to_owned(),
                symbol_type: (*symbol_type).to_owned(),
            })?;
        }

        tracing::info!(count = DEMO.len(), "seeded demo symbol universe");
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        match self.connection.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl SymbolStore for SymbolDb {
    fn search(
        &self,
        query: &str,
        symbol_type: &str,
        exchange: &str,
        limit: usize,
    ) -> Result<Vec<SymbolMatch>, StoreError> {
        let connection = self.lock();
        let pattern = format!("%{}%", query.trim().to_uppercase());
        let limit = limit.clamp(1, MAX_SEARCH_RESULTS);

        // The limit is formatted in directly; it is a clamped integer, never
        // caller text. Everything caller-supplied goes through placeholders.
        let sql = format!(
            "SELECT name, description, exchange, symbol_type FROM symbol_infos \
             WHERE (upper(name) LIKE ?1 OR upper(description) LIKE ?1) \
               AND (?2 = '' OR symbol_type = ?2) \
               AND (?3 = '' OR exchange = ?3) \
             ORDER BY name \
             LIMIT {limit}"
        );

        let mut statement = connection.prepare(&sql).map_err(to_store_error)?;
        let rows = statement
            .query_map(params![pattern, symbol_type, exchange], |row| {
                let name: String = row.get(0)?;
                let description: String = row.get(1)?;
                let exchange: String = row.get(2)?;
                let symbol_type: String = row.get(3)?;
                Ok(SymbolMatch {
                    full_name: format!("{exchange}:{name}"),
                    symbol: name,
                    description,
                    exchange,
                    symbol_type,
                })
            })
            .map_err(to_store_error)?;

        let mut matches = Vec::new();
        for row in rows {
            matches.push(row.map_err(to_store_error)?);
        }
        Ok(matches)
    }

    fn lookup(&self, name: &str) -> Result<Option<SymbolInfo>, StoreError> {
        let connection = self.lock();
        let mut statement = connection
            .prepare(
                "SELECT name, description, exchange, symbol_type FROM symbol_infos \
                 WHERE upper(name) = upper(?)",
            )
            .map_err(to_store_error)?;

        let mut rows = statement
            .query_map([name.trim()], |row| {
                Ok(SymbolInfo {
                    name: row.get(0)?,
                    description: row.get(1)?,
                    exchange: row.get(2)?,
                    symbol_type: row.get(3)?,
                })
            })
            .map_err(to_store_error)?;

        match rows.next() {
            Some(row) => Ok(Some(row.map_err(to_store_error)?)),
            None => Ok(None),
        }
    }
}

fn to_store_error(error: duckdb::Error) -> StoreError {
    StoreError(error.to_string())
}
