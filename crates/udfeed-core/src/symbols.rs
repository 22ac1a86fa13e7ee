//! Symbol store seam: the external relational lookup/search collaborator.

use serde::{Deserialize, Serialize};

use crate::StoreError;

/// Descriptor returned by an exact lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    pub description: String,
    pub exchange: String,
    #[serde(rename = "type")]
    pub symbol_type: String,
}

/// One fuzzy-search hit, shaped for the `/search` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolMatch {
    pub symbol: String,
    pub full_name: String,
    pub description: String,
    pub exchange: String,
    #[serde(rename = "type")]
    pub symbol_type: String,
}

/// Read-only symbol store contract. The production implementation lives in
/// `udfeed-symbols`; tests use in-memory fakes.
pub trait SymbolStore: Send + Sync {
    /// Fuzzy search over symbol names and descriptions. Empty `symbol_type`
    /// or `exchange` filters match everything.
    fn search(
        &self,
        query: &str,
        symbol_type: &str,
        exchange: &str,
        limit: usize,
    ) -> Result<Vec<SymbolMatch>, StoreError>;

    /// Exact lookup by symbol name.
    fn lookup(&self, name: &str) -> Result<Option<SymbolInfo>, StoreError>;
}
