/// A caller-supplied ticker label, conventionally `EXCHANGE:SYMBOL`.
///
/// Only the bare symbol after the last `:` is sent upstream; the original
/// label is what the client expects back in the `n` field of a quote entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerLabel {
    original: String,
    bare: String,
}

impl TickerLabel {
    pub fn parse(input: &str) -> Self {
        let original = input.trim().to_owned();
        let bare = match original.rfind(':') {
            Some(index) => original[index + 1..].to_owned(),
            None => original.clone(),
        };
        Self { original, bare }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn bare(&self) -> &str {
        &self.bare
    }
}
