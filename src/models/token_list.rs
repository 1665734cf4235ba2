use serde::{Deserialize, Serialize};
use serde_json::Number;

/// One asset entry of a token list
///
/// Deserialization doubles as shape validation: a record without `name`,
/// `symbol` or `address`, or with a non-numeric `decimals`, is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub name: String,
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub address: String,
    /// Any JSON number; lists in the wild carry `8.0` as well as `8`
    pub decimals: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(rename = "logoURI", default, skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
}

/// A token list document, optionally referencing further token lists
///
/// Unknown fields (`timestamp`, `version`, `keywords`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenListDocument {
    pub name: String,
    #[serde(rename = "logoURI", default, skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
    pub tokens: Vec<TokenRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lists: Option<Vec<String>>,
}

impl TokenRecord {
    /// Case-insensitive match on address, identifier or symbol
    ///
    /// `normalized_key` must already be trimmed and lower-cased.
    pub fn matches_key(&self, normalized_key: &str) -> bool {
        self.address.to_lowercase() == normalized_key
            || self
                .identifier
                .as_deref()
                .is_some_and(|identifier| identifier.to_lowercase() == normalized_key)
            || self.symbol.to_lowercase() == normalized_key
    }
}

impl TokenListDocument {
    /// Referenced token lists, empty when the document has none
    pub fn nested_lists(&self) -> &[String] {
        self.lists.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token(address: &str, identifier: Option<&str>, symbol: &str) -> TokenRecord {
        TokenRecord {
            name: "Foo".to_string(),
            symbol: symbol.to_string(),
            identifier: identifier.map(str::to_string),
            address: address.to_string(),
            decimals: Number::from(8u32),
            tags: None,
            logo_uri: None,
        }
    }

    #[test]
    fn test_matches_any_field_case_insensitively() {
        let record = token("BTKN1AAA", Some("Foo-Token"), "FOO");
        assert!(record.matches_key("btkn1aaa"));
        assert!(record.matches_key("foo-token"));
        assert!(record.matches_key("foo"));
        assert!(!record.matches_key("bar"));
    }

    #[test]
    fn test_missing_identifier_never_matches_empty_key() {
        let record = token("btkn1aaa", None, "FOO");
        assert!(!record.matches_key(""));
    }

    #[test]
    fn test_document_shape_validation() {
        let valid = json!({
            "name": "L1",
            "timestamp": "2025-01-01T00:00:00Z",
            "tokens": [{"name": "Foo", "symbol": "FOO", "address": "btkn1aaa", "decimals": 8,
                        "logoURI": "https://img.example/foo.png"}],
            "lists": ["https://lists.example/b.json"]
        });
        let document: TokenListDocument = serde_json::from_value(valid).unwrap();
        assert_eq!(document.tokens[0].logo_uri.as_deref(), Some("https://img.example/foo.png"));
        assert_eq!(document.nested_lists().len(), 1);

        let missing_tokens = json!({"name": "L1"});
        assert!(serde_json::from_value::<TokenListDocument>(missing_tokens).is_err());

        let bad_decimals = json!({
            "name": "L1",
            "tokens": [{"name": "Foo", "symbol": "FOO", "address": "btkn1aaa", "decimals": "8"}]
        });
        assert!(serde_json::from_value::<TokenListDocument>(bad_decimals).is_err());

        let missing_address = json!({
            "name": "L1",
            "tokens": [{"name": "Foo", "symbol": "FOO", "decimals": 8}]
        });
        assert!(serde_json::from_value::<TokenListDocument>(missing_address).is_err());
    }

    #[test]
    fn test_any_numeric_decimals_is_accepted() {
        let document: TokenListDocument = serde_json::from_value(json!({
            "name": "L1",
            "tokens": [
                {"name": "Float", "symbol": "FLT", "address": "btkn1flt", "decimals": 8.0},
                {"name": "Negative", "symbol": "NEG", "address": "btkn1neg", "decimals": -2},
                {"name": "Plain", "symbol": "PLN", "address": "btkn1pln", "decimals": 6}
            ]
        }))
        .unwrap();

        assert_eq!(document.tokens.len(), 3);
        assert_eq!(document.tokens[0].decimals.as_f64(), Some(8.0));
        assert_eq!(document.tokens[1].decimals.as_i64(), Some(-2));

        let value = serde_json::to_value(&document.tokens[2]).unwrap();
        assert_eq!(value["decimals"], 6);
    }

    #[test]
    fn test_serializes_with_original_field_names() {
        let mut record = token("btkn1aaa", None, "FOO");
        record.logo_uri = Some("ipfs://cid/foo.png".to_string());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["logoURI"], "ipfs://cid/foo.png");
        assert!(value.get("identifier").is_none());
        assert!(value.get("tags").is_none());
    }
}
