//! Registry of root token lists
//!
//! The registry file maps each root list URL to display metadata:
//!
//! ```json
//! {
//!   "https://example.org/tokens.json": { "name": "Example", "homepage": "https://example.org" }
//! }
//! ```
//!
//! It is read once at start-up. Declaration order is kept, it is the order in
//! which roots are handed to the resolver and shown in the overview.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TokenListRegistry {
    entries: IndexMap<String, RegistryEntry>,
    roots: Vec<String>,
}

impl TokenListRegistry {
    pub fn from_entries(entries: IndexMap<String, RegistryEntry>) -> Self {
        let roots = entries.keys().cloned().collect();
        Self { entries, roots }
    }

    pub fn from_json(path: &str, content: &str) -> AppResult<Self> {
        let entries: IndexMap<String, RegistryEntry> = serde_json::from_str(content)
            .map_err(|e| AppError::registry(path, e.to_string()))?;

        for url in entries.keys() {
            let parsed =
                url::Url::parse(url).map_err(|e| AppError::registry(path, format!("{url}: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(AppError::registry(
                    path,
                    format!("{url}: unsupported scheme '{}'", parsed.scheme()),
                ));
            }
        }

        Ok(Self::from_entries(entries))
    }

    /// Load the registry file at `path`
    pub async fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::registry(&source, e.to_string()))?;

        let registry = Self::from_json(&source, &content)?;
        info!("Loaded {} root token lists from {}", registry.len(), source);
        Ok(registry)
    }

    /// Root URLs in declaration order
    pub fn root_urls(&self) -> &[String] {
        &self.roots
    }

    pub fn get(&self, url: &str) -> Option<&RegistryEntry> {
        self.entries.get(url)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RegistryEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
