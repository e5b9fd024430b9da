use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Social profile payload exactly as the social API returned it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawSocialProfile(pub Value);

/// Wallet summary payload keyed by result name ("Native Balance Result", ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawWalletSummary(pub Value);

/// One vault collection (groups or messages). Accepts a bare array or an
/// `{ "items": [...] }` envelope; any other shape reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawVaultItems(pub Value);

impl RawSocialProfile {
    pub fn empty() -> Self {
        Self(Value::Null)
    }
}

impl RawWalletSummary {
    pub fn empty() -> Self {
        Self(Value::Null)
    }
}

impl RawVaultItems {
    pub fn empty() -> Self {
        Self(Value::Array(Vec::new()))
    }

    pub fn from_items(items: Vec<Value>) -> Self {
        Self(Value::Array(items))
    }

    /// The item list, unwrapping the `items` envelope when present.
    pub fn items(&self) -> &[Value] {
        match &self.0 {
            Value::Array(items) => items,
            Value::Object(map) => match map.get("items") {
                Some(Value::Array(items)) => items,
                _ => &[],
            },
            _ => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

impl From<Value> for RawSocialProfile {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<Value> for RawWalletSummary {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<Value> for RawVaultItems {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
