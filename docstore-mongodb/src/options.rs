//! Translation of per-operation configuration into typed driver options.
//!
//! Per-operation configuration arrives as an untyped BSON document. This
//! module reads the flags the MongoDB driver understands and drops the rest,
//! logging what it skipped.

use bson::{Bson, Document};
use mongodb::options::ReturnDocument;
use tracing::debug;

const RECOGNIZED: [&str; 4] = ["upsert", "sort", "projection", "returnDocument"];

/// Typed view over one operation's configuration document.
pub(crate) struct DriverConfig<'a> {
    config: &'a Document,
}

impl<'a> DriverConfig<'a> {
    pub fn new(config: &'a Document) -> Self {
        for key in config.keys() {
            if !RECOGNIZED.contains(&key.as_str()) {
                debug!(flag = %key, "skipping unrecognized driver flag");
            }
        }

        Self { config }
    }

    pub fn upsert(&self) -> Option<bool> {
        match self.config.get("upsert") {
            Some(Bson::Boolean(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn sort(&self) -> Option<Document> {
        self.document("sort")
    }

    pub fn projection(&self) -> Option<Document> {
        self.document("projection")
    }

    /// The find-and-modify return image. Updated and replaced records are
    /// returned post-image unless the configuration asks for the pre-image.
    pub fn return_document(&self) -> ReturnDocument {
        match self.config.get("returnDocument") {
            Some(Bson::String(s)) if s == "before" => ReturnDocument::Before,
            _ => ReturnDocument::After,
        }
    }

    fn document(&self, key: &str) -> Option<Document> {
        match self.config.get(key) {
            Some(Bson::Document(value)) => Some(value.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn reads_recognized_flags() {
        let config = doc! {
            "upsert": true,
            "sort": { "name": 1 },
            "returnDocument": "before",
            "writeConcern": { "w": "majority" },
        };
        let config = DriverConfig::new(&config);

        assert_eq!(config.upsert(), Some(true));
        assert_eq!(config.sort(), Some(doc! { "name": 1 }));
        assert_eq!(config.projection(), None);
        assert!(matches!(config.return_document(), ReturnDocument::Before));
    }

    #[test]
    fn defaults_to_post_image() {
        let config = doc! {};

        assert!(matches!(
            DriverConfig::new(&config).return_document(),
            ReturnDocument::After
        ));
    }
}
