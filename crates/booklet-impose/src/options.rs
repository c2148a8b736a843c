use crate::layout::verify_pattern_table;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Complete configuration for an imposition job
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ImpositionOptions {
    /// Logical pages per printed sheet face (2 or 4 in config files)
    pub layout: SheetLayout,

    /// Pages per folded signature (4, 8, 16 or 32 in config files)
    pub signature_size: SignatureSize,

    /// Stamp running page numbers before imposing
    pub page_numbers: bool,
}

impl ImpositionOptions {
    pub fn new(layout: SheetLayout, signature_size: SignatureSize) -> Self {
        Self {
            layout,
            signature_size,
            page_numbers: false,
        }
    }

    pub fn with_page_numbers(mut self, page_numbers: bool) -> Self {
        self.page_numbers = page_numbers;
        self
    }

    /// Load options from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| BookletError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| BookletError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Check that the pattern table has a valid entry for this configuration
    pub fn validate(&self) -> Result<()> {
        verify_pattern_table()
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::{Deserialize, Serialize};

    // Config files use the numbers people pick in the UI (2/4 up, 4..32 pages)
    impl Serialize for SheetLayout {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_u64(self.up() as u64)
        }
    }

    impl<'de> Deserialize<'de> for SheetLayout {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let up = usize::deserialize(deserializer)?;
            SheetLayout::try_from(up).map_err(serde::de::Error::custom)
        }
    }

    impl Serialize for SignatureSize {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_u64(self.pages() as u64)
        }
    }

    impl<'de> Deserialize<'de> for SignatureSize {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let pages = usize::deserialize(deserializer)?;
            SignatureSize::try_from(pages).map_err(serde::de::Error::custom)
        }
    }
}
