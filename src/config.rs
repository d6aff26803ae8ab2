//! Configuration for the pair table.

use crate::domain::pair::engine::{DEFAULT_LINK_PREFIX, DEFAULT_PAGE_SIZE};
use crate::domain::pair::SortSpec;
use crate::error::SdkError;
use serde::{Deserialize, Serialize};

/// Pair table settings. Every field has a default, so partial JSON works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Rows per page. Must be non-zero.
    pub page_size: usize,
    /// Initial sort.
    pub sort: SortSpec,
    /// Prefix for row link targets; the pair id is appended.
    pub link_prefix: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            sort: SortSpec::default(),
            link_prefix: DEFAULT_LINK_PREFIX.to_string(),
        }
    }
}

impl TableConfig {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    pub fn validate(&self) -> Result<(), SdkError> {
        if self.page_size == 0 {
            return Err(SdkError::Config("page_size must be greater than zero".into()));
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, SdkError> {
        let config: TableConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
