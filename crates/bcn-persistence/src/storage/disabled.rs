//! Storage for hosts that provide none.

use crate::error::{DraftError, Result};
use crate::storage::DraftStorage;

/// Every operation fails with [`DraftError::Unavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledStorage;

impl DraftStorage for DisabledStorage {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(DraftError::Unavailable)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(DraftError::Unavailable)
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(DraftError::Unavailable)
    }
}
