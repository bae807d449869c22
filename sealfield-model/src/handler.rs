use crate::error::ValidationError;
use crate::record::Record;

/// Optional model-level behavior beyond what individual fields enforce.
///
/// Most models do NOT need this; field validation covers the common cases.
/// Implement it for cross-field rules (e.g. "end date after start date") or
/// to compute derived values after a row is loaded.
pub trait ModelHooks: Send + Sync {
    /// Validate a record after every field has been cleaned.
    fn clean(&self, record: &Record) -> Result<(), ValidationError> {
        let _ = record;
        Ok(())
    }

    /// Called after a record is loaded from storage, before it is returned.
    fn on_after_load(&self, record: &mut Record) {
        let _ = record;
    }
}
