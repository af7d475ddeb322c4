//! Final check run once per rule, after the last directive.

use super::descriptor::RuleDescriptor;
use crate::error::ValidationError;

/// Reject a descriptor that no directive ever touched.
///
/// The directive parser already enforces well-formed values, so being
/// configured is the only remaining requirement.
///
/// # Errors
///
/// Returns `ValidationError::Unconfigured` if no directive was applied.
pub fn finalize(descriptor: &RuleDescriptor) -> Result<(), ValidationError> {
    if descriptor.is_configured() {
        Ok(())
    } else {
        Err(ValidationError::Unconfigured)
    }
}
