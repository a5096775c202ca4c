//! Block validator: an arbitrary closure predicate (spec §4.C.11).

use std::sync::Arc;

use serde_json::Value;

use crate::error::ValidationError;

#[derive(Clone)]
pub struct BlockValidator {
    name: String,
    f: Arc<dyn Fn(&Value) -> Result<(), ValidationError> + Send + Sync>,
}

impl std::fmt::Debug for BlockValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BlockValidator").field(&self.name).finish()
    }
}

/// Two blocks are equal iff they share the same closure allocation. Blocks
/// are opaque Rust closures, not data, so this is the only equality a
/// `Validator` tree can offer them.
impl PartialEq for BlockValidator {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.f, &other.f)
    }
}

impl BlockValidator {
    pub fn new(
        name: impl Into<String>,
        f: impl Fn(&Value) -> Result<(), ValidationError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        (self.f)(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, ValidatorTag};
    use serde_json::json;

    #[test]
    fn runs_the_closure() {
        let v = BlockValidator::new("even", |value| {
            if value.as_i64().is_some_and(|n| n % 2 == 0) {
                Ok(())
            } else {
                Err(ValidationError::new(ErrorKind::FormatMismatch, ValidatorTag::Block, "odd"))
            }
        });
        assert!(v.validate(&json!(4)).is_ok());
        assert!(v.validate(&json!(5)).is_err());
    }

    #[test]
    fn equality_is_by_closure_identity_not_behavior() {
        let a = BlockValidator::new("a", |_| Ok(()));
        let b = BlockValidator::new("a", |_| Ok(()));
        assert_ne!(a, b);
        let c = a.clone();
        assert_eq!(a, c);
    }
}
