//! Named reference to another validator, supporting cyclic schemas (spec
//! §4.C.11, §9).
//!
//! Construction is two-phase: a reference is built with an empty
//! [`OnceLock`] cell before its target exists, and [`ReferenceValidator::resolve`]
//! fills the cell once the referent has been lowered. This is what lets a
//! schema like `{"$ref": "#"}` refer to its own enclosing node.

use std::sync::{Arc, OnceLock};

use serde_json::Value;

use super::context::EvalContext;
use super::VRef;
use crate::error::{ErrorKind, ValidationError, ValidatorTag};

#[derive(Clone)]
pub struct ReferenceValidator {
    pub name: String,
    target: Arc<OnceLock<VRef>>,
}

impl std::fmt::Debug for ReferenceValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ReferenceValidator").field(&self.name).finish()
    }
}

/// Two references are equal iff they name the same target. Comparing into
/// `target`'s contents would recurse back through the cycle the reference
/// exists to break.
impl PartialEq for ReferenceValidator {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl ReferenceValidator {
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: Arc::new(OnceLock::new()),
        }
    }

    /// Fills in the target. A no-op if already resolved.
    pub fn resolve(&self, target: VRef) {
        let _ = self.target.set(target);
    }

    pub fn is_resolved(&self) -> bool {
        self.target.get().is_some()
    }

    pub fn evaluate(&self, value: &Value, ctx: &EvalContext) -> Result<(), ValidationError> {
        if ctx.depth >= ctx.max_depth {
            return Err(ValidationError::new(
                ErrorKind::CompoundError,
                ValidatorTag::Reference,
                format!(
                    "maximum reference depth {} exceeded resolving '{}'",
                    ctx.max_depth, self.name
                ),
            )
            .with_value(value.clone()));
        }
        let target = self
            .target
            .get()
            .unwrap_or_else(|| panic!("reference '{}' used before being resolved", self.name));
        let child_ctx = ctx.enter();
        target.evaluate(Some(value), &child_ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::Validator;
    use serde_json::json;

    #[test]
    fn resolves_and_delegates() {
        let r = ReferenceValidator::unresolved("#");
        r.resolve(Arc::new(Validator::AlwaysPass));
        assert!(r.is_resolved());
        assert!(r.evaluate(&json!(1), &EvalContext::new()).is_ok());
    }

    #[test]
    fn self_cycle_is_bounded_by_max_depth() {
        let r = ReferenceValidator::unresolved("#");
        r.resolve(Arc::new(Validator::Reference(r.clone())));
        let ctx = EvalContext::new().with_max_depth(4);
        let err = r.evaluate(&json!(1), &ctx).unwrap_err();
        assert_eq!(err.failing_validator, ValidatorTag::Reference);
    }

    #[test]
    fn equality_is_by_name_not_target() {
        let a = ReferenceValidator::unresolved("x");
        let b = ReferenceValidator::unresolved("x");
        assert_eq!(a, b);
        let c = ReferenceValidator::unresolved("y");
        assert_ne!(a, c);
    }
}
