//! Compound validators: And, Or, Not, MutualExclusion (spec §4.C.4).
//!
//! Every subvalidator runs, always. The teacher's `CombinatorSchema`
//! short-circuited `any_of`/`one_of` on the first pass, which silently
//! discarded the remaining subvalidators' diagnostics; this evaluates all of
//! them so a caller can see everything that failed, not just the first.

use serde_json::Value;

use super::context::EvalContext;
use super::VRef;
use crate::error::{ErrorKind, ValidationError, ValidatorTag};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompoundKind {
    And,
    Or,
    Not,
    MutualExclusion,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompoundValidator {
    pub kind: CompoundKind,
    pub subvalidators: Vec<VRef>,
}

impl CompoundValidator {
    pub fn and(subvalidators: Vec<VRef>) -> Self {
        Self {
            kind: CompoundKind::And,
            subvalidators,
        }
    }

    pub fn or(subvalidators: Vec<VRef>) -> Self {
        Self {
            kind: CompoundKind::Or,
            subvalidators,
        }
    }

    pub fn mutual_exclusion(subvalidators: Vec<VRef>) -> Self {
        Self {
            kind: CompoundKind::MutualExclusion,
            subvalidators,
        }
    }

    /// `Not` takes exactly one subvalidator; `sub` is wrapped for symmetry
    /// with the other three constructors.
    pub fn not(sub: VRef) -> Self {
        Self {
            kind: CompoundKind::Not,
            subvalidators: vec![sub],
        }
    }

    pub fn evaluate(&self, value: &Value, ctx: &EvalContext) -> Result<(), ValidationError> {
        match self.kind {
            CompoundKind::And => {
                let errors: Vec<ValidationError> = self
                    .subvalidators
                    .iter()
                    .filter_map(|v| v.evaluate(Some(value), ctx).err())
                    .collect();
                if errors.is_empty() {
                    Ok(())
                } else {
                    Err(ValidationError::new(
                        ErrorKind::CompoundError,
                        ValidatorTag::Compound,
                        "not all subvalidators passed",
                    )
                    .with_value(value.clone())
                    .with_underlying(errors))
                }
            }
            CompoundKind::Or => {
                let results: Vec<Result<(), ValidationError>> = self
                    .subvalidators
                    .iter()
                    .map(|v| v.evaluate(Some(value), ctx))
                    .collect();
                if results.iter().any(Result::is_ok) {
                    Ok(())
                } else {
                    let errors = results.into_iter().filter_map(Result::err).collect();
                    Err(ValidationError::new(
                        ErrorKind::CompoundError,
                        ValidatorTag::Compound,
                        "no subvalidator passed",
                    )
                    .with_value(value.clone())
                    .with_underlying(errors))
                }
            }
            CompoundKind::MutualExclusion => {
                let results: Vec<Result<(), ValidationError>> = self
                    .subvalidators
                    .iter()
                    .map(|v| v.evaluate(Some(value), ctx))
                    .collect();
                let pass_count = results.iter().filter(|r| r.is_ok()).count();
                match pass_count {
                    1 => Ok(()),
                    0 => {
                        let errors = results.into_iter().filter_map(Result::err).collect();
                        Err(ValidationError::new(
                            ErrorKind::CompoundError,
                            ValidatorTag::Compound,
                            "no subvalidator passed",
                        )
                        .with_value(value.clone())
                        .with_underlying(errors))
                    }
                    n => Err(ValidationError::new(
                        ErrorKind::CompoundError,
                        ValidatorTag::Compound,
                        format!("{} subvalidators passed, expected exactly one", n),
                    )
                    .with_value(value.clone())),
                }
            }
            CompoundKind::Not => {
                let sub = &self.subvalidators[0];
                match sub.evaluate(Some(value), ctx) {
                    Ok(()) => Err(ValidationError::new(
                        ErrorKind::CompoundError,
                        ValidatorTag::Compound,
                        "subvalidator passed but Not requires it to fail",
                    )
                    .with_value(value.clone())),
                    Err(_) => Ok(()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::Validator;
    use serde_json::json;
    use std::sync::Arc;

    fn always_fail() -> VRef {
        Arc::new(Validator::AlwaysFail)
    }

    fn always_pass() -> VRef {
        Arc::new(Validator::AlwaysPass)
    }

    #[test]
    fn and_of_empty_passes() {
        let v = CompoundValidator::and(vec![]);
        assert!(v.evaluate(&json!(1), &EvalContext::new()).is_ok());
    }

    #[test]
    fn or_of_empty_fails() {
        let v = CompoundValidator::or(vec![]);
        assert!(v.evaluate(&json!(1), &EvalContext::new()).is_err());
    }

    #[test]
    fn or_runs_every_subvalidator_even_after_a_pass() {
        let v = CompoundValidator::or(vec![always_pass(), always_fail(), always_fail()]);
        assert!(v.evaluate(&json!(1), &EvalContext::new()).is_ok());
    }

    #[test]
    fn mutual_exclusion_requires_exactly_one_pass() {
        let none = CompoundValidator::mutual_exclusion(vec![always_fail(), always_fail()]);
        assert!(none.evaluate(&json!(1), &EvalContext::new()).is_err());

        let one = CompoundValidator::mutual_exclusion(vec![always_pass(), always_fail()]);
        assert!(one.evaluate(&json!(1), &EvalContext::new()).is_ok());

        let both = CompoundValidator::mutual_exclusion(vec![always_pass(), always_pass()]);
        assert!(both.evaluate(&json!(1), &EvalContext::new()).is_err());
    }

    #[test]
    fn not_inverts_its_single_subvalidator() {
        let v = CompoundValidator::not(always_fail());
        assert!(v.evaluate(&json!(1), &EvalContext::new()).is_ok());
        let v = CompoundValidator::not(always_pass());
        assert!(v.evaluate(&json!(1), &EvalContext::new()).is_err());
    }
}
