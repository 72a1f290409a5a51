//! Status ordering and folding.
//!
//! Every level of the aggregation hierarchy (test, OS, chassis, run)
//! carries one status, and combining two results always keeps the worse
//! one. The ranking was inherited from the old low-level regression
//! code and is load-bearing: the website colors rows off these exact
//! strings.

use std::fmt;

use crate::error::MergeError;
use crate::status::vocabulary::status_from_token;

/// Aggregate status of a test, OS, chassis, or run.
///
/// Variant order is severity order (best first), so the derived `Ord`
/// is the fold: `a.max(b)` is the worse of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    Skipped,
    Off,
    WrongOs,
    Pass,
    Warning,
    Error,
}

impl Status {
    /// Canonical wire text, exactly as archived records carry it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Skipped => "Skipped",
            Status::Off => "Off",
            Status::WrongOs => "Wrong Embedded OS",
            Status::Pass => "Pass",
            Status::Warning => "Warning",
            Status::Error => "Error",
        }
    }

    /// Combine with another status, keeping the worse of the two.
    pub fn worse(self, other: Status) -> Status {
        self.max(other)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Worse of two raw status tokens.
///
/// Operands are matched against the full legacy vocabulary, synonyms
/// included. A single unrecognized operand loses to a recognized one,
/// which lets callers fold unvetted strings without pre-checking; two
/// unrecognized operands are a caller bug.
pub fn worse(a: &str, b: &str) -> Result<Status, MergeError> {
    match (status_from_token(a), status_from_token(b)) {
        (Some(sa), Some(sb)) => Ok(sa.worse(sb)),
        (Some(sa), None) => Ok(sa),
        (None, Some(sb)) => Ok(sb),
        (None, None) => Err(MergeError::InvalidStatus {
            left: a.to_string(),
            right: b.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL: [Status; 6] = [
        Status::Skipped,
        Status::Off,
        Status::WrongOs,
        Status::Pass,
        Status::Warning,
        Status::Error,
    ];

    #[test]
    fn test_severity_order() {
        assert!(Status::Skipped < Status::Off);
        assert!(Status::Off < Status::WrongOs);
        assert!(Status::WrongOs < Status::Pass);
        assert!(Status::Pass < Status::Warning);
        assert!(Status::Warning < Status::Error);
    }

    #[test]
    fn test_canonical_texts() {
        assert_eq!(Status::WrongOs.as_str(), "Wrong Embedded OS");
        assert_eq!(Status::Pass.to_string(), "Pass");
        assert_eq!(Status::Error.to_string(), "Error");
    }

    #[test]
    fn test_worse_both_recognized() {
        assert_eq!(worse("Pass", "Error").unwrap(), Status::Error);
        assert_eq!(worse("Warning", "Pass").unwrap(), Status::Warning);
        assert_eq!(worse("Skipped", "Off").unwrap(), Status::Off);
    }

    #[test]
    fn test_worse_folds_synonyms() {
        // Legacy tokens land on the canonical variant before comparing.
        assert_eq!(worse("Passed", "Pass").unwrap(), Status::Pass);
        assert_eq!(worse("Fail", "Warning").unwrap(), Status::Error);
        assert_eq!(worse("Fatal", "Failed").unwrap(), Status::Error);
    }

    #[test]
    fn test_worse_one_unrecognized() {
        assert_eq!(worse("definitely not a status", "Warning").unwrap(), Status::Warning);
        assert_eq!(worse("Off", "").unwrap(), Status::Off);
    }

    #[test]
    fn test_worse_both_unrecognized() {
        let err = worse("Bogus", "Nope").unwrap_err();
        assert!(matches!(err, MergeError::InvalidStatus { .. }));
    }

    fn any_status() -> impl Strategy<Value = Status> {
        prop::sample::select(ALL.to_vec())
    }

    fn any_token() -> impl Strategy<Value = String> {
        prop_oneof![
            prop::sample::select(vec![
                "Pass", "Passed", "Warning", "Error", "Fail", "Failed", "Fatal", "Off",
                "Skipped", "Wrong Embedded OS",
            ])
            .prop_map(str::to_string),
            "[a-z]{1,8}",
        ]
    }

    proptest! {
        #[test]
        fn fold_is_commutative_and_associative(a in any_status(), b in any_status(), c in any_status()) {
            prop_assert_eq!(a.worse(b), b.worse(a));
            prop_assert_eq!(a.worse(b).worse(c), a.worse(b.worse(c)));
        }

        #[test]
        fn fold_never_improves(a in any_status(), b in any_status()) {
            let folded = a.worse(b);
            prop_assert!(folded >= a);
            prop_assert!(folded >= b);
        }

        #[test]
        fn token_fold_is_commutative(a in any_token(), b in any_token()) {
            match (worse(&a, &b), worse(&b, &a)) {
                (Ok(x), Ok(y)) => prop_assert_eq!(x, y),
                (Err(_), Err(_)) => {}
                _ => prop_assert!(false, "one direction failed, the other did not"),
            }
        }
    }
}
