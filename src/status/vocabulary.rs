//! Status vocabulary.
//!
//! Maps the tokens the TestRunner and the Framework Testsuite actually
//! emit onto the canonical [`Status`] variants, and scans free-form log
//! text for embedded tokens. Some tokens look like duplicates (`Pass`
//! vs `Passed`); the duplication is real, the Framework Testsuite still
//! emits the long forms.

use lazy_static::lazy_static;
use regex::Regex;

use crate::status::lattice::Status;

lazy_static! {
    /// Token patterns in scan precedence order. The order reproduces
    /// the TestRunner's token list walked back-to-front and is not a
    /// severity ranking: `Off` is checked before `Error`, so a line
    /// naming both resolves to `Off`.
    static ref TOKEN_PATTERNS: Vec<(Regex, Status)> = vec![
        (Regex::new("Wrong Embedded OS").unwrap(), Status::WrongOs),
        (Regex::new("Skipped").unwrap(), Status::Skipped),
        (Regex::new("Off").unwrap(), Status::Off),
        (Regex::new("Fatal").unwrap(), Status::Error),
        (Regex::new("Failed").unwrap(), Status::Error),
        (Regex::new("Fail").unwrap(), Status::Error),
        (Regex::new("Error").unwrap(), Status::Error),
        (Regex::new("Warning").unwrap(), Status::Warning),
        (Regex::new("Passed").unwrap(), Status::Pass),
        (Regex::new("Pass").unwrap(), Status::Pass),
    ];
}

/// Parse a raw status token, folding legacy synonyms onto the canonical
/// variant. Matching is case-sensitive, as the legacy runner's was.
pub fn status_from_token(token: &str) -> Option<Status> {
    match token {
        "Pass" | "Passed" => Some(Status::Pass),
        "Warning" => Some(Status::Warning),
        "Error" | "Fail" | "Failed" | "Fatal" => Some(Status::Error),
        "Off" => Some(Status::Off),
        "Skipped" => Some(Status::Skipped),
        "Wrong Embedded OS" => Some(Status::WrongOs),
        _ => None,
    }
}

/// First vocabulary token present in `text`, checking tokens in their
/// fixed precedence order, or `None` if the text carries no token at
/// all.
///
/// This is a plain substring scan, not a word match; log lines have
/// always been treated that way. Position in the text does not matter,
/// only position in the vocabulary: the first token that appears
/// anywhere wins. `None` and "a token was found" are different answers
/// on purpose: a silent log must not drag a test down to `Skipped`.
pub fn first_token_in(text: &str) -> Option<Status> {
    TOKEN_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, status)| *status)
}
