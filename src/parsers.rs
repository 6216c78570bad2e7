//! Challenge-text parsing: the 3x3 object list and the two-image phrasing gate.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::core::error::SolverError;

/// Which of the two displayed images the answer points target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoImageTarget {
    First,
    Second,
}

/// Pull the quoted, comma-separated object names out of a 3x3 challenge
/// sentence, preserving order.
///
/// ex:
///   input:  `Click on the corresponding images in the following order: 'television','strawberry','peach'`
///   output: `["television", "strawberry", "peach"]`
pub fn objects_of_interest(challenge: &str) -> Vec<String> {
    static QUOTED_RE: OnceLock<Regex> = OnceLock::new();
    let re = QUOTED_RE.get_or_init(|| Regex::new(r"'([\w\s]+?)'").unwrap());
    let objects: Vec<String> = re
        .captures_iter(challenge)
        .map(|c| c[1].to_string())
        .collect();
    debug!(text = challenge, ?objects, "parsed objects of interest");
    objects
}

/// Only English "left to right" / "right to left" phrasings are supported.
/// Anything else must be refreshed, never guessed at.
pub fn two_image_challenge_is_supported(challenge_text: &str) -> bool {
    let lower = challenge_text.to_lowercase();
    let supported = lower.contains("left to right") || lower.contains("right to left");
    debug!(text = challenge_text, supported, "two-image phrasing gate");
    supported
}

/// Decide which image the click targets belong to, from the relative order of
/// "figure 1" and "figure 2" in the challenge text. Raises when either marker
/// is missing rather than picking one at random.
pub fn two_image_target(challenge_text: &str) -> Result<TwoImageTarget, SolverError> {
    let lower = challenge_text.to_lowercase();
    let figure_1 = lower.find("figure 1");
    let figure_2 = lower.find("figure 2");
    match (figure_1, figure_2) {
        (Some(i1), Some(i2)) if i1 < i2 => Ok(TwoImageTarget::First),
        (Some(_), Some(_)) => Ok(TwoImageTarget::Second),
        _ => Err(SolverError::UnsupportedPhrasing(format!(
            "could not find 'figure 1' and 'figure 2' in challenge text: {challenge_text}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ordered_object_list() {
        let text =
            "Click on the corresponding images in the following order: 'television','strawberry','peach'";
        assert_eq!(
            objects_of_interest(text),
            vec!["television", "strawberry", "peach"]
        );
    }

    #[test]
    fn object_list_keeps_multi_word_names() {
        let text = "order: 'fire hydrant','dog'";
        assert_eq!(objects_of_interest(text), vec!["fire hydrant", "dog"]);
    }

    #[test]
    fn object_list_empty_when_nothing_quoted() {
        assert!(objects_of_interest("no quotes here").is_empty());
    }

    #[test]
    fn phrasing_gate_accepts_both_directions_case_insensitive() {
        assert!(two_image_challenge_is_supported(
            "Swipe the pieces from Left To Right in figure 1"
        ));
        assert!(two_image_challenge_is_supported(
            "click RIGHT TO LEFT as shown"
        ));
        assert!(!two_image_challenge_is_supported(
            "Fare clic sulle immagini nell'ordine"
        ));
    }

    #[test]
    fn target_follows_figure_order() {
        assert_eq!(
            two_image_target("In figure 1, click the items shown in figure 2").unwrap(),
            TwoImageTarget::First
        );
        assert_eq!(
            two_image_target("Items from figure 2 must be clicked in figure 1... wait, figure 2 first")
                .unwrap(),
            TwoImageTarget::Second
        );
    }

    #[test]
    fn target_raises_when_markers_missing() {
        let err = two_image_target("click the image on the left").unwrap_err();
        assert!(matches!(err, SolverError::UnsupportedPhrasing(_)));
    }
}
