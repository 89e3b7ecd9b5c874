//! Property tests for the split rules.

use gnb_transform::{TransformError, split_extract, split_join};
use proptest::prelude::*;

proptest! {
    #[test]
    fn split_extract_returns_the_indexed_token(
        tokens in prop::collection::vec("[A-Za-z0-9 _-]{0,8}", 1..6),
        index in 0usize..8,
    ) {
        let joined = tokens.join("/");
        match split_extract(&joined, "/", index) {
            Ok(token) => prop_assert_eq!(&token, &tokens[index]),
            Err(TransformError::SplitIndex { tokens: count, .. }) => {
                prop_assert!(index >= tokens.len());
                prop_assert_eq!(count, tokens.len());
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    #[test]
    fn split_join_never_exceeds_requested_range(
        tokens in prop::collection::vec("[A-Za-z]{1,6}", 0..6),
        start in 0usize..4,
        width in 0usize..4,
    ) {
        let joined = tokens.join(" / ");
        let result = split_join(&joined, "/", start..start + width, ": ");
        let expected: Vec<&str> = tokens
            .iter()
            .map(String::as_str)
            .skip(start)
            .take(width)
            .collect();
        if tokens.is_empty() {
            return Ok(());
        }
        if expected.is_empty() {
            prop_assert!(result.is_none());
        } else {
            prop_assert_eq!(result, Some(expected.join(": ")));
        }
    }
}

#[test]
fn virus_name_isolate_token() {
    assert_eq!(
        split_extract("achcov19/Xla/XC81/2121", "/", 2).unwrap(),
        "XC81"
    );
    assert_eq!(
        split_extract("hCoV-19/USA/CA-LAB-1/2021", "/", 2).unwrap(),
        "CA-LAB-1"
    );
}
