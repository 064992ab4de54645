// src/exec/compare.rs

use crate::errors::CompareError;

/// Compare captured output with the expected lines.
///
/// Line counts must match; each pair is compared after trimming surrounding
/// whitespace on both sides. Reports the first differing line (1-based).
pub fn compare_outputs(expected: &[String], actual: &[String]) -> Result<(), CompareError> {
    if expected.len() != actual.len() {
        return Err(CompareError::LineCount {
            expected: expected.len(),
            actual: actual.len(),
        });
    }

    for (i, (want, got)) in expected.iter().zip(actual).enumerate() {
        if want.trim() != got.trim() {
            return Err(CompareError::Line {
                line: i + 1,
                expected: want.clone(),
                actual: got.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let expected = lines(&["6", "  hello world"]);
        let actual = lines(&["6  ", "hello world\t"]);
        assert_eq!(compare_outputs(&expected, &actual), Ok(()));
    }

    #[test]
    fn length_mismatch_fails() {
        let err = compare_outputs(&lines(&["1", "2"]), &lines(&["1"])).unwrap_err();
        assert_eq!(
            err,
            CompareError::LineCount {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn first_differing_line_is_reported() {
        let err = compare_outputs(&lines(&["a", "b", "c"]), &lines(&["a", "x", "y"])).unwrap_err();
        match err {
            CompareError::Line { line, expected, actual } => {
                assert_eq!(line, 2);
                assert_eq!(expected, "b");
                assert_eq!(actual, "x");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn inner_whitespace_still_matters() {
        assert!(compare_outputs(&lines(&["1 2"]), &lines(&["1  2"])).is_err());
    }
}
