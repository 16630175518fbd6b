//! Textual heap-layout format.
//!
//! One slot per line, coordinates separated by commas. `n/a` or `-` marks an
//! absent slot. Blank lines and lines starting with `#` are ignored.
//!
//! ```text
//! # root, left child, no right child
//! 0, 0, 0
//! -1, -1, -1
//! n/a
//! ```

use crate::{Error, Result};

/// Parses heap-ordered slots from text. Line numbers in errors are 1-based.
pub fn parse_heap_layout(text: &str) -> Result<Vec<Option<Vec<f32>>>> {
    let mut slots = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.eq_ignore_ascii_case("n/a") || line == "-" {
            slots.push(None);
            continue;
        }

        let coords = line
            .split(',')
            .map(|field| {
                let field = field.trim();
                let value = field.parse::<f32>().map_err(|e| Error::Parse {
                    line: i + 1,
                    message: format!("invalid coordinate '{}': {}", field, e),
                })?;
                if !value.is_finite() {
                    return Err(Error::Parse {
                        line: i + 1,
                        message: format!("coordinate '{}' is not finite", field),
                    });
                }
                Ok(value)
            })
            .collect::<Result<Vec<f32>>>()?;
        slots.push(Some(coords));
    }

    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_slots_and_placeholders() {
        let slots = parse_heap_layout("1, 2, 3\nn/a\n-\n4,5,6\n").unwrap();
        assert_eq!(
            slots,
            vec![Some(vec![1.0, 2.0, 3.0]), None, None, Some(vec![4.0, 5.0, 6.0])]
        );
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let slots = parse_heap_layout("# header\n\n  0.5,1e2 \n\n# trailing\n").unwrap();
        assert_eq!(slots, vec![Some(vec![0.5, 100.0])]);
    }

    #[test]
    fn reports_line_of_bad_coordinate() {
        let err = parse_heap_layout("# a tree\n1,2,3\n1,x,3\n").unwrap_err();
        match err {
            Error::Parse { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("'x'"), "{}", message);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        for text in ["1,inf,3", "nan,0,0", "0,0,-infinity", "0,0,1e39"] {
            match parse_heap_layout(text) {
                Err(Error::Parse { line, message }) => {
                    assert_eq!(line, 1);
                    assert!(message.contains("not finite"), "{}", message);
                }
                other => panic!("{} parsed as {:?}", text, other),
            }
        }
    }

    #[test]
    fn empty_text_has_no_slots() {
        assert!(parse_heap_layout("").unwrap().is_empty());
    }
}
