use crate::error::OcrLayerError;
use crate::model::CharBox;

/// Parse a transcript-engine box file.
///
/// Each non-empty line is `char xmin ymin xmax ymax`, optionally followed by a
/// page number. A label spanning several codepoints (ligatures) becomes one
/// box per codepoint, all sharing the record's geometry.
pub fn parse_box_file(data: &str) -> Result<Vec<CharBox>, OcrLayerError> {
    let mut boxes = Vec::new();

    for (index, line) in data.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 5 && fields.len() != 6 {
            return Err(OcrLayerError::MalformedBoxFile {
                line: index + 1,
                reason: format!("expected 5 or 6 fields, found {}", fields.len()),
            });
        }

        let mut coords = [0i32; 4];
        for (slot, raw) in coords.iter_mut().zip(&fields[1..5]) {
            *slot = raw.parse().map_err(|_| OcrLayerError::MalformedBoxFile {
                line: index + 1,
                reason: format!("invalid coordinate '{raw}'"),
            })?;
        }
        let [xmin, ymin, xmax, ymax] = coords;
        if xmin > xmax || ymin > ymax {
            return Err(OcrLayerError::MalformedBoxFile {
                line: index + 1,
                reason: "inverted box".to_string(),
            });
        }

        for ch in fields[0].chars() {
            boxes.push(CharBox::new(ch, xmin, ymin, xmax, ymax));
        }
    }

    Ok(boxes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_five_and_six_columns() {
        let data = "a 0 0 5 5\nb 5 0 10 5 0\n\n";
        let boxes = parse_box_file(data).unwrap();
        assert_eq!(
            boxes,
            vec![CharBox::new('a', 0, 0, 5, 5), CharBox::new('b', 5, 0, 10, 5)]
        );
    }

    #[test]
    fn test_ligature_is_split() {
        let boxes = parse_box_file("fi 0 0 8 10 0").unwrap();
        assert_eq!(
            boxes,
            vec![CharBox::new('f', 0, 0, 8, 10), CharBox::new('i', 0, 0, 8, 10)]
        );
    }

    #[test]
    fn test_wrong_field_count() {
        let err = parse_box_file("a 0 0 5 5\nb 1 2\n").unwrap_err();
        match err {
            OcrLayerError::MalformedBoxFile { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_coordinate() {
        assert!(matches!(
            parse_box_file("a 0 x 5 5"),
            Err(OcrLayerError::MalformedBoxFile { line: 1, .. })
        ));
    }

    #[test]
    fn test_inverted_box_is_malformed() {
        match parse_box_file("a 0 0 5 5 0\nb 10 0 5 5 0\n").unwrap_err() {
            OcrLayerError::MalformedBoxFile { line, reason } => {
                assert_eq!(line, 2);
                assert_eq!(reason, "inverted box");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(parse_box_file("c 0 9 5 5").is_err());
        // Degenerate zero-width boxes are fine.
        assert!(parse_box_file("d 3 3 3 3").is_ok());
    }
}
