use crate::types::{
    LinearPiece, MaterialCategory, NestingError, Piece, RectPiece, Result, ValidationReport,
};

/// Checks every piece for the dimensions its material category needs.
/// All problems are collected in one pass, one message per offending piece.
pub fn validate_pieces(pieces: &[Piece], category: MaterialCategory) -> ValidationReport {
    let mut errors = Vec::new();

    for piece in pieces {
        let required = if category.is_linear() {
            vec![("length", piece.length)]
        } else {
            vec![("width", piece.width), ("height", piece.height)]
        };

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| !is_valid_dimension(*value))
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            errors.push(format!(
                "Piece '{}' is missing a positive {} required for {} material",
                piece.id,
                missing.join(" and "),
                category
            ));
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

/// Validates for sheet material and converts to rectangular pieces.
pub fn rect_pieces(pieces: &[Piece]) -> Result<Vec<RectPiece>> {
    let report = validate_pieces(pieces, MaterialCategory::Sheet);
    if !report.valid {
        return Err(NestingError::Validation(report.errors));
    }

    Ok(pieces
        .iter()
        .map(|piece| RectPiece {
            id: piece.id.clone(),
            description: piece.description.clone(),
            width: piece.width.unwrap_or_default(),
            height: piece.height.unwrap_or_default(),
        })
        .collect())
}

/// Validates for a linear material and converts to segments.
pub fn linear_pieces(pieces: &[Piece], category: MaterialCategory) -> Result<Vec<LinearPiece>> {
    if !category.is_linear() {
        return Err(NestingError::InvalidInput(format!(
            "{category} is not a linear material category"
        )));
    }

    let report = validate_pieces(pieces, category);
    if !report.valid {
        return Err(NestingError::Validation(report.errors));
    }

    Ok(pieces
        .iter()
        .map(|piece| LinearPiece {
            id: piece.id.clone(),
            description: piece.description.clone(),
            length: piece.length.unwrap_or_default(),
        })
        .collect())
}

fn is_valid_dimension(value: Option<f64>) -> bool {
    matches!(value, Some(v) if v.is_finite() && v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(id: &str, width: Option<f64>, height: Option<f64>, length: Option<f64>) -> Piece {
        Piece {
            id: id.to_string(),
            description: String::new(),
            width,
            height,
            length,
        }
    }

    #[test]
    fn test_sheet_requires_width_and_height() {
        let pieces = vec![
            piece("ok-1", Some(10.0), Some(20.0), None),
            piece("no-height-1", Some(10.0), None, None),
            piece("bare-1", None, None, Some(300.0)),
        ];

        let report = validate_pieces(&pieces, MaterialCategory::Sheet);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].contains("no-height-1"));
        assert!(report.errors[0].contains("height"));
        assert!(report.errors[1].contains("width and height"));
    }

    #[test]
    fn test_linear_categories_require_length() {
        let pieces = vec![
            piece("rod-1", None, None, Some(1200.0)),
            piece("plate-1", Some(10.0), Some(20.0), None),
        ];

        for category in [
            MaterialCategory::Tube,
            MaterialCategory::Profile,
            MaterialCategory::Bar,
        ] {
            let report = validate_pieces(&pieces, category);
            assert!(!report.valid);
            assert_eq!(report.errors.len(), 1);
            assert!(report.errors[0].contains("plate-1"));
            assert!(report.errors[0].contains(&category.to_string()));
        }
    }

    #[test]
    fn test_non_positive_dimension_is_rejected() {
        let pieces = vec![
            piece("zero-1", Some(0.0), Some(20.0), None),
            piece("nan-1", Some(f64::NAN), Some(20.0), None),
        ];
        let report = validate_pieces(&pieces, MaterialCategory::Sheet);
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn test_invalid_batch_blocks_conversion() {
        let pieces = vec![
            piece("a-1", Some(10.0), Some(20.0), None),
            piece("b-1", None, Some(20.0), None),
            piece("c-1", Some(10.0), None, None),
        ];

        match rect_pieces(&pieces) {
            Err(NestingError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_conversion_keeps_dimensions() {
        let pieces = vec![piece("a-1", Some(10.0), Some(20.0), None)];
        let rects = rect_pieces(&pieces).unwrap();
        assert_eq!(rects[0].width, 10.0);
        assert_eq!(rects[0].height, 20.0);

        let pieces = vec![piece("r-1", None, None, Some(750.0))];
        let segments = linear_pieces(&pieces, MaterialCategory::Tube).unwrap();
        assert_eq!(segments[0].length, 750.0);
    }

    #[test]
    fn test_linear_conversion_rejects_sheet_category() {
        assert!(matches!(
            linear_pieces(&[], MaterialCategory::Sheet),
            Err(NestingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_input_is_valid() {
        let report = validate_pieces(&[], MaterialCategory::Sheet);
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }
}
