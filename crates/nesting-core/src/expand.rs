use crate::types::{NestingError, PartRequirement, Piece, Result};

/// Upper bound on the number of unit pieces a single request may expand to.
pub const MAX_EXPANDED_PIECES: i64 = 100_000;

/// Number of unit pieces `expand_parts` would produce, saturating on overflow.
pub fn expanded_count(parts: &[PartRequirement]) -> i64 {
    parts
        .iter()
        .fold(0i64, |total, part| total.saturating_add(part.quantity.max(0)))
}

/// Rejects requests whose quantities would expand past `MAX_EXPANDED_PIECES`.
pub fn ensure_expandable(parts: &[PartRequirement]) -> Result<()> {
    let count = expanded_count(parts);
    if count > MAX_EXPANDED_PIECES {
        return Err(NestingError::InvalidInput(format!(
            "Parts expand to {} pieces, more than the limit of {}",
            count, MAX_EXPANDED_PIECES
        )));
    }
    Ok(())
}

/// Duplicates parts according to their requested quantity.
/// Unit ids are `<id>-<n>` with `n` counting from 1; non-positive quantities yield nothing.
pub fn expand_parts(parts: &[PartRequirement]) -> Vec<Piece> {
    let mut expanded = Vec::new();
    for part in parts {
        for n in 1..=part.quantity.max(0) {
            expanded.push(Piece {
                id: format!("{}-{}", part.id, n),
                description: part.description.clone(),
                width: part.width,
                height: part.height,
                length: part.length,
            });
        }
    }
    expanded
}
