use crate::config::SheetConfig;
use crate::types::*;
use crate::utilization::{percentage, round_one_decimal};
use std::cmp::Ordering;
use tracing::{debug, warn};

mod shelf;

pub use shelf::pack_sheet;

/// Packs pieces onto as many sheets as needed, up to the configured safety cap.
///
/// Pieces are sorted by area (largest first, equal areas keep their input order)
/// and each sheet is filled from the pieces the previous sheet left over.
/// Pieces still left when the cap is reached, or that fit on no empty sheet,
/// are returned in `unplaced` rather than raised as an error.
pub fn pack_sheets(
    pieces: &[RectPiece],
    sheet: &StockSheet,
    config: &SheetConfig,
) -> PackingResult {
    let mut remaining = sort_by_area(pieces);
    let mut layouts: Vec<SheetLayout> = Vec::new();

    while !remaining.is_empty() && layouts.len() < config.safety_sheet_cap {
        let sheet_index = layouts.len();
        let (layout, unplaced) = pack_sheet(&remaining, sheet, sheet_index, config);

        if layout.placements.is_empty() {
            debug!(
                sheet = %sheet.name,
                remaining = remaining.len(),
                "no remaining piece fits on an empty sheet"
            );
            break;
        }

        debug!(
            sheet = %sheet.name,
            sheet_index,
            placed = layout.placements.len(),
            utilization = layout.utilization,
            "sheet packed"
        );

        layouts.push(layout);
        remaining = unplaced;
    }

    if !remaining.is_empty() {
        if layouts.len() >= config.safety_sheet_cap {
            warn!(
                sheet = %sheet.name,
                cap = config.safety_sheet_cap,
                unplaced = remaining.len(),
                "sheet safety cap reached before all pieces were placed"
            );
        } else {
            warn!(
                sheet = %sheet.name,
                unplaced = remaining.len(),
                "pieces do not fit on the usable sheet area in either orientation"
            );
        }
    }

    aggregate(sheet, layouts, remaining)
}

/// Sorts a copy of the pieces by area, descending. The sort is stable.
pub(crate) fn sort_by_area(pieces: &[RectPiece]) -> Vec<RectPiece> {
    let mut sorted = pieces.to_vec();
    sorted.sort_by(|a, b| b.area().partial_cmp(&a.area()).unwrap_or(Ordering::Equal));
    sorted
}

fn aggregate(
    sheet: &StockSheet,
    layouts: Vec<SheetLayout>,
    unplaced: Vec<RectPiece>,
) -> PackingResult {
    let total_sheets = layouts.len();
    let total_pieces_placed = layouts.iter().map(|l| l.placements.len()).sum();
    let mean_utilization = if total_sheets > 0 {
        let sum: f64 = layouts.iter().map(|l| l.utilization).sum();
        round_one_decimal(sum / total_sheets as f64)
    } else {
        0.0
    };

    PackingResult {
        sheet_name: sheet.name.clone(),
        layouts,
        total_sheets,
        total_pieces_placed,
        mean_utilization,
        unplaced,
    }
}
