//! Utilization, waste and cost figures for candidate and packed stock.
//!
//! Two estimates live side by side. The arithmetic estimate divides the
//! required area or length by what one stock unit offers and is cheap enough
//! to rank many candidate sizes. The summaries are computed from an exact
//! placement result. The estimate is a lower bound on stock units and the
//! two are allowed to disagree.

use crate::config::{LinearConfig, SheetConfig};
use crate::types::*;
use std::cmp::Ordering;

/// Ratio of `part` to `whole` in percent, clamped to [0, 100].
/// Returns 0 when `whole` is zero, negative or not finite.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if !whole.is_finite() || whole <= 0.0 || !part.is_finite() {
        return 0.0;
    }
    (part / whole * 100.0).clamp(0.0, 100.0)
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Stock units needed to cover `required_quantity`, rounded up.
pub fn required_units(required_quantity: f64, usable_per_unit: f64) -> u32 {
    if !(required_quantity > 0.0) || !(usable_per_unit > 0.0) {
        return 0;
    }
    (required_quantity / usable_per_unit).ceil() as u32
}

/// Area-based sheet estimate for one candidate sheet size.
pub fn estimate_sheets(
    pieces: &[RectPiece],
    sheet: &StockSheet,
    config: &SheetConfig,
) -> StockEstimate {
    let required_area: f64 = pieces.iter().map(RectPiece::area).sum();
    let usable_area = config.usable_area(sheet);
    let units = required_units(required_area, usable_area);
    let mut estimate = build_estimate(&sheet.name, required_area, usable_area, units, sheet.cost);
    estimate.fits_all = sheet_fits_all(pieces, sheet, config);
    estimate
}

/// Length-based bar estimate for one candidate bar length.
/// Each segment carries its cut spacing and the unit count is inflated by the
/// cutting efficiency allowance, matching what the packer reports.
pub fn estimate_bars(
    pieces: &[LinearPiece],
    bar: &StockBar,
    config: &LinearConfig,
) -> StockEstimate {
    let required_length: f64 = pieces.iter().map(|p| p.length + config.cut_spacing).sum();
    let usable_length = config.usable_length(bar);
    let units = required_units(required_length, usable_length);
    let units = apply_cutting_efficiency(units as usize, config.cutting_efficiency) as u32;
    let mut estimate = build_estimate(&bar.name, required_length, usable_length, units, bar.cost);
    estimate.cost += pieces.len() as f64 * config.cost_per_cut;
    estimate.fits_all = pieces.iter().all(|p| p.length <= usable_length);
    estimate
}

/// True when every piece fits the usable rectangle in at least one orientation.
pub fn sheet_fits_all(pieces: &[RectPiece], sheet: &StockSheet, config: &SheetConfig) -> bool {
    let usable_width = config.usable_width(sheet);
    let usable_height = config.usable_height(sheet);

    pieces.iter().all(|piece| {
        Orientation::ORDER.iter().any(|orientation| {
            let (width, height) = orientation.dimensions(piece);
            width <= usable_width && height <= usable_height
        })
    })
}

fn build_estimate(
    name: &str,
    required: f64,
    usable_per_unit: f64,
    units: u32,
    unit_cost: f64,
) -> StockEstimate {
    let available = units as f64 * usable_per_unit;
    StockEstimate {
        stock_name: name.to_string(),
        stock_index: 0,
        fits_all: true,
        required_quantity: required,
        usable_per_unit,
        required_units: units,
        utilization: round_one_decimal(percentage(required, available)),
        waste: (available - required).max(0.0),
        cost: units as f64 * unit_cost,
    }
}

/// Estimates every candidate sheet and orders them best first.
pub fn rank_sheet_candidates(
    pieces: &[RectPiece],
    candidates: &[StockSheet],
    config: &SheetConfig,
) -> Vec<StockEstimate> {
    let mut estimates: Vec<StockEstimate> = candidates
        .iter()
        .enumerate()
        .map(|(index, sheet)| StockEstimate {
            stock_index: index,
            ..estimate_sheets(pieces, sheet, config)
        })
        .collect();
    estimates.sort_by(compare_estimates);
    estimates
}

/// Estimates every candidate bar length and orders them best first.
pub fn rank_bar_candidates(
    pieces: &[LinearPiece],
    candidates: &[StockBar],
    config: &LinearConfig,
) -> Vec<StockEstimate> {
    let mut estimates: Vec<StockEstimate> = candidates
        .iter()
        .enumerate()
        .map(|(index, bar)| StockEstimate {
            stock_index: index,
            ..estimate_bars(pieces, bar, config)
        })
        .collect();
    estimates.sort_by(compare_estimates);
    estimates
}

/// Candidates every piece fits come first, then least estimated waste, then
/// lower cost. The sort using it is stable, so full ties keep the candidate order.
fn compare_estimates(a: &StockEstimate, b: &StockEstimate) -> Ordering {
    b.fits_all
        .cmp(&a.fits_all)
        .then_with(|| a.waste.partial_cmp(&b.waste).unwrap_or(Ordering::Equal))
        .then_with(|| a.cost.partial_cmp(&b.cost).unwrap_or(Ordering::Equal))
}

/// Bars to order once the packed count is divided by the efficiency fraction.
pub fn apply_cutting_efficiency(packed_bars: usize, cutting_efficiency: f64) -> usize {
    if packed_bars == 0 || !(cutting_efficiency > 0.0) {
        return packed_bars;
    }
    // Tolerance keeps exact multiples such as 9 / 0.9 from rounding up.
    (packed_bars as f64 / cutting_efficiency - 1e-9).ceil() as usize
}

/// Area-weighted totals over a sheet packing result.
pub fn summarize_sheets(result: &PackingResult, sheet: &StockSheet) -> UtilizationSummary {
    let used: f64 = result.layouts.iter().map(|l| l.used_area).sum();
    let available: f64 = result.layouts.iter().map(|l| l.usable_area).sum();

    UtilizationSummary {
        stock_units: result.total_sheets,
        used,
        available,
        waste: (available - used).max(0.0),
        utilization: round_one_decimal(percentage(used, available)),
        cost: result.total_sheets as f64 * sheet.cost,
    }
}

/// Totals over a linear packing result. Available length counts whole bars,
/// so edge loss and cut spacing show up as waste.
pub fn summarize_bars(result: &LinearResult) -> UtilizationSummary {
    let available = result.packed_bars as f64 * result.bar_length;

    UtilizationSummary {
        stock_units: result.required_bars,
        used: result.used_length,
        available,
        waste: result.waste_length,
        utilization: result.utilization,
        cost: result.estimated_cost,
    }
}
