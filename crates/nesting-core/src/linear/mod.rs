use crate::config::LinearConfig;
use crate::types::*;
use crate::utilization::{apply_cutting_efficiency, percentage, round_one_decimal};
use std::cmp::Ordering;
use tracing::{debug, warn};


/// Bar being filled by the packer.
#[derive(Debug, Default)]
struct OpenBar {
    cuts: Vec<LinearCut>,
    /// Segment lengths plus one cut spacing per segment
    consumed: f64,
}

impl OpenBar {
    fn fits(&self, length: f64, cut_spacing: f64, usable_length: f64) -> bool {
        self.consumed + length + cut_spacing <= usable_length
    }

    fn push(&mut self, piece: &LinearPiece, config: &LinearConfig) {
        self.cuts.push(LinearCut {
            piece_id: piece.id.clone(),
            offset: config.edge_loss + self.consumed,
            length: piece.length,
        });
        self.consumed += piece.length + config.cut_spacing;
    }

    fn into_layout(self, bar_index: usize, config: &LinearConfig, usable_length: f64) -> BarLayout {
        let used_length: f64 = self.cuts.iter().map(|c| c.length).sum();
        let kerf_loss = self.cuts.len() as f64 * config.cut_spacing;

        BarLayout {
            bar_index,
            cuts: self.cuts,
            used_length,
            kerf_loss,
            remaining_length: (usable_length - used_length - kerf_loss).max(0.0),
        }
    }
}

/// Packs segments into bars with first-fit-decreasing.
///
/// A segment goes into the first open bar where
/// `consumed + length + cut_spacing <= usable_length`; otherwise a new bar is
/// opened. Segments longer than the usable length are returned unplaced.
pub fn pack_bars(pieces: &[LinearPiece], bar: &StockBar, config: &LinearConfig) -> LinearResult {
    let usable_length = config.usable_length(bar);

    let mut sorted = pieces.to_vec();
    sorted.sort_by(|a, b| b.length.partial_cmp(&a.length).unwrap_or(Ordering::Equal));

    let mut open_bars: Vec<OpenBar> = Vec::new();
    let mut unplaced = Vec::new();

    for piece in &sorted {
        let first_fit = open_bars
            .iter()
            .position(|open| open.fits(piece.length, config.cut_spacing, usable_length));

        match first_fit {
            Some(index) => open_bars[index].push(piece, config),
            None if piece.length <= usable_length => {
                let mut open = OpenBar::default();
                open.push(piece, config);
                open_bars.push(open);
                debug!(bar = %bar.name, bar_index = open_bars.len() - 1, "opened bar");
            }
            None => unplaced.push(piece.clone()),
        }
    }

    if !unplaced.is_empty() {
        warn!(
            bar = %bar.name,
            usable_length,
            unplaced = unplaced.len(),
            "segments longer than the usable bar length"
        );
    }

    let bars: Vec<BarLayout> = open_bars
        .into_iter()
        .enumerate()
        .map(|(index, open)| open.into_layout(index, config, usable_length))
        .collect();

    let packed_bars = bars.len();
    let required_bars = apply_cutting_efficiency(packed_bars, config.cutting_efficiency);
    let total_cuts: usize = bars.iter().map(|b| b.cuts.len()).sum();
    let used_length: f64 = bars.iter().map(|b| b.used_length).sum();
    let available_length = packed_bars as f64 * bar.length;

    LinearResult {
        bar_name: bar.name.clone(),
        bar_length: bar.length,
        usable_length,
        bars,
        packed_bars,
        required_bars,
        total_cuts,
        used_length,
        waste_length: (available_length - used_length).max(0.0),
        utilization: round_one_decimal(percentage(used_length, available_length)),
        estimated_cost: required_bars as f64 * bar.cost + total_cuts as f64 * config.cost_per_cut,
        unplaced,
    }
}
