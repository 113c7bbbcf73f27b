use crate::config::{LinearConfig, SheetConfig};
use crate::expand::{ensure_expandable, expand_parts};
use crate::linear::pack_bars;
use crate::sheet::pack_sheets;
use crate::types::*;
use crate::utilization::{
    rank_bar_candidates, rank_sheet_candidates, summarize_bars, summarize_sheets,
};
use crate::validate::{linear_pieces, rect_pieces};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Input for a sheet calculation: candidate sheet sizes plus the parts to cut.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetRequest {
    pub sheets: Vec<StockSheet>,
    pub parts: Vec<PartRequirement>,
    #[serde(default)]
    pub config: SheetConfig,
}

/// Estimates for every candidate and the exact packing of the best one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetCalculation {
    /// All candidates, best estimate first
    pub candidates: Vec<StockEstimate>,
    pub chosen: StockEstimate,
    pub packing: PackingResult,
    pub summary: UtilizationSummary,
}

/// Input for a linear calculation: candidate bar lengths plus the parts to cut.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRequest {
    pub bars: Vec<StockBar>,
    pub parts: Vec<PartRequirement>,
    #[serde(default)]
    pub category: MaterialCategory,
    #[serde(default)]
    pub config: LinearConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearCalculation {
    pub candidates: Vec<StockEstimate>,
    pub chosen: StockEstimate,
    pub packing: LinearResult,
    pub summary: UtilizationSummary,
}

/// Runs the sheet pipeline: expand, validate, rank candidates, pack the best.
pub struct SheetNester {
    request: SheetRequest,
}

impl SheetNester {
    /// Validates configuration and stock and builds a new nester.
    pub fn new(request: SheetRequest) -> Result<Self> {
        request.config.validate()?;

        if request.sheets.is_empty() {
            return Err(NestingError::InvalidInput(
                "At least one sheet size must be provided".to_string(),
            ));
        }
        for sheet in &request.sheets {
            sheet.validate(&request.config)?;
        }
        ensure_expandable(&request.parts)?;

        Ok(Self { request })
    }

    /// Ranks candidates by the arithmetic estimate and packs the best one.
    /// Sheets that cannot hold some piece are only chosen when no candidate can.
    pub fn run(&self) -> Result<SheetCalculation> {
        let pieces = rect_pieces(&expand_parts(&self.request.parts))?;
        let config = &self.request.config;

        let candidates = rank_sheet_candidates(&pieces, &self.request.sheets, config);
        let chosen = candidates[0].clone();
        let sheet = &self.request.sheets[chosen.stock_index];
        if !chosen.fits_all {
            warn!(sheet = %sheet.name, "no candidate sheet holds every piece");
        }

        let packing = pack_sheets(&pieces, sheet, config);
        let summary = summarize_sheets(&packing, sheet);

        info!(
            sheet = %sheet.name,
            pieces = pieces.len(),
            estimated_sheets = chosen.required_units,
            sheets = packing.total_sheets,
            unplaced = packing.unplaced.len(),
            utilization = summary.utilization,
            "sheet calculation complete"
        );

        Ok(SheetCalculation {
            candidates,
            chosen,
            packing,
            summary,
        })
    }

    /// Ranks candidate sheets without running the placement.
    pub fn estimate(&self) -> Result<Vec<StockEstimate>> {
        let pieces = rect_pieces(&expand_parts(&self.request.parts))?;
        Ok(rank_sheet_candidates(
            &pieces,
            &self.request.sheets,
            &self.request.config,
        ))
    }
}

/// Runs the linear pipeline for tubes, profiles and bars.
pub struct LinearNester {
    request: LinearRequest,
}

impl LinearNester {
    pub fn new(request: LinearRequest) -> Result<Self> {
        request.config.validate()?;

        if !request.category.is_linear() {
            return Err(NestingError::InvalidInput(format!(
                "{} parts cannot be cut from bar stock",
                request.category
            )));
        }
        if request.bars.is_empty() {
            return Err(NestingError::InvalidInput(
                "At least one bar length must be provided".to_string(),
            ));
        }
        for bar in &request.bars {
            bar.validate(&request.config)?;
        }
        ensure_expandable(&request.parts)?;

        Ok(Self { request })
    }

    pub fn run(&self) -> Result<LinearCalculation> {
        let pieces = linear_pieces(&expand_parts(&self.request.parts), self.request.category)?;
        let config = &self.request.config;

        let candidates = rank_bar_candidates(&pieces, &self.request.bars, config);
        let chosen = candidates[0].clone();
        let bar = &self.request.bars[chosen.stock_index];
        if !chosen.fits_all {
            warn!(bar = %bar.name, "no candidate bar holds every segment");
        }

        let packing = pack_bars(&pieces, bar, config);
        let summary = summarize_bars(&packing);

        info!(
            bar = %bar.name,
            category = %self.request.category,
            pieces = pieces.len(),
            estimated_bars = chosen.required_units,
            bars = packing.required_bars,
            unplaced = packing.unplaced.len(),
            utilization = summary.utilization,
            "linear calculation complete"
        );

        Ok(LinearCalculation {
            candidates,
            chosen,
            packing,
            summary,
        })
    }

    pub fn estimate(&self) -> Result<Vec<StockEstimate>> {
        let pieces = linear_pieces(&expand_parts(&self.request.parts), self.request.category)?;
        Ok(rank_bar_candidates(
            &pieces,
            &self.request.bars,
            &self.request.config,
        ))
    }
}
