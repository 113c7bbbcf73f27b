use crate::types::{NestingError, Result, StockBar, StockSheet};
use serde::{Deserialize, Serialize};

/// Constants for sheet packing. Immutable and shared freely between calls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Width of material removed by the cutting tool between neighbours
    pub kerf: f64,
    /// Uniform border trimmed from every sheet edge
    pub edge_margin: f64,
    /// Upper bound on sheets opened by one allocation
    pub safety_sheet_cap: usize,
}

impl SheetConfig {
    pub const DEFAULT_KERF: f64 = 5.0;
    pub const DEFAULT_EDGE_MARGIN: f64 = 5.0;
    pub const DEFAULT_SAFETY_SHEET_CAP: usize = 50;

    pub fn validate(&self) -> Result<()> {
        non_negative("kerf", self.kerf)?;
        non_negative("edge_margin", self.edge_margin)?;
        if self.safety_sheet_cap == 0 {
            return Err(NestingError::InvalidInput(
                "safety_sheet_cap must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn usable_width(&self, sheet: &StockSheet) -> f64 {
        sheet.width - self.edge_margin * 2.0
    }

    pub fn usable_height(&self, sheet: &StockSheet) -> f64 {
        sheet.height - self.edge_margin * 2.0
    }

    pub fn usable_area(&self, sheet: &StockSheet) -> f64 {
        let width = self.usable_width(sheet);
        let height = self.usable_height(sheet);
        if width <= 0.0 || height <= 0.0 {
            0.0
        } else {
            width * height
        }
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            kerf: Self::DEFAULT_KERF,
            edge_margin: Self::DEFAULT_EDGE_MARGIN,
            safety_sheet_cap: Self::DEFAULT_SAFETY_SHEET_CAP,
        }
    }
}

/// Constants for linear (bar, tube, profile) packing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearConfig {
    /// Material lost per cut
    pub cut_spacing: f64,
    /// Length lost at each end of a bar
    pub edge_loss: f64,
    /// Fraction in (0, 1]; the packed bar count is divided by it to leave
    /// an allowance for shop-floor losses
    pub cutting_efficiency: f64,
    pub cost_per_cut: f64,
}

impl LinearConfig {
    pub const DEFAULT_CUT_SPACING: f64 = 3.0;
    pub const DEFAULT_EDGE_LOSS: f64 = 0.0;
    pub const DEFAULT_CUTTING_EFFICIENCY: f64 = 1.0;

    pub fn validate(&self) -> Result<()> {
        non_negative("cut_spacing", self.cut_spacing)?;
        non_negative("edge_loss", self.edge_loss)?;
        non_negative("cost_per_cut", self.cost_per_cut)?;
        if !(self.cutting_efficiency > 0.0 && self.cutting_efficiency <= 1.0) {
            return Err(NestingError::InvalidInput(format!(
                "cutting_efficiency must be in (0, 1], got {}",
                self.cutting_efficiency
            )));
        }
        Ok(())
    }

    pub fn usable_length(&self, bar: &StockBar) -> f64 {
        (bar.length - self.edge_loss * 2.0).max(0.0)
    }
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            cut_spacing: Self::DEFAULT_CUT_SPACING,
            edge_loss: Self::DEFAULT_EDGE_LOSS,
            cutting_efficiency: Self::DEFAULT_CUTTING_EFFICIENCY,
            cost_per_cut: 0.0,
        }
    }
}

impl StockSheet {
    /// Checks dimensions and that something is left after trimming the margin.
    pub fn validate(&self, config: &SheetConfig) -> Result<()> {
        positive(&format!("Sheet '{}' width", self.name), self.width)?;
        positive(&format!("Sheet '{}' height", self.name), self.height)?;
        non_negative(&format!("Sheet '{}' cost", self.name), self.cost)?;

        if config.usable_width(self) <= 0.0 || config.usable_height(self) <= 0.0 {
            return Err(NestingError::InvalidInput(format!(
                "Sheet '{}' becomes unusable after applying the edge margin",
                self.name
            )));
        }
        Ok(())
    }
}

impl StockBar {
    pub fn validate(&self, config: &LinearConfig) -> Result<()> {
        positive(&format!("Bar '{}' length", self.name), self.length)?;
        non_negative(&format!("Bar '{}' cost", self.name), self.cost)?;

        if config.usable_length(self) <= 0.0 {
            return Err(NestingError::InvalidInput(format!(
                "Bar '{}' becomes unusable after applying the edge loss",
                self.name
            )));
        }
        Ok(())
    }
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(NestingError::InvalidInput(format!(
            "{name} must be a non-negative number, got {value}"
        )))
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(NestingError::InvalidInput(format!(
            "{name} must be positive, got {value}"
        )))
    }
}
