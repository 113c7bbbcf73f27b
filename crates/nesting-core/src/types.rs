use serde::{Deserialize, Serialize};

/// One bill-of-materials line: a part and how many of it are needed.
/// Dimensions are optional here; presence is checked per material category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartRequirement {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub length: Option<f64>,
    pub quantity: i64,
}

/// A single unit piece after quantity expansion, not yet validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub id: String,
    pub description: String,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub length: Option<f64>,
}

/// A validated rectangular piece. Both dimensions are positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectPiece {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub width: f64,
    pub height: f64,
}

impl RectPiece {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// A validated linear segment cut from bar stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPiece {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub length: f64,
}

/// Material category of the raw stock a part is cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialCategory {
    Sheet,
    Tube,
    Profile,
    #[default]
    Bar,
}

impl MaterialCategory {
    /// Tubes, profiles and bars are cut along one axis only.
    pub fn is_linear(self) -> bool {
        !matches!(self, MaterialCategory::Sheet)
    }
}

impl std::fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MaterialCategory::Sheet => "SHEET",
            MaterialCategory::Tube => "TUBE",
            MaterialCategory::Profile => "PROFILE",
            MaterialCategory::Bar => "BAR",
        };
        f.write_str(name)
    }
}

/// Standard sheet size available as raw stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSheet {
    pub name: String,
    pub width: f64,
    pub height: f64,
    /// Purchase cost of one sheet
    #[serde(default)]
    pub cost: f64,
}

/// Standard bar, tube or profile length available as raw stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockBar {
    pub name: String,
    pub length: f64,
    /// Purchase cost of one bar
    #[serde(default)]
    pub cost: f64,
}

/// The two orientations a rectangular piece may take on a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Unrotated,
    Rotated,
}

impl Orientation {
    /// Evaluation order. Unrotated comes first so ties never rotate a piece.
    pub const ORDER: [Orientation; 2] = [Orientation::Unrotated, Orientation::Rotated];

    /// Placed (width, height) of a piece in this orientation.
    pub fn dimensions(self, piece: &RectPiece) -> (f64, f64) {
        match self {
            Orientation::Unrotated => (piece.width, piece.height),
            Orientation::Rotated => (piece.height, piece.width),
        }
    }

    pub fn is_rotated(self) -> bool {
        matches!(self, Orientation::Rotated)
    }
}

/// Placement of a piece on a sheet. `width`/`height` are the placed dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub piece_id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotated: bool,
}

impl Placement {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// True when the interiors of the two rectangles intersect.
    pub fn overlaps(&self, other: &Placement) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Layout of a single sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetLayout {
    /// Zero-based position of this sheet within the packing result
    pub sheet_index: usize,
    pub sheet_name: String,
    pub width: f64,
    pub height: f64,
    /// Border trimmed from every edge before the sheet is usable
    pub margin: f64,
    pub placements: Vec<Placement>,
    /// Used area over usable area, in percent with one decimal
    pub utilization: f64,
    pub used_area: f64,
    pub usable_area: f64,
}

/// Output of the multi-sheet allocator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackingResult {
    pub sheet_name: String,
    pub layouts: Vec<SheetLayout>,
    pub total_sheets: usize,
    pub total_pieces_placed: usize,
    /// Simple average of the per-sheet utilization, not weighted by area
    pub mean_utilization: f64,
    /// Pieces left over when the sheet cap was reached or that fit on no sheet
    #[serde(default)]
    pub unplaced: Vec<RectPiece>,
}

impl PackingResult {
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Turns a non-empty unplaced set into an error for callers that cannot
    /// accept a partial layout.
    pub fn ensure_complete(self) -> Result<Self> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(NestingError::IncompleteLayout {
                unplaced: self.unplaced.iter().map(|p| p.id.clone()).collect(),
            })
        }
    }
}

/// A segment cut from a bar, positioned from the start of the raw bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearCut {
    pub piece_id: String,
    pub offset: f64,
    pub length: f64,
}

/// Layout of a single bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarLayout {
    pub bar_index: usize,
    pub cuts: Vec<LinearCut>,
    /// Sum of the segment lengths cut from this bar
    pub used_length: f64,
    /// Material consumed by cut spacing
    pub kerf_loss: f64,
    /// Usable length still free after the last cut
    pub remaining_length: f64,
}

/// Output of the linear stock packer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearResult {
    pub bar_name: String,
    pub bar_length: f64,
    pub usable_length: f64,
    pub bars: Vec<BarLayout>,
    /// Bars opened by the packer
    pub packed_bars: usize,
    /// Bars to order once the cutting efficiency allowance is applied
    pub required_bars: usize,
    pub total_cuts: usize,
    pub used_length: f64,
    pub waste_length: f64,
    pub utilization: f64,
    pub estimated_cost: f64,
    #[serde(default)]
    pub unplaced: Vec<LinearPiece>,
}

impl LinearResult {
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }

    pub fn ensure_complete(self) -> Result<Self> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(NestingError::IncompleteLayout {
                unplaced: self.unplaced.iter().map(|p| p.id.clone()).collect(),
            })
        }
    }
}

/// Outcome of the material compatibility check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Arithmetic stock estimate for one candidate stock size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockEstimate {
    pub stock_name: String,
    /// Position of the stock in the candidate list it was ranked from
    pub stock_index: usize,
    /// Every piece fits a single unit of this stock on its own
    pub fits_all: bool,
    /// Area (sheets) or length (bars) required by the pieces
    pub required_quantity: f64,
    /// Usable area or length of one stock unit
    pub usable_per_unit: f64,
    pub required_units: u32,
    pub utilization: f64,
    pub waste: f64,
    pub cost: f64,
}

/// Utilization and cost aggregated over an exact placement result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationSummary {
    pub stock_units: usize,
    pub used: f64,
    pub available: f64,
    pub waste: f64,
    pub utilization: f64,
    pub cost: f64,
}

/// Error type for nesting calculations
#[derive(Debug, thiserror::Error)]
pub enum NestingError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Material validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Incomplete layout: {} pieces could not be placed - add stock or split the order", .unplaced.len())]
    IncompleteLayout { unplaced: Vec<String> },
}

pub type Result<T> = std::result::Result<T, NestingError>;
