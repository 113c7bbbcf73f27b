//! Stock nesting engine: works out how many sheets or bars a bill of
//! materials needs, where every piece goes and how much material is wasted.
//!
//! Sheets are packed with a shelf heuristic that may rotate pieces by 90°,
//! bars with first-fit-decreasing. Every operation is a pure function of its
//! inputs, so candidate stock sizes can be evaluated concurrently.

pub mod calculation;
pub mod config;
pub mod expand;
pub mod linear;
pub mod sheet;
pub mod types;
pub mod utilization;
pub mod validate;

pub use calculation::{
    LinearCalculation, LinearNester, LinearRequest, SheetCalculation, SheetNester, SheetRequest,
};
pub use config::{LinearConfig, SheetConfig};
pub use expand::expand_parts;
pub use linear::pack_bars;
pub use sheet::{pack_sheet, pack_sheets};
pub use types::*;
pub use validate::{linear_pieces, rect_pieces, validate_pieces};
