use super::*;

/// Horizontal strip of a sheet filled left to right.
#[derive(Debug, Clone)]
struct Shelf {
    y: f64,
    /// Height of the tallest piece on the shelf
    height: f64,
    /// Cumulative width including kerf after every piece
    width_used: f64,
}

/// Usable rectangle of one sheet together with its open shelves.
struct ShelfSheet<'a> {
    config: &'a SheetConfig,
    usable_width: f64,
    usable_height: f64,
    shelves: Vec<Shelf>,
    next_shelf_y: f64,
}

impl<'a> ShelfSheet<'a> {
    fn new(sheet: &StockSheet, config: &'a SheetConfig) -> Self {
        Self {
            config,
            usable_width: config.usable_width(sheet),
            usable_height: config.usable_height(sheet),
            shelves: Vec::new(),
            next_shelf_y: config.edge_margin,
        }
    }

    /// Places the piece on an existing shelf if any orientation fits, otherwise
    /// on a new shelf. Returns `None` when the piece does not fit at all.
    fn place(&mut self, piece: &RectPiece) -> Option<Placement> {
        for orientation in Orientation::ORDER {
            let (width, height) = orientation.dimensions(piece);
            if let Some(placement) =
                self.place_on_existing_shelf(piece, orientation, width, height)
            {
                return Some(placement);
            }
        }

        for orientation in Orientation::ORDER {
            let (width, height) = orientation.dimensions(piece);
            if let Some(placement) =
                self.place_on_new_shelf(piece, orientation, width, height)
            {
                return Some(placement);
            }
        }

        None
    }

    fn place_on_existing_shelf(
        &mut self,
        piece: &RectPiece,
        orientation: Orientation,
        width: f64,
        height: f64,
    ) -> Option<Placement> {
        let margin = self.config.edge_margin;
        let kerf = self.config.kerf;
        let usable_width = self.usable_width;

        let shelf = self
            .shelves
            .iter_mut()
            .find(|shelf| usable_width - shelf.width_used >= width && height <= shelf.height)?;

        let placement = Placement {
            piece_id: piece.id.clone(),
            x: margin + shelf.width_used,
            y: shelf.y,
            width,
            height,
            rotated: orientation.is_rotated(),
        };
        shelf.width_used += width + kerf;

        Some(placement)
    }

    fn place_on_new_shelf(
        &mut self,
        piece: &RectPiece,
        orientation: Orientation,
        width: f64,
        height: f64,
    ) -> Option<Placement> {
        let margin = self.config.edge_margin;
        let y = self.next_shelf_y;

        if width > self.usable_width || self.usable_height + margin - y < height {
            return None;
        }

        self.shelves.push(Shelf {
            y,
            height,
            width_used: width + self.config.kerf,
        });
        self.next_shelf_y = y + height + self.config.kerf;

        Some(Placement {
            piece_id: piece.id.clone(),
            x: margin,
            y,
            width,
            height,
            rotated: orientation.is_rotated(),
        })
    }
}

/// Packs as many pieces as possible onto one sheet with the shelf heuristic.
///
/// `pieces` are expected to be sorted by area, largest first. Pieces that fit
/// nowhere on this sheet are returned in their input order.
pub fn pack_sheet(
    pieces: &[RectPiece],
    sheet: &StockSheet,
    sheet_index: usize,
    config: &SheetConfig,
) -> (SheetLayout, Vec<RectPiece>) {
    let mut shelf_sheet = ShelfSheet::new(sheet, config);
    let mut placements = Vec::new();
    let mut unplaced = Vec::new();

    if shelf_sheet.usable_width > 0.0 && shelf_sheet.usable_height > 0.0 {
        for piece in pieces {
            match shelf_sheet.place(piece) {
                Some(placement) => placements.push(placement),
                None => unplaced.push(piece.clone()),
            }
        }
    } else {
        unplaced.extend_from_slice(pieces);
    }

    let used_area: f64 = placements.iter().map(Placement::area).sum();
    let usable_area = config.usable_area(sheet);

    let layout = SheetLayout {
        sheet_index,
        sheet_name: sheet.name.clone(),
        width: sheet.width,
        height: sheet.height,
        margin: config.edge_margin,
        placements,
        utilization: round_one_decimal(percentage(used_area, usable_area)),
        used_area,
        usable_area,
    };

    (layout, unplaced)
}
