use nesting_core::{
    pack_bars, pack_sheets, LinearConfig, LinearPiece, PackingResult, RectPiece, SheetConfig,
    StockBar, StockSheet,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use test_case::test_case;

fn standard_sheet() -> StockSheet {
    StockSheet {
        name: "2000x1250".to_string(),
        width: 2000.0,
        height: 1250.0,
        cost: 0.0,
    }
}

fn standard_bar() -> StockBar {
    StockBar {
        name: "6000".to_string(),
        length: 6000.0,
        cost: 0.0,
    }
}

/// Random rectangles whose total area stays within `max_area`.
fn random_rects(seed: u64, max_area: f64, min_side: u32, max_side: u32) -> Vec<RectPiece> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut pieces = Vec::new();
    let mut total = 0.0;

    loop {
        let width = rng.random_range(min_side..=max_side) as f64;
        let height = rng.random_range(min_side..=max_side) as f64;
        if total + width * height > max_area {
            break;
        }
        total += width * height;
        pieces.push(RectPiece {
            id: format!("r-{}", pieces.len() + 1),
            description: String::new(),
            width,
            height,
        });
    }
    pieces
}

fn random_segments(seed: u64, count: usize, min: u32, max: u32) -> Vec<LinearPiece> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (1..=count)
        .map(|i| LinearPiece {
            id: format!("s-{i}"),
            description: String::new(),
            length: rng.random_range(min..=max) as f64,
        })
        .collect()
}

fn assert_geometry(result: &PackingResult, pieces: &[RectPiece]) {
    for layout in &result.layouts {
        let margin = layout.margin;
        assert!((0.0..=100.0).contains(&layout.utilization));

        for p in &layout.placements {
            assert!(p.x >= margin && p.y >= margin);
            assert!(p.x + p.width <= layout.width - margin);
            assert!(p.y + p.height <= layout.height - margin);

            let source = pieces.iter().find(|o| o.id == p.piece_id).unwrap();
            if p.rotated {
                assert_eq!((p.width, p.height), (source.height, source.width));
            } else {
                assert_eq!((p.width, p.height), (source.width, source.height));
            }
        }

        for (i, a) in layout.placements.iter().enumerate() {
            for b in &layout.placements[i + 1..] {
                assert!(!a.overlaps(b), "sheet {}: {a:?} overlaps {b:?}", layout.sheet_index);
            }
        }
    }
    assert!((0.0..=100.0).contains(&result.mean_utilization));
}

#[test_case(1, 1, 3, 100, 500; "one sheet of mixed panels")]
#[test_case(2, 2, 5, 100, 500; "two sheets of mixed panels")]
#[test_case(3, 3, 7, 50, 300; "three sheets of small parts")]
#[test_case(4, 4, 9, 200, 600; "four sheets of large panels")]
fn test_area_bound_places_everything(seed: u64, n: usize, bound: usize, min: u32, max: u32) {
    let sheet = standard_sheet();
    let config = SheetConfig::default();
    let usable_area = config.usable_area(&sheet);
    let pieces = random_rects(seed, n as f64 * usable_area, min, max);

    let result = pack_sheets(&pieces, &sheet, &config);

    assert!(result.is_complete(), "{} pieces unplaced", result.unplaced.len());
    assert_eq!(result.total_pieces_placed, pieces.len());
    assert!(
        result.total_sheets <= bound,
        "{} sheets used, bound {bound}",
        result.total_sheets
    );
    assert_geometry(&result, &pieces);
}

#[test_case(11; "seed 11")]
#[test_case(12; "seed 12")]
#[test_case(13; "seed 13")]
fn test_geometry_holds_with_kerf(seed: u64) {
    let sheet = standard_sheet();
    let config = SheetConfig {
        kerf: 8.0,
        edge_margin: 15.0,
        ..SheetConfig::default()
    };
    let pieces = random_rects(seed, 3.0 * config.usable_area(&sheet), 40, 1100);

    let result = pack_sheets(&pieces, &sheet, &config);

    assert_geometry(&result, &pieces);
    assert_eq!(
        result.total_pieces_placed + result.unplaced.len(),
        pieces.len()
    );
}

#[test]
fn test_repeated_packing_is_identical() {
    let sheet = standard_sheet();
    let config = SheetConfig::default();
    let pieces = random_rects(99, 2.5 * config.usable_area(&sheet), 60, 700);

    let first = pack_sheets(&pieces, &sheet, &config);
    let second = pack_sheets(&pieces, &sheet, &config);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_safety_cap_keeps_residual_pieces() {
    let sheet = standard_sheet();
    let config = SheetConfig {
        safety_sheet_cap: 3,
        ..SheetConfig::default()
    };
    let pieces = random_rects(7, 6.0 * config.usable_area(&sheet), 200, 600);

    let result = pack_sheets(&pieces, &sheet, &config);

    assert_eq!(result.total_sheets, 3);
    assert!(!result.unplaced.is_empty());
    assert_eq!(
        result.total_pieces_placed + result.unplaced.len(),
        pieces.len()
    );
    assert!(result.ensure_complete().is_err());
}

#[test_case(21, 40, 300, 2500; "medium segments")]
#[test_case(22, 120, 100, 1200; "short segments")]
#[test_case(23, 25, 2000, 4500; "long segments")]
fn test_ffd_within_bound_of_lower_bound(seed: u64, count: usize, min: u32, max: u32) {
    let bar = standard_bar();
    let config = LinearConfig::default();
    let pieces = random_segments(seed, count, min, max);

    let result = pack_bars(&pieces, &bar, &config);

    let usable = config.usable_length(&bar);
    let demand: f64 = pieces.iter().map(|p| p.length + config.cut_spacing).sum();
    let lower_bound = (demand / usable).ceil() as usize;
    let long_items = pieces
        .iter()
        .filter(|p| (p.length + config.cut_spacing) * 2.0 > usable)
        .count();
    let lower_bound = lower_bound.max(long_items);

    assert!(result.is_complete());
    assert!(
        result.packed_bars <= (11 * lower_bound).div_ceil(9) + 1,
        "{} bars against lower bound {lower_bound}",
        result.packed_bars
    );
    assert!((0.0..=100.0).contains(&result.utilization));
    for layout in &result.bars {
        assert!(layout.used_length + layout.kerf_loss <= usable);
    }
}

#[test]
fn test_ffd_finds_perfect_pairing() {
    let config = LinearConfig {
        cut_spacing: 0.0,
        ..LinearConfig::default()
    };
    let mut pieces = Vec::new();
    for (i, length) in [4000.0, 2000.0, 3500.0, 2500.0].iter().cycle().take(20).enumerate() {
        pieces.push(LinearPiece {
            id: format!("s-{i}"),
            description: String::new(),
            length: *length,
        });
    }

    let result = pack_bars(&pieces, &standard_bar(), &config);

    assert_eq!(result.packed_bars, 10);
    assert_eq!(result.utilization, 100.0);
    assert_eq!(result.waste_length, 0.0);
}
