#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use serde_json::Map;

use rs2coco::ir::io_coco_json::{CocoAnnotation, CocoCategory, CocoDataset, CocoImage};
use rs2coco::ir::Coord;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Pixel coordinates in a realistic range, with two decimals.
pub fn arb_pixel() -> impl Strategy<Value = f64> {
    (0i64..=1_000_000).prop_map(|v| v as f64 / 100.0)
}

pub fn arb_coord() -> impl Strategy<Value = Coord> {
    (arb_pixel(), arb_pixel()).prop_map(|(x, y)| Coord::new(x, y))
}

/// Four corners of a rectangle of size `w x h` centred at `(cx, cy)` and
/// rotated by `angle` radians.
pub fn rotated_rect(cx: f64, cy: f64, w: f64, h: f64, angle: f64) -> Vec<Coord> {
    let (sin, cos) = angle.sin_cos();
    [(-w, -h), (w, -h), (w, h), (-w, h)]
        .into_iter()
        .map(|(dx, dy)| {
            let (dx, dy) = (dx / 2.0, dy / 2.0);
            Coord::new(cx + dx * cos - dy * sin, cy + dx * sin + dy * cos)
        })
        .collect()
}

/// COCO documents with up to 6 images, categories 0..=6 and annotations
/// whose areas straddle the usual 400px bound.
pub fn arb_coco() -> impl Strategy<Value = CocoDataset> {
    let annotation = (1u64..=6, 0u64..=6, 0u32..=40, 0u32..=40, any::<bool>());
    (1usize..=6, prop::collection::vec(annotation, 0..24)).prop_map(|(image_count, anns)| {
        let images = (1..=image_count as u64)
            .map(|id| CocoImage {
                id,
                file_name: format!("{id:04}.png"),
                width: 100,
                height: 100,
                extra: Map::new(),
            })
            .collect();
        let categories = (0..=6)
            .map(|id| CocoCategory::named(id, &format!("class-{id}")))
            .collect();
        let annotations = anns
            .into_iter()
            .enumerate()
            .map(|(idx, (image_id, category_id, w, h, with_area))| CocoAnnotation {
                id: Some(idx as u64 + 1),
                image_id: image_id.min(image_count as u64),
                category_id,
                bbox: [0.0, 0.0, w as f64, h as f64],
                area: with_area.then_some((w * h) as f64),
                iscrowd: Some(0),
                segmentation: None,
                extra: Map::new(),
            })
            .collect();

        CocoDataset {
            images,
            annotations,
            categories,
            extra: Map::new(),
        }
    })
}
