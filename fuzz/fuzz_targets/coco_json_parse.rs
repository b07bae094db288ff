//! Fuzz target for the COCO reader used by the post-hoc filters.
//!
//! Parses arbitrary bytes and, on success, renders the document back out and
//! evaluates every annotation area, checking for panics or hangs.
//!
//! Run with:
//!   cargo +nightly fuzz run coco_json_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use rs2coco::ir::io_coco_json::{from_coco_slice, to_coco_string};

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(coco) = from_coco_slice(data) else {
        return;
    };

    for annotation in &coco.annotations {
        let _ = annotation.area();
    }
    let _ = to_coco_string(&coco);
});
