//! Fuzz target for xView `bounds_imcoords` parsing.
//!
//! Feeds arbitrary UTF-8 text to the parser, checking for panics, crashes,
//! or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rs2coco::source::xview::fuzz_parse_bounds;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let _ = fuzz_parse_bounds(text);
});
