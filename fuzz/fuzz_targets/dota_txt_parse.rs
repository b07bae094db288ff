//! Fuzz target for DOTA label file parsing.
//!
//! Feeds arbitrary UTF-8 text to the parser, checking for panics, crashes,
//! or hangs.

#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use rs2coco::source::dota2::parse_dota_txt_str;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let _ = parse_dota_txt_str(text, Path::new("fuzz.txt"));
});
