#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// A minimal 24-bit BMP; `imagesize` reads dimensions from its header
/// whatever the file extension.
pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    bytes.resize(file_size as usize, 0);
    bytes
}

pub fn write_bmp(path: &Path, width: u32, height: u32) {
    write_file(path, &bmp_bytes(width, height));
}

pub fn write_file(path: &Path, contents: impl AsRef<[u8]>) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, contents).expect("write file");
}

/// Writes a split file naming `images` under `dir/`.
pub fn write_split(path: &Path, dir: &str, images: &[&str]) {
    let lines: String = images
        .iter()
        .map(|name| format!("{dir}/{name}\n"))
        .collect();
    write_file(path, lines);
}

/// DOTA v2 layout with three 64x48 images:
/// - P0001: a small vehicle (10x10) and a plane (30x30)
/// - P0002: a large small-vehicle (25x20) and a header-only prelude
/// - P0003: a small vehicle (5x4)
pub fn write_dota_dataset(root: &Path) {
    for name in ["P0001", "P0002", "P0003"] {
        write_bmp(&root.join("images").join(format!("{name}.png")), 64, 48);
    }
    write_file(
        &root.join("labelTxt/P0001.txt"),
        "imagesource:GoogleEarth\ngsd:0.15\n\
         0 0 10 0 10 10 0 10 small-vehicle 0\n\
         20 10 50 10 50 40 20 40 plane 0\n",
    );
    write_file(
        &root.join("labelTxt/P0002.txt"),
        "imagesource:GoogleEarth\ngsd:0.15\n\
         0 0 25 0 25 20 0 20 small-vehicle 1\n",
    );
    write_file(
        &root.join("labelTxt/P0003.txt"),
        "1.9 1.9 6.9 1.9 6.9 5.9 1.9 5.9 small-vehicle 0\n",
    );
}

/// DIOR layout with three 80x80 images, one object each:
/// 00001 vehicle 10x10, 00002 airplane 40x40, 00003 vehicle 12x12.
pub fn write_dior_dataset(root: &Path) {
    let objects = [
        ("00001", "vehicle", [10, 10, 20, 20]),
        ("00002", "airplane", [0, 0, 40, 40]),
        ("00003", "vehicle", [30, 30, 42, 42]),
    ];
    for (name, label, [xmin, ymin, xmax, ymax]) in objects {
        write_bmp(&root.join("JPEGImages-all").join(format!("{name}.jpg")), 80, 80);
        write_file(
            &root
                .join("Annotations/Horizontal Bounding Boxes")
                .join(format!("{name}.xml")),
            format!(
                "<annotation><filename>{name}.jpg</filename>\
                 <object><name>{label}</name><pose>Unspecified</pose>\
                 <bndbox><xmin>{xmin}</xmin><ymin>{ymin}</ymin><xmax>{xmax}</xmax><ymax>{ymax}</ymax></bndbox>\
                 </object></annotation>"
            ),
        );
    }
}

/// FAIR1M layout with three 100x100 images:
/// 0 Small Car 10x10, 1 Van 12x8 plus Boeing737 50x50, 2 Small Car 8x8.
pub fn write_fair1m_dataset(root: &Path) {
    let objects: [(&str, &[(&str, [f64; 4])]); 3] = [
        ("0", &[("Small Car", [10.0, 10.0, 20.0, 20.0])]),
        (
            "1",
            &[
                ("Van", [0.0, 0.0, 12.0, 8.0]),
                ("Boeing737", [40.0, 40.0, 90.0, 90.0]),
            ],
        ),
        ("2", &[("Small Car", [1.5, 1.5, 9.5, 9.5])]),
    ];
    for (name, items) in objects {
        write_bmp(&root.join("images").join(format!("{name}.tif")), 100, 100);
        let body: String = items
            .iter()
            .map(|(label, [x0, y0, x1, y1])| {
                format!(
                    "<object><possibleresult><name>{label}</name></possibleresult><points>\
                     <point>{x0},{y0}</point><point>{x1},{y0}</point>\
                     <point>{x1},{y1}</point><point>{x0},{y1}</point><point>{x0},{y0}</point>\
                     </points></object>"
                )
            })
            .collect();
        write_file(
            &root.join("labelXml").join(format!("{name}.xml")),
            format!("<annotation><objects>{body}</objects></annotation>"),
        );
    }
}

/// VEDAI layout with three 512x512 images:
/// 00000001 car 14x12 and plane 40x40, 00000002 van 10x10, 00000003 pickup 10x10.
pub fn write_vedai_dataset(root: &Path) {
    let files = [
        (
            "00000001",
            "100.0 100.0 0.1 1 1 0 93 107 107 93 94 94 106 106\n\
             300.0 300.0 0.0 31 1 0 280 320 320 280 280 280 320 320\n",
        ),
        (
            "00000002",
            "50.0 50.0 0.0 10 1 0 45 55 55 45 45 45 55 55\n",
        ),
        (
            "00000003",
            "50.0 50.0 0.0 3 1 0 45 55 55 45 45 45 55 55\n",
        ),
    ];
    for (name, lines) in files {
        write_bmp(
            &root.join("Vehicules512").join(format!("{name}_co.png")),
            512,
            512,
        );
        write_file(&root.join("Annotations512").join(format!("{name}.txt")), lines);
    }
}

/// xView files: images 5.tif, 10.tif, 100.tif (200x200), a GeoJSON with a
/// Small Car on each plus a building on 10.tif, a class-label file and a
/// mapping file.
pub fn write_xview_dataset(root: &Path) {
    for name in ["5.tif", "10.tif", "100.tif"] {
        write_bmp(&root.join("train_images").join(name), 200, 200);
    }
    write_file(
        &root.join("xView_train.geojson"),
        r#"{"type": "FeatureCollection", "features": [
  {"type": "Feature", "properties": {"bounds_imcoords": "10,10,20,20", "image_id": "100.tif", "type_id": 18}},
  {"type": "Feature", "properties": {"bounds_imcoords": "10,10,25,25", "image_id": "10.tif", "type_id": 18}},
  {"type": "Feature", "properties": {"bounds_imcoords": "0,0,60,60", "image_id": "10.tif", "type_id": 73}},
  {"type": "Feature", "properties": {"bounds_imcoords": "1,1,2", "image_id": "10.tif", "type_id": 18}},
  {"type": "Feature", "properties": {"bounds_imcoords": "5,5,9,9", "image_id": "5.tif", "type_id": 18}},
  {"type": "Feature", "properties": {"bounds_imcoords": "5,5,9,9", "image_id": "1395.tif", "type_id": 18}}
]}"#,
    );
    write_file(
        &root.join("xview_class_labels.txt"),
        "11:Fixed-wing Aircraft\n18:Small Car\n73:Building\n",
    );
    write_file(
        &root.join("category_id_mapping.json"),
        r#"{"11": "0", "18": "1", "73": "2"}"#,
    );
}
