mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use rs2coco::ir::io_coco_json::read_coco_json;

fn rs2coco() -> Command {
    let mut cmd = Command::cargo_bin("rs2coco").unwrap();
    cmd.env_remove("RS2COCO_XVIEW_CLASS_LABELS")
        .env_remove("RS2COCO_XVIEW_CATEGORY_MAPPING")
        .env("RUST_LOG", "warn");
    cmd
}

#[test]
fn runs() {
    rs2coco().assert().success();
}

#[test]
fn outputs_tool_name() {
    rs2coco()
        .arg("-V")
        .assert()
        .success()
        .stdout("rs2coco 0.1.0\n");
}

#[test]
fn dota2_converts_and_prints_report() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("dota");
    common::write_dota_dataset(&root);
    let split = temp.path().join("train.txt");
    common::write_split(&split, "images", &["P0001.png", "P0002.png"]);
    let out = temp.path().join("out");

    rs2coco()
        .arg("dota2")
        .arg(&root)
        .arg(&split)
        .arg(&out)
        .args(["car_other", "--no-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted DOTA2 (car_other mode)"))
        .stdout(predicate::str::contains(
            "output: 2 images, 2 categories, 1 annotations",
        ))
        .stdout(predicate::str::contains("kept by label: small-vehicle 1"));

    let coco = read_coco_json(&out.join("train.json")).unwrap();
    assert_eq!(coco.images.len(), 2);
    assert_eq!(coco.annotations.len(), 1);
    assert_eq!(coco.annotations[0].category_id, 1);
}

#[test]
fn json_report_is_machine_readable() {
    let temp = tempfile::tempdir().unwrap();
    common::write_vedai_dataset(temp.path());
    let split = temp.path().join("fold01.txt");
    common::write_split(&split, "Vehicules512", &["00000001_co.png"]);

    let output = rs2coco()
        .arg("vedai")
        .arg(temp.path())
        .arg(&split)
        .arg(temp.path().join("out"))
        .args(["car", "--no-progress", "--report", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["dataset"], "VEDAI");
    assert_eq!(report["mode"], "car");
    assert_eq!(report["output"]["annotations"], 1);
    assert_eq!(report["dropped"]["unmapped_label"], 1);
}

#[test]
fn category_remap_file_is_applied() {
    let temp = tempfile::tempdir().unwrap();
    common::write_dior_dataset(temp.path());
    let split = temp.path().join("train.txt");
    common::write_split(&split, "JPEGImages-all", &["00001.jpg", "00002.jpg"]);
    let remap = temp.path().join("remap.json");
    common::write_file(&remap, r#"{"vehicle": "0"}"#);

    rs2coco()
        .arg("dior")
        .arg(temp.path())
        .arg(&split)
        .arg(temp.path().join("out"))
        .arg("original")
        .arg("--category-remap")
        .arg(&remap)
        .arg("--no-progress")
        .assert()
        .success();

    let coco = read_coco_json(&temp.path().join("out/train.json")).unwrap();
    assert_eq!(coco.categories.len(), 1);
    assert_eq!(coco.categories[0].name, "vehicle");
    assert_eq!(coco.annotations.len(), 1);
}

#[test]
fn xview_aux_files_come_from_env() {
    let temp = tempfile::tempdir().unwrap();
    common::write_xview_dataset(temp.path());
    let split = temp.path().join("xview_train.txt");
    common::write_split(&split, "train_images", &["5.tif"]);

    rs2coco()
        .env(
            "RS2COCO_XVIEW_CLASS_LABELS",
            temp.path().join("xview_class_labels.txt"),
        )
        .env(
            "RS2COCO_XVIEW_CATEGORY_MAPPING",
            temp.path().join("category_id_mapping.json"),
        )
        .arg("xview")
        .arg(temp.path().join("train_images"))
        .arg(&split)
        .arg(temp.path().join("xView_train.geojson"))
        .arg(temp.path().join("out"))
        .args(["car", "--no-progress"])
        .assert()
        .success();

    let coco = read_coco_json(&temp.path().join("out/xview_train.json")).unwrap();
    assert_eq!(coco.images[0].file_name, "5.tif");
    assert_eq!(coco.annotations.len(), 1);
}

#[test]
fn xview_without_class_labels_fails() {
    let temp = tempfile::tempdir().unwrap();
    common::write_xview_dataset(temp.path());
    let split = temp.path().join("xview_train.txt");
    common::write_split(&split, "train_images", &["5.tif"]);

    rs2coco()
        .current_dir(temp.path().join("train_images"))
        .arg("xview")
        .arg(temp.path().join("train_images"))
        .arg(&split)
        .arg(temp.path().join("xView_train.geojson"))
        .arg(temp.path().join("out"))
        .arg("original")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("xview_class_labels.txt"));
}

#[test]
fn invalid_mode_is_a_usage_error() {
    let temp = tempfile::tempdir().unwrap();
    rs2coco()
        .arg("dior")
        .arg(temp.path())
        .arg(temp.path().join("train.txt"))
        .arg(temp.path().join("out"))
        .arg("trucks")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("car_other"));
}

#[test]
fn missing_data_dir_fails() {
    let temp = tempfile::tempdir().unwrap();
    rs2coco()
        .arg("fair1m")
        .arg(temp.path().join("nope"))
        .arg(temp.path().join("train.txt"))
        .arg(temp.path().join("out"))
        .arg("original")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid dataset layout"));
}

#[test]
fn single_segment_split_line_fails_for_dior() {
    let temp = tempfile::tempdir().unwrap();
    common::write_dior_dataset(temp.path());
    let split = temp.path().join("train.txt");
    common::write_file(&split, "00001.jpg\n");

    rs2coco()
        .arg("dior")
        .arg(temp.path())
        .arg(&split)
        .arg(temp.path().join("out"))
        .args(["original", "--no-progress"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 1"));
}

const COCO_SAMPLE: &str = r#"{
  "images": [
    {"id": 1, "file_name": "a.png", "width": 100, "height": 100},
    {"id": 2, "file_name": "b.png", "width": 100, "height": 100}
  ],
  "annotations": [
    {"id": 1, "image_id": 1, "category_id": 5, "bbox": [0, 0, 10, 10], "area": 100, "iscrowd": 0},
    {"id": 2, "image_id": 2, "category_id": 2, "bbox": [0, 0, 30, 30], "area": 900, "iscrowd": 0}
  ],
  "categories": [
    {"id": 2, "name": "ship", "supercategory": "ship"},
    {"id": 5, "name": "small-vehicle", "supercategory": "small-vehicle"}
  ]
}"#;

#[test]
fn filter_category_writes_suffixed_file() {
    let temp = tempfile::tempdir().unwrap();
    let input = temp.path().join("train.json");
    common::write_file(&input, COCO_SAMPLE);

    rs2coco()
        .arg("filter-category")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(temp.path().join("small.json"))
        .args(["-m", "0", "-x", "400", "-c", "small-vehicle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("before: 2 images"))
        .stdout(predicate::str::contains("after: 1 images"));

    let coco = read_coco_json(&temp.path().join("small_small-vehicle_0_400.json")).unwrap();
    assert_eq!(coco.images.len(), 1);
    assert_eq!(coco.annotations[0].id, Some(1));
    assert_eq!(coco.categories.len(), 2);
}

#[test]
fn filter_category_unknown_name_fails() {
    let temp = tempfile::tempdir().unwrap();
    let input = temp.path().join("train.json");
    common::write_file(&input, COCO_SAMPLE);

    rs2coco()
        .arg("filter-category")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(temp.path().join("small.json"))
        .args(["-m", "0", "-x", "400", "-c", "plane"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Category 'plane' not found"));
}

#[test]
fn filter_car_only_relabels() {
    let temp = tempfile::tempdir().unwrap();
    let input = temp.path().join("train.json");
    common::write_file(&input, COCO_SAMPLE);
    let output = temp.path().join("cars.json");

    rs2coco()
        .arg("filter-car")
        .arg("-f")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["-x", "400", "--car-only"])
        .assert()
        .success();

    let coco = read_coco_json(&output).unwrap();
    assert_eq!(coco.categories.len(), 1);
    assert_eq!(coco.categories[0].name, "Car");
    assert_eq!(coco.annotations.len(), 1);
    assert_eq!(coco.annotations[0].category_id, 0);
    assert_eq!(coco.images.len(), 1);
}

#[test]
fn filter_car_honours_custom_car_id() {
    let temp = tempfile::tempdir().unwrap();
    let input = temp.path().join("train.json");
    common::write_file(&input, COCO_SAMPLE);
    let output = temp.path().join("car_other.json");

    rs2coco()
        .arg("filter-car")
        .arg("-f")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["-x", "1000", "--car-category-id", "2"])
        .assert()
        .success();

    let coco = read_coco_json(&output).unwrap();
    let labels: Vec<(Option<u64>, u64)> = coco
        .annotations
        .iter()
        .map(|a| (a.id, a.category_id))
        .collect();
    assert_eq!(labels, vec![(Some(1), 0), (Some(2), 1)]);
    assert_eq!(coco.images.len(), 2);
}

#[test]
fn filter_car_accepts_float_sizes_and_missing_ids() {
    let temp = tempfile::tempdir().unwrap();
    let input = temp.path().join("train.json");
    common::write_file(
        &input,
        r#"{
          "images": [{"id": 7, "file_name": "7.tif", "width": 512.0, "height": 512.0}],
          "annotations": [{"image_id": 7, "category_id": 5, "bbox": [0, 0, 10, 10]}],
          "categories": [{"id": 5, "name": "small-vehicle"}]
        }"#,
    );
    let output = temp.path().join("cars.json");

    rs2coco()
        .arg("filter-car")
        .arg("-f")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["-x", "400", "--car-only"])
        .assert()
        .success();

    let coco = read_coco_json(&output).unwrap();
    assert_eq!(coco.images[0].width, 512);
    assert_eq!(coco.annotations.len(), 1);
    assert_eq!(coco.annotations[0].id, None);
}
