#![allow(dead_code)]

use labelme2mask::{AnnotationDocument, Color, LabelColorMap, MaskConfig};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const RED: Color = Color([255, 0, 0]);
pub const GREEN: Color = Color([0, 255, 0]);

pub fn polygon(label: &str, points: Value) -> Value {
    json!({ "label": label, "points": points, "shape_type": "polygon", "group_id": null })
}

pub fn document(width: u32, height: u32, shapes: Vec<Value>) -> Value {
    json!({
        "version": "5.2.1",
        "flags": {},
        "shapes": shapes,
        "imagePath": "image.jpg",
        "imageData": null,
        "imageWidth": width,
        "imageHeight": height,
    })
}

pub fn parse(value: Value) -> AnnotationDocument {
    serde_json::from_value(value).unwrap()
}

pub fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

pub fn config(labels: &[(&str, Color)]) -> MaskConfig {
    let labels: LabelColorMap = labels
        .iter()
        .map(|(label, color)| (label.to_string(), *color))
        .collect();
    MaskConfig::new(Color::BLACK, labels)
}

pub fn full_square(size: i32) -> Value {
    let max = size - 1;
    json!([[0, 0], [max, 0], [max, max], [0, max]])
}
