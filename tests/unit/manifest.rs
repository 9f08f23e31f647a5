use std::path::PathBuf;

use super::*;
use crate::source::FrameSource;

const SHOW_JSON: &str = r#"{
  "canvas": { "width": 8, "height": 6 },
  "fps": { "num": 10, "den": 1 },
  "audio_transition_us": 100000,
  "slide_transition_us": 400000,
  "slides": [
    { "image": "imgs/./a.png", "audio_duration_us": 900000 },
    { "image": "imgs\\b.png", "audio_duration_us": 500000,
      "ken_burns": { "start": {"x0":0,"y0":0,"x1":4,"y1":3},
                     "end":   {"x0":2,"y0":1,"x1":6,"y1":4} } }
  ]
}"#;

fn write_png(path: &std::path::Path, w: u32, h: u32, rgb: [u8; 3]) {
    let img = image::RgbImage::from_pixel(w, h, image::Rgb(rgb));
    img.save(path).unwrap();
}

fn fixture_root(name: &str) -> PathBuf {
    let root = PathBuf::from("target").join("unit_manifest").join(name);
    std::fs::create_dir_all(root.join("imgs")).unwrap();
    write_png(&root.join("imgs").join("a.png"), 8, 6, [200, 0, 0]);
    write_png(&root.join("imgs").join("b.png"), 8, 6, [0, 0, 200]);
    root
}

#[test]
fn parses_and_validates() {
    let m = ShowManifest::from_reader(SHOW_JSON.as_bytes()).unwrap();
    assert_eq!(m.canvas, Canvas { width: 8, height: 6 });
    assert_eq!(m.fps, Fps { num: 10, den: 1 });
    assert_eq!(m.slides.len(), 2);
    assert!(m.slides[0].ken_burns.is_none());
    assert_eq!(m.slides[1].ken_burns.unwrap().end.x1, 6.0);
    m.validate().unwrap();
}

#[test]
fn unknown_fields_and_bad_json_are_serde_errors() {
    let err = ShowManifest::from_reader(&b"{ not json"[..]).unwrap_err();
    assert!(matches!(err, ReelError::Serde(_)));

    let extra = SHOW_JSON.replacen("\"canvas\"", "\"bogus\": 1, \"canvas\"", 1);
    let err = ShowManifest::from_reader(extra.as_bytes()).unwrap_err();
    assert!(matches!(err, ReelError::Serde(_)));
}

#[test]
fn validate_rejects_bad_configuration() {
    let base = ShowManifest::from_reader(SHOW_JSON.as_bytes()).unwrap();

    let mut m = base.clone();
    m.slides.clear();
    assert!(m.validate().is_err());

    let mut m = base.clone();
    m.fps.den = 0;
    assert!(m.validate().is_err());

    let mut m = base.clone();
    m.canvas.width = 0;
    assert!(m.validate().is_err());

    let mut m = base.clone();
    m.slide_transition_us = -1;
    assert!(m.validate().is_err());

    let mut m = base.clone();
    m.slides[1].audio_duration_us = 0;
    let err = m.validate().unwrap_err();
    assert!(err.to_string().contains("slide 1"));

    let mut m = base;
    m.slides[0].image = Some("../escape.png".to_owned());
    assert!(m.validate().is_err());
}

#[test]
fn validate_checks_captions_and_blank_slides() {
    let base = ShowManifest::from_reader(SHOW_JSON.as_bytes()).unwrap();

    let mut m = base.clone();
    m.slides[0].text = Some("Once upon a time".to_owned());
    let err = m.validate().unwrap_err();
    assert!(err.to_string().contains("captions"));

    let mut m = base.clone();
    m.slides[1].image = None;
    let err = m.validate().unwrap_err();
    assert!(err.to_string().contains("ken_burns"));

    let mut m = base.clone();
    m.slides[0].image = None;
    m.validate().unwrap();

    let mut m = base;
    m.captions = Some(CaptionsDef {
        font: "fonts/a.ttf".to_owned(),
        size_px: 0.0,
        color: None,
        margin_px: None,
    });
    assert!(m.validate().is_err());
    m.captions.as_mut().unwrap().size_px = 12.0;
    m.validate().unwrap();
    m.captions.as_mut().unwrap().font = "/fonts/a.ttf".to_owned();
    assert!(m.validate().is_err());
}

#[test]
fn normalize_rel_path_rules() {
    assert_eq!(normalize_rel_path("a/./b//c.png").unwrap(), "a/b/c.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("C:\\x.png").is_err());
    assert!(normalize_rel_path("a/../b.png").is_err());
    assert!(normalize_rel_path("./.").is_err());
}

#[test]
fn prepare_decodes_images_and_builds_a_source() {
    let root = fixture_root("ok");
    let m = ShowManifest::from_reader(SHOW_JSON.as_bytes()).unwrap();
    let prepared = m.prepare(&root).unwrap();

    assert_eq!(prepared.slides.len(), 2);
    assert_eq!(
        prepared.slides[0].pan_zoom(),
        Some(&KenBurns::full_image(8, 6))
    );
    assert_eq!(prepared.slides[1].audio_duration_us(), 500_000);
    assert_eq!(prepared.slides[0].image().map(|i| i.width()), Some(8));
    assert!(prepared.slides.iter().all(|s| s.caption().is_none()));

    let mut src = prepared.into_source().unwrap();
    assert_eq!(src.timeline().transition_us(), 400_000);
    src.setup().unwrap();
    assert!(!src.is_done());
}

#[test]
fn prepare_reports_missing_images_and_bad_crops() {
    let root = fixture_root("bad");
    let mut m = ShowManifest::from_reader(SHOW_JSON.as_bytes()).unwrap();
    m.slides[1].image = Some("imgs/missing.png".to_owned());
    assert!(m.prepare(&root).is_err());

    let mut m = ShowManifest::from_reader(SHOW_JSON.as_bytes()).unwrap();
    m.slides[1].ken_burns = Some(KenBurns::still(crate::foundation::core::Rect::new(
        0.0, 0.0, 20.0, 6.0,
    )));
    let err = m.prepare(&root).unwrap_err();
    assert!(err.to_string().contains("slide 1"));
}

#[test]
fn prepare_attaches_captions_and_blank_slides() {
    let root = fixture_root("captions");
    std::fs::create_dir_all(root.join("fonts")).unwrap();
    std::fs::copy(
        "tests/data/fonts/DejaVuSans.ttf",
        root.join("fonts").join("caption.ttf"),
    )
    .unwrap();

    let mut m = ShowManifest::from_reader(SHOW_JSON.as_bytes()).unwrap();
    m.captions = Some(CaptionsDef {
        font: "fonts/caption.ttf".to_owned(),
        size_px: 3.0,
        color: Some([255, 255, 0, 255]),
        margin_px: Some(1.0),
    });
    m.slides[0].text = Some("Hello".to_owned());
    m.slides.push(SlideDef {
        image: None,
        audio_duration_us: 700_000,
        ken_burns: None,
        text: Some("The end".to_owned()),
    });

    let prepared = m.prepare(&root).unwrap();
    let caption = prepared.slides[0].caption().unwrap();
    assert_eq!(caption.text, "Hello");
    assert_eq!(caption.style.color(), [255, 255, 0, 255]);
    assert_eq!(caption.style.margin_px(), 1.0);
    assert!(prepared.slides[1].caption().is_none());
    assert!(prepared.slides[2].image().is_none());
    assert!(prepared.slides[2].pan_zoom().is_none());
    assert_eq!(prepared.slides[2].caption().unwrap().text, "The end");

    let mut src = prepared.into_source().unwrap();
    src.setup().unwrap();
    assert_eq!(src.loaded_slides(), 3);
}

#[test]
fn prepare_reports_missing_caption_font() {
    let root = fixture_root("no_font");
    let mut m = ShowManifest::from_reader(SHOW_JSON.as_bytes()).unwrap();
    m.captions = Some(CaptionsDef {
        font: "fonts/missing.ttf".to_owned(),
        size_px: 12.0,
        color: None,
        margin_px: None,
    });
    assert!(matches!(m.prepare(&root), Err(ReelError::Decode(_))));
}
