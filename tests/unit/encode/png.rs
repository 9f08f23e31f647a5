use super::*;
use crate::foundation::core::{Canvas, Fps};

fn format() -> VideoFormat {
    VideoFormat::new(3, 2, Fps::new(25, 1).unwrap()).unwrap()
}

fn frame() -> FrameRGBA {
    FrameRGBA::new(Canvas {
        width: 3,
        height: 2,
    })
    .unwrap()
}

#[test]
fn writes_every_nth_frame() {
    let dir = PathBuf::from("target").join("unit_png").join("every");
    let _ = std::fs::remove_dir_all(&dir);

    let mut sink = PngSequenceSink::new(&dir).with_every(2);
    sink.begin(format()).unwrap();
    for k in 0..5u64 {
        sink.push_frame(FrameIndex(k), k as i64 * 40_000, &frame())
            .unwrap();
    }
    sink.end().unwrap();

    let names: Vec<_> = sink
        .written()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        ["frame_000000.png", "frame_000002.png", "frame_000004.png"]
    );
    let img = image::open(&sink.written()[1]).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(1, 1).0, [0, 0, 0, 255]);
}

#[test]
fn rejects_misuse() {
    let dir = PathBuf::from("target").join("unit_png").join("misuse");
    let mut sink = PngSequenceSink::new(&dir);
    assert!(sink.push_frame(FrameIndex(0), 0, &frame()).is_err());
    assert!(sink.end().is_err());

    sink.begin(format()).unwrap();
    sink.push_frame(FrameIndex(3), 0, &frame()).unwrap();
    assert!(sink.push_frame(FrameIndex(3), 1, &frame()).is_err());

    let wrong = FrameRGBA::new(Canvas {
        width: 2,
        height: 2,
    })
    .unwrap();
    assert!(sink.push_frame(FrameIndex(4), 2, &wrong).is_err());
}
