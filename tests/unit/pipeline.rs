use super::*;
use crate::assets::image::SlideImage;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::Fps;
use crate::slide::record::Slide;
use crate::source::VideoFormat;

#[derive(Default)]
struct ScriptedSource {
    total: u64,
    produced: u64,
    closes: u32,
    setup_fails: bool,
    fail_at: Option<u64>,
    repeat_timestamp: bool,
}

impl FrameSource for ScriptedSource {
    fn setup(&mut self) -> ReelResult<()> {
        if self.setup_fails {
            return Err(ReelError::decode("boom"));
        }
        Ok(())
    }

    fn fill_frame(&mut self, _frame: &mut FrameRGBA) -> ReelResult<i64> {
        if self.fail_at == Some(self.produced) {
            return Err(ReelError::render("scripted failure"));
        }
        let ts = if self.repeat_timestamp {
            0
        } else {
            self.produced as i64 * 1_000
        };
        self.produced += 1;
        Ok(ts)
    }

    fn output_format(&self) -> VideoFormat {
        VideoFormat::new(2, 2, Fps::new(1000, 1).unwrap()).unwrap()
    }

    fn is_done(&self) -> bool {
        self.produced >= self.total
    }

    fn close(&mut self) {
        self.closes += 1;
    }
}

#[test]
fn pump_runs_to_completion_and_closes_once() {
    let mut src = ScriptedSource {
        total: 5,
        ..Default::default()
    };
    let mut sink = InMemorySink::new();
    let stats = pump(&mut src, &mut sink).unwrap();
    assert_eq!(stats.frames, 5);
    assert_eq!(stats.last_timestamp_us, Some(4_000));
    assert!(stats.completed);
    assert_eq!(src.closes, 1);
    assert!(sink.ended());
    assert_eq!(sink.frames().len(), 5);
    assert_eq!(sink.frames()[3].idx, FrameIndex(3));
}

#[test]
fn pump_closes_on_setup_and_fill_errors() {
    let mut src = ScriptedSource {
        total: 5,
        setup_fails: true,
        ..Default::default()
    };
    assert!(pump(&mut src, &mut InMemorySink::new()).is_err());
    assert_eq!(src.closes, 1);

    let mut src = ScriptedSource {
        total: 5,
        fail_at: Some(2),
        ..Default::default()
    };
    let mut sink = InMemorySink::new();
    assert!(pump(&mut src, &mut sink).is_err());
    assert_eq!(src.closes, 1);
    assert_eq!(sink.frames().len(), 2);
    assert!(!sink.ended());
}

#[test]
fn pump_can_stop_early() {
    let mut src = ScriptedSource {
        total: 50,
        ..Default::default()
    };
    let stats = pump_with(
        &mut src,
        &mut InMemorySink::new(),
        PumpOpts {
            max_frames: Some(3),
        },
    )
    .unwrap();
    assert_eq!(stats.frames, 3);
    assert!(!stats.completed);
    assert_eq!(src.closes, 1);
}

#[test]
fn pump_rejects_non_increasing_timestamps() {
    let mut src = ScriptedSource {
        total: 3,
        repeat_timestamp: true,
        ..Default::default()
    };
    let err = pump(&mut src, &mut InMemorySink::new()).unwrap_err();
    assert!(err.to_string().contains("non-increasing"));
}

fn show() -> SlideshowSource {
    let format = VideoFormat::new(4, 4, Fps::new(20, 1).unwrap()).unwrap();
    let slides = vec![
        Slide::still(SlideImage::solid(2, 2, [250, 10, 10]).unwrap(), 400_000).unwrap(),
        Slide::still(SlideImage::solid(2, 2, [10, 250, 10]).unwrap(), 600_000).unwrap(),
    ];
    SlideshowSource::new(format, slides, 100_000, 200_000).unwrap()
}

#[test]
fn pump_drives_a_slideshow() {
    let mut src = show();
    let expected = src.expected_frame_count();
    let mut sink = InMemorySink::new();
    let stats = pump(&mut src, &mut sink).unwrap();
    assert_eq!(stats.frames, expected);
    assert!(stats.completed);
    assert_eq!(src.loaded_slides(), 0);
    for (k, f) in sink.frames().iter().enumerate() {
        assert_eq!(f.timestamp_us, k as i64 * 50_000);
    }
}

#[test]
fn render_frame_at_matches_sequential_pull() {
    let mut sink = InMemorySink::new();
    pump(&mut show(), &mut sink).unwrap();

    let (ts, frame) = render_frame_at(&mut show(), FrameIndex(9)).unwrap();
    assert_eq!(ts, sink.frames()[9].timestamp_us);
    assert_eq!(frame, sink.frames()[9].frame);

    let past = FrameIndex(sink.frames().len() as u64);
    assert!(render_frame_at(&mut show(), past).is_err());
}
