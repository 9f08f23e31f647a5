use crate::assets::image::SlideImage;
use crate::foundation::error::{ReelError, ReelResult};
use crate::slide::caption::Caption;
use crate::slide::kenburns::KenBurns;

/// One slide of the show: an optional picture, the length of its narration, its pan/zoom, and an
/// optional caption.
///
/// A slide without a picture is drawn as black, with its caption on top. Immutable once
/// constructed.
#[derive(Clone, Debug)]
pub struct Slide {
    image: Option<SlideImage>,
    audio_duration_us: i64,
    pan_zoom: Option<KenBurns>,
    caption: Option<Caption>,
}

impl Slide {
    /// Build a slide. `audio_duration_us` must be positive.
    pub fn new(image: SlideImage, audio_duration_us: i64, pan_zoom: KenBurns) -> ReelResult<Self> {
        Self::build(Some(image), audio_duration_us, Some(pan_zoom))
    }

    /// Build a slide that shows the whole image without motion.
    pub fn still(image: SlideImage, audio_duration_us: i64) -> ReelResult<Self> {
        let pan_zoom = KenBurns::full_image(image.width(), image.height());
        Self::new(image, audio_duration_us, pan_zoom)
    }

    /// Build a slide without a picture.
    pub fn blank(audio_duration_us: i64) -> ReelResult<Self> {
        Self::build(None, audio_duration_us, None)
    }

    fn build(
        image: Option<SlideImage>,
        audio_duration_us: i64,
        pan_zoom: Option<KenBurns>,
    ) -> ReelResult<Self> {
        if audio_duration_us <= 0 {
            return Err(ReelError::validation(format!(
                "slide audio duration must be > 0us, got {audio_duration_us}"
            )));
        }
        Ok(Self {
            image,
            audio_duration_us,
            pan_zoom,
            caption: None,
        })
    }

    /// Attach a caption.
    pub fn with_caption(mut self, caption: Caption) -> Self {
        self.caption = Some(caption);
        self
    }

    /// Decoded picture, if any.
    pub fn image(&self) -> Option<&SlideImage> {
        self.image.as_ref()
    }

    /// Narration length in microseconds.
    pub fn audio_duration_us(&self) -> i64 {
        self.audio_duration_us
    }

    /// Pan/zoom interpolator, present whenever there is a picture.
    pub fn pan_zoom(&self) -> Option<&KenBurns> {
        self.pan_zoom.as_ref()
    }

    /// Caption, if any.
    pub fn caption(&self) -> Option<&Caption> {
        self.caption.as_ref()
    }

    pub(crate) fn into_content(self) -> (Option<SlideImage>, Option<Caption>) {
        (self.image, self.caption)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/slide/record.rs"]
mod tests;
