//! JSON show manifests: everything needed to build a [`SlideshowSource`] from files on disk.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::assets::decode::load_image;
use crate::engine::SlideshowSource;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::slide::caption::{Caption, CaptionStyle};
use crate::slide::kenburns::KenBurns;
use crate::slide::record::Slide;
use crate::source::VideoFormat;

/// A whole show as written in a manifest file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShowManifest {
    /// Output dimensions.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Silence padded after each slide's narration, in microseconds.
    pub audio_transition_us: i64,
    /// Requested crossfade length between slides, in microseconds.
    pub slide_transition_us: i64,
    /// Caption styling; required when any slide has `text`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captions: Option<CaptionsDef>,
    /// Slides in presentation order.
    pub slides: Vec<SlideDef>,
}

/// Caption styling shared by every slide of a [`ShowManifest`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaptionsDef {
    /// Font file (TTF/OTF) relative to the manifest root.
    pub font: String,
    /// Font size in pixels.
    pub size_px: f32,
    /// Straight-alpha RGBA text color; white when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[u8; 4]>,
    /// Gap between the text and the frame edges; half the font size when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_px: Option<f32>,
}

/// One slide entry of a [`ShowManifest`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlideDef {
    /// Image path relative to the manifest root. A slide without one is drawn black.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Narration length in microseconds.
    pub audio_duration_us: i64,
    /// Pan/zoom in source-image pixels; the whole image without motion when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ken_burns: Option<KenBurns>,
    /// Caption drawn at the bottom of the slide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A validated manifest with every slide image decoded.
#[derive(Clone, Debug)]
pub struct PreparedShow {
    /// Output format.
    pub format: VideoFormat,
    /// Decoded slides.
    pub slides: Vec<Slide>,
    /// Silence padded after each slide's narration, in microseconds.
    pub audio_transition_us: i64,
    /// Requested crossfade length, in microseconds.
    pub slide_transition_us: i64,
}

impl ShowManifest {
    /// Parse a manifest from JSON.
    pub fn from_reader<R: std::io::Read>(r: R) -> ReelResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ReelError::serde(format!("parse show manifest: {e}")))
    }

    /// Parse a manifest from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ReelError::validation(format!("open show manifest '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check everything that can be checked without touching the file system.
    pub fn validate(&self) -> ReelResult<()> {
        VideoFormat {
            canvas: self.canvas,
            fps: self.fps,
        }
        .validate()?;
        if self.slides.is_empty() {
            return Err(ReelError::validation("show must contain at least one slide"));
        }
        if self.audio_transition_us < 0 || self.slide_transition_us < 0 {
            return Err(ReelError::validation(format!(
                "transition lengths must be >= 0us, got audio={} slide={}",
                self.audio_transition_us, self.slide_transition_us
            )));
        }
        if let Some(captions) = &self.captions {
            normalize_rel_path(&captions.font)
                .map_err(|e| ReelError::validation(format!("captions: {e}")))?;
            if !captions.size_px.is_finite() || captions.size_px <= 0.0 {
                return Err(ReelError::validation(format!(
                    "captions: size_px must be finite and > 0, got {}",
                    captions.size_px
                )));
            }
        }
        for (i, s) in self.slides.iter().enumerate() {
            match (&s.image, &s.ken_burns) {
                (Some(image), _) => {
                    normalize_rel_path(image).map_err(|e| prefix_err(i, e))?;
                }
                (None, Some(_)) => {
                    return Err(ReelError::validation(format!(
                        "slide {i}: ken_burns needs an image"
                    )));
                }
                (None, None) => {}
            }
            if s.audio_duration_us <= 0 {
                return Err(ReelError::validation(format!(
                    "slide {i}: audio_duration_us must be > 0, got {}",
                    s.audio_duration_us
                )));
            }
            if s.text.is_some() && self.captions.is_none() {
                return Err(ReelError::validation(format!(
                    "slide {i}: text needs a top-level captions section"
                )));
            }
        }
        Ok(())
    }

    fn load_caption_style(&self, root: &Path) -> ReelResult<Option<CaptionStyle>> {
        let Some(def) = &self.captions else {
            return Ok(None);
        };
        let path = resolve(root, &def.font)?;
        let bytes = std::fs::read(&path).map_err(|e| {
            ReelError::decode(format!("read caption font '{}': {e}", path.display()))
        })?;
        let mut style = CaptionStyle::new(bytes, def.size_px)?;
        if let Some(color) = def.color {
            style = style.with_color(color);
        }
        if let Some(margin_px) = def.margin_px {
            style = style.with_margin_px(margin_px);
        }
        tracing::trace!(font = %path.display(), "loaded caption font");
        Ok(Some(style))
    }

    /// Validate, then decode every slide image and the caption font relative to `root`.
    #[tracing::instrument(
        skip(self, root),
        fields(root = %root.as_ref().display(), slides = self.slides.len())
    )]
    pub fn prepare(&self, root: impl AsRef<Path>) -> ReelResult<PreparedShow> {
        self.validate()?;
        let root = root.as_ref();
        let caption_style = self.load_caption_style(root)?;

        let mut slides = Vec::with_capacity(self.slides.len());
        for (i, def) in self.slides.iter().enumerate() {
            let mut slide = match &def.image {
                Some(rel) => {
                    let path = resolve(root, rel).map_err(|e| prefix_err(i, e))?;
                    let image = load_image(&path).map_err(|e| prefix_err(i, e))?;
                    let pan_zoom = def
                        .ken_burns
                        .unwrap_or_else(|| KenBurns::full_image(image.width(), image.height()));
                    pan_zoom
                        .validate_for(image.width(), image.height())
                        .map_err(|e| prefix_err(i, e))?;
                    tracing::trace!(slide = i, path = %path.display(), "decoded slide image");
                    Slide::new(image, def.audio_duration_us, pan_zoom)?
                }
                None => Slide::blank(def.audio_duration_us)?,
            };
            if let (Some(text), Some(style)) = (&def.text, &caption_style) {
                slide = slide.with_caption(Caption::new(text.clone(), style.clone()));
            }
            slides.push(slide);
        }

        Ok(PreparedShow {
            format: VideoFormat {
                canvas: self.canvas,
                fps: self.fps,
            },
            slides,
            audio_transition_us: self.audio_transition_us,
            slide_transition_us: self.slide_transition_us,
        })
    }
}

impl PreparedShow {
    /// Build the frame source for this show.
    pub fn into_source(self) -> ReelResult<SlideshowSource> {
        SlideshowSource::new(
            self.format,
            self.slides,
            self.audio_transition_us,
            self.slide_transition_us,
        )
    }
}

fn resolve(root: &Path, rel: &str) -> ReelResult<PathBuf> {
    let norm = normalize_rel_path(rel)?;
    Ok(norm.split('/').fold(root.to_path_buf(), |p, part| p.join(part)))
}

fn prefix_err(slide: usize, e: ReelError) -> ReelError {
    match e {
        ReelError::Validation(m) => ReelError::Validation(format!("slide {slide}: {m}")),
        ReelError::Decode(m) => ReelError::Decode(format!("slide {slide}: {m}")),
        other => other,
    }
}

/// Normalize a manifest image path to `a/b/c` form.
///
/// Backslashes become `/`, empty and `.` components are dropped. Absolute paths and `..`
/// components are rejected.
pub(crate) fn normalize_rel_path(source: &str) -> ReelResult<String> {
    let s = source.replace('\\', "/");
    if s.is_empty() {
        return Err(ReelError::validation("image path must be non-empty"));
    }
    if s.starts_with('/') || s.as_bytes().get(1) == Some(&b':') {
        return Err(ReelError::validation(format!(
            "image paths must be relative, got '{source}'"
        )));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ReelError::validation(format!(
                "image paths must not contain '..', got '{source}'"
            )));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ReelError::validation("image path must contain a file name"));
    }
    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../tests/unit/manifest.rs"]
mod tests;
