//! Ad templates: preset bundles of aspect ratios, durations and caption style.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Output aspect ratio, serialized as `"W:H"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "String", into = "String")]
#[schemars(with = "String")]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// Stories, Reels, TikTok (9:16)
    pub const PORTRAIT: AspectRatio = AspectRatio::new(9, 16);

    /// Square feed posts (1:1)
    pub const SQUARE: AspectRatio = AspectRatio::new(1, 1);

    /// Instagram portrait feed (4:5)
    pub const INSTAGRAM_PORTRAIT: AspectRatio = AspectRatio::new(4, 5);

    /// YouTube and web players (16:9)
    pub const LANDSCAPE: AspectRatio = AspectRatio::new(16, 9);

    /// Every ratio an edit can be rendered in.
    pub const SUPPORTED: [AspectRatio; 4] = [
        Self::PORTRAIT,
        Self::SQUARE,
        Self::LANDSCAPE,
        Self::INSTAGRAM_PORTRAIT,
    ];

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the aspect ratio as a decimal.
    pub fn as_f64(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Filesystem-friendly form, e.g. `9x16`.
    pub fn slug(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for AspectRatio {
    type Err = AspectRatioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| AspectRatioParseError::InvalidFormat(s.to_string()))?;

        let width = w
            .parse()
            .map_err(|_| AspectRatioParseError::InvalidNumber(w.to_string()))?;
        let height = h
            .parse()
            .map_err(|_| AspectRatioParseError::InvalidNumber(h.to_string()))?;

        if width == 0 || height == 0 {
            return Err(AspectRatioParseError::ZeroValue);
        }

        let ratio = AspectRatio { width, height };
        if !AspectRatio::SUPPORTED.contains(&ratio) {
            return Err(AspectRatioParseError::Unsupported(s.trim().to_string()));
        }

        Ok(ratio)
    }
}

impl TryFrom<String> for AspectRatio {
    type Error = AspectRatioParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AspectRatio> for String {
    fn from(value: AspectRatio) -> Self {
        value.to_string()
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::PORTRAIT
    }
}

#[derive(Debug, Error)]
pub enum AspectRatioParseError {
    #[error("Invalid aspect ratio format: {0}, expected 'W:H'")]
    InvalidFormat(String),
    #[error("Invalid number in aspect ratio: {0}")]
    InvalidNumber(String),
    #[error("Aspect ratio cannot have zero values")]
    ZeroValue,
    #[error("Unsupported aspect ratio: {0}, expected one of 9:16, 1:1, 16:9, 4:5")]
    Unsupported(String),
}

/// Burned-in caption look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum CaptionStyle {
    None,
    #[default]
    Minimal,
    Bold,
    Karaoke,
}

impl CaptionStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptionStyle::None => "none",
            CaptionStyle::Minimal => "minimal",
            CaptionStyle::Bold => "bold",
            CaptionStyle::Karaoke => "karaoke",
        }
    }
}

impl fmt::Display for CaptionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CaptionStyle {
    type Err = CaptionStyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(CaptionStyle::None),
            "minimal" => Ok(CaptionStyle::Minimal),
            "bold" => Ok(CaptionStyle::Bold),
            "karaoke" => Ok(CaptionStyle::Karaoke),
            _ => Err(CaptionStyleParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown caption style: {0}")]
pub struct CaptionStyleParseError(String);

/// A named preset for generated ad cuts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: String,
    pub aspect_ratios: Vec<AspectRatio>,
    /// Target durations in seconds
    pub durations: Vec<u32>,
    pub caption_style: CaptionStyle,
}

impl Template {
    fn preset(
        id: &str,
        name: &str,
        description: &str,
        aspect_ratios: &[AspectRatio],
        durations: &[u32],
        caption_style: CaptionStyle,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            aspect_ratios: aspect_ratios.to_vec(),
            durations: durations.to_vec(),
            caption_style,
        }
    }

    /// Built-in templates offered by the picker.
    pub fn presets() -> Vec<Template> {
        vec![
            Self::preset(
                "social-story",
                "Social Story",
                "Vertical cut for Stories, Reels and TikTok",
                &[AspectRatio::PORTRAIT],
                &[15, 30],
                CaptionStyle::Bold,
            ),
            Self::preset(
                "feed-square",
                "Feed Post",
                "Square and portrait feed placements",
                &[AspectRatio::SQUARE, AspectRatio::INSTAGRAM_PORTRAIT],
                &[15],
                CaptionStyle::Minimal,
            ),
            Self::preset(
                "youtube-bumper",
                "YouTube Bumper",
                "Six-second non-skippable landscape bumper",
                &[AspectRatio::LANDSCAPE],
                &[6],
                CaptionStyle::None,
            ),
            Self::preset(
                "multi-platform",
                "Multi-Platform Pack",
                "Every major placement in one job",
                &[AspectRatio::PORTRAIT, AspectRatio::SQUARE, AspectRatio::LANDSCAPE],
                &[15, 30],
                CaptionStyle::Karaoke,
            ),
        ]
    }

    /// Look up a preset by id (case-insensitive).
    pub fn find(id: &str) -> Option<Template> {
        Self::presets()
            .into_iter()
            .find(|t| t.id.eq_ignore_ascii_case(id.trim()))
    }

    /// Number of files a job built from this template produces.
    pub fn output_count(&self) -> usize {
        self.aspect_ratios.len() * self.durations.len()
    }
}
