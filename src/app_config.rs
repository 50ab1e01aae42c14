use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::danmaku::model::Comment;

/// Application configuration module
/// This module handles the converter configuration including loading
/// defaults and validating settings.
/// Represents the converter configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Script title; the input file stem is used when empty
    #[serde(default)]
    pub title: String,

    /// Font family of both styles
    #[serde(default = "default_font")]
    pub font: String,

    /// Transparency between 0 (opaque) and 1
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// On-screen durations
    #[serde(default)]
    pub duration: DisplayDuration,

    /// Comment types to drop, plus the `"color"` keyword for non-white comments
    #[serde(default)]
    pub block_types: Vec<BlockToken>,

    /// Target video resolution
    #[serde(default)]
    pub resolution: Resolution,

    /// Fraction of the screen height kept free at the bottom
    #[serde(default = "default_bottom_margin_percent")]
    pub bottom_margin_percent: f64,

    /// Bold styles
    #[serde(default)]
    pub bold: bool,

    /// Abort on malformed records and unknown font sizes instead of skipping them
    #[serde(default)]
    pub strict: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Target resolution in pixels
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Seconds a comment stays on screen, per behavior
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct DisplayDuration {
    /// Time to cross the screen for scrolling comments
    #[serde(default = "default_scroll_secs")]
    pub scroll_secs: f64,

    /// Time top and bottom comments stay visible
    #[serde(default = "default_fixed_secs")]
    pub fixed_secs: f64,
}

impl Default for DisplayDuration {
    fn default() -> Self {
        Self {
            scroll_secs: default_scroll_secs(),
            fixed_secs: default_fixed_secs(),
        }
    }
}

/// One entry of the block list
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(untagged)]
pub enum BlockToken {
    /// A comment type code (1-8)
    Type(u8),
    /// A keyword policy
    Keyword(BlockKeyword),
}

/// Block policies that are not a single type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlockKeyword {
    /// Drop every comment that is not pure white
    Color,
}

impl std::str::FromStr for BlockToken {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("color") {
            return Ok(Self::Keyword(BlockKeyword::Color));
        }
        s.parse::<u8>()
            .map(Self::Type)
            .map_err(|_| anyhow!("Invalid block type: {}", s))
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_font() -> String {
    "Microsoft YaHei".to_string()
}

fn default_alpha() -> f64 {
    0.4
}

fn default_scroll_secs() -> f64 {
    6.0
}

fn default_fixed_secs() -> f64 {
    4.0
}

fn default_bottom_margin_percent() -> f64 {
    0.15
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(anyhow!("Alpha must be between 0 and 1, got {}", self.alpha));
        }

        if !(0.0..=1.0).contains(&self.bottom_margin_percent) {
            return Err(anyhow!(
                "Bottom margin percent must be between 0 and 1, got {}",
                self.bottom_margin_percent
            ));
        }

        if self.resolution.width == 0 || self.resolution.height == 0 {
            return Err(anyhow!(
                "Resolution must be non-zero, got {}x{}",
                self.resolution.width,
                self.resolution.height
            ));
        }

        // NaN fails both comparisons
        if !(self.duration.scroll_secs > 0.0 && self.duration.fixed_secs > 0.0) {
            return Err(anyhow!("Display durations must be positive"));
        }

        if self.font.trim().is_empty() {
            return Err(anyhow!("Font name must not be empty"));
        }

        for token in &self.block_types {
            if let BlockToken::Type(code) = token {
                if !(1..=8).contains(code) {
                    return Err(anyhow!("Block type must be between 1 and 8, got {}", code));
                }
            }
        }

        Ok(())
    }

    /// Whether the non-white block policy is active
    pub fn blocks_colored(&self) -> bool {
        self.block_types.contains(&BlockToken::Keyword(BlockKeyword::Color))
    }

    /// Whether `comment` is removed by the block list
    pub fn is_blocked(&self, comment: &Comment) -> bool {
        self.block_types.contains(&BlockToken::Type(comment.type_code))
            || (self.blocks_colored() && !comment.is_white())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            title: String::new(),
            font: default_font(),
            alpha: default_alpha(),
            duration: DisplayDuration::default(),
            block_types: Vec::new(),
            resolution: Resolution::default(),
            bottom_margin_percent: default_bottom_margin_percent(),
            bold: false,
            strict: false,
            log_level: LogLevel::default(),
        }
    }
}
