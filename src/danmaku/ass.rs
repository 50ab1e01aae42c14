/*!
 * ASS (Advanced SubStation Alpha) output.
 *
 * Converts placed comments into dialogue lines and assembles the script
 * header with one style per font size class.
 */

use std::path::Path;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use super::model::{FontSizeClass, PlacedComment, WHITE};
use crate::app_config::Resolution;
use crate::errors::RenderError;
use crate::file_utils::FileManager;

// @const: The five predefined markup entities
static ENTITY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(amp|lt|gt|quot|apos);").unwrap()
});

const STYLE_FORMAT: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";

const EVENT_FORMAT: &str = "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

/// Format seconds as an ASS timestamp (`H:MM:SS.cc`)
///
/// The hundredths are truncated, never rounded.
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 { seconds } else { 0.0 };
    let remainder = seconds % 60.0;
    let total_minutes = ((seconds - remainder) / 60.0).round() as u64;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    let remainder = remainder.to_string();
    let (whole, fraction) = remainder.split_once('.').unwrap_or((remainder.as_str(), ""));
    let fraction: String = fraction.chars().take(2).collect();

    format!("{}:{:02}:{:0>2}.{:0<2}", hours, minutes, whole, fraction)
}

/// Primary color override, BGR ordered; empty for white
pub fn color_tag(color: u32) -> String {
    if color == WHITE {
        return String::new();
    }
    let red = (color >> 16) & 0xFF;
    let green = (color >> 8) & 0xFF;
    let blue = color & 0xFF;
    format!("\\c&H{:02x}{:02x}{:02x}&", blue, green, red)
}

/// Make comment text safe for a dialogue line
///
/// Braces delimit override blocks in ASS, so they are swapped for their
/// full-width forms. Markup entities are decoded in a single pass.
pub fn escape_text(text: &str) -> String {
    let text = text.replace('{', "｛").replace('}', "｝");
    // One pass: `&amp;lt;` decodes to `&lt;`, not `<`
    ENTITY_REGEX
        .replace_all(&text, |caps: &regex::Captures| match &caps[1] {
            "amp" => "&",
            "lt" => "<",
            "gt" => ">",
            "quot" => "\"",
            _ => "'",
        })
        .into_owned()
}

/// Style lines shared by every dialogue of a document
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    font: String,
    alpha: u32,
    bold: bool,
}

impl StyleSheet {
    /// `alpha` is a transparency between 0 and 1
    pub fn new(font: impl Into<String>, alpha: f64, bold: bool) -> Self {
        Self {
            font: font.into(),
            alpha: (alpha * 100.0).round().max(0.0) as u32,
            bold,
        }
    }

    pub fn style_line(&self, class: FontSizeClass) -> String {
        let a = format!("{:02}", self.alpha);
        format!(
            "Style: {},{},{},&H{a}FFFFFF,&H{a}FFFFFF,&H{a}000000,&H{a}000000,{},0,0,0,100,100,0,0,1,1.2,0,5,0,0,0,0",
            class.style_name(),
            self.font,
            class.pixel_size(),
            if self.bold { "1" } else { "0" },
        )
    }

    pub fn lines(&self) -> Vec<String> {
        FontSizeClass::ALL.iter().map(|class| self.style_line(*class)).collect()
    }

    /// Style name for a raw font size code
    pub fn style_name(&self, font_size: u32) -> Result<&'static str, RenderError> {
        FontSizeClass::from_code(font_size)
            .map(FontSizeClass::style_name)
            .ok_or(RenderError::UnknownStyleClass(font_size))
    }
}

/// Render one placed comment as a `Dialogue:` line
pub fn dialogue_line(placed: &PlacedComment, styles: &StyleSheet) -> Result<String, RenderError> {
    let style = styles.style_name(placed.comment.font_size)?;
    Ok(format!(
        "Dialogue: 0,{},{},{},,0,0,0,,{{{}{}}}{}",
        format_time(placed.comment.start_time),
        format_time(placed.end_time),
        style,
        placed.type_tag(),
        placed.color_tag(),
        placed.comment.content
    ))
}

/// A complete ASS script
#[derive(Debug, Clone)]
pub struct AssDocument {
    pub comments: Vec<PlacedComment>,
    pub title: String,
    pub resolution: Resolution,
    pub styles: StyleSheet,
}

impl AssDocument {
    pub fn new(comments: Vec<PlacedComment>, title: impl Into<String>, resolution: Resolution, styles: StyleSheet) -> Self {
        Self {
            comments,
            title: title.into(),
            resolution,
            styles,
        }
    }

    /// Script info, styles and events sections up to the events format line
    pub fn header(&self) -> String {
        let mut header = vec![
            "[Script Info]".to_string(),
            "; Script generated by danmaku-converter".to_string(),
            format!("Title: {}", self.title),
            "ScriptType: v4.00+".to_string(),
            format!("PlayResX: {}", self.resolution.width),
            format!("PlayResY: {}", self.resolution.height),
            "Timer: 10.0000".to_string(),
            "WrapStyle: 2".to_string(),
            "ScaledBorderAndShadow: no".to_string(),
            String::new(),
            "[V4+ Styles]".to_string(),
            STYLE_FORMAT.to_string(),
        ];
        header.extend(self.styles.lines());
        header.push(String::new());
        header.push("[Events]".to_string());
        header.push(EVENT_FORMAT.to_string());
        header.join("\n")
    }

    pub fn render(&self) -> Result<String, RenderError> {
        let mut script = self.header();
        script.push('\n');
        for placed in &self.comments {
            script.push_str(&dialogue_line(placed, &self.styles)?);
            script.push('\n');
        }
        Ok(script)
    }

    /// Render and write the script to `path`
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let script = self.render()?;
        FileManager::write_to_file(path, &script)
    }
}
