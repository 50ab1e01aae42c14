use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::danmaku::ass::{escape_text, AssDocument, StyleSheet};
use crate::danmaku::layout::{DurationProvider, LaneAllocator};
use crate::danmaku::metrics::{EstimatedMetrics, TextMetrics};
use crate::danmaku::model::{PlacedComment, SourceComment};
use crate::danmaku::xml;
use crate::errors::{DanmakuError, RenderError};
use crate::file_utils::{FileManager, DANMAKU_EXTENSION};

// @module: Conversion pipeline from XML danmaku to ASS

/// Counters collected while converting one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    // @field: Comment elements found
    pub total: usize,
    // @field: Records rejected by the parser
    pub malformed: usize,
    // @field: Removed by the block list
    pub blocked: usize,
    // @field: Font size without a style
    pub unknown_style: usize,
    // @field: No free lane or unsupported type
    pub off_screen: usize,
    // @field: Given a visible placement
    pub placed: usize,
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} comments: {} placed, {} off-screen, {} blocked, {} malformed, {} unknown size",
            self.total, self.placed, self.off_screen, self.blocked, self.malformed, self.unknown_style
        )
    }
}

/// Outcome of a folder conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Drives ingestion, filtering, lane allocation and rendering
pub struct Converter {
    // @field: Converter configuration
    config: Config,
    // @field: Text measurement for the layout engine
    metrics: Box<dyn TextMetrics>,
    // @field: On-screen seconds per comment
    duration: Box<dyn DurationProvider>,
}

impl Converter {
    /// Create a converter that estimates text width from display columns
    pub fn new(config: Config) -> Self {
        Self::with_metrics(config, Box::new(EstimatedMetrics))
    }

    /// Create a converter with a custom text measurement
    pub fn with_metrics(config: Config, metrics: Box<dyn TextMetrics>) -> Self {
        let duration: Box<dyn DurationProvider> = Box::new(config.duration);
        Self { config, metrics, duration }
    }

    /// Replace the configured durations with a per-comment function
    pub fn with_duration(mut self, duration: Box<dyn DurationProvider>) -> Self {
        self.duration = duration;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Convert an XML document into an ASS document
    pub fn convert_xml(&self, input: &str) -> Result<(AssDocument, ConversionReport)> {
        let records = xml::parse_document(input)?;
        let total = records.len();

        let mut comments = Vec::with_capacity(total);
        let mut malformed = 0;
        for (index, record) in records.into_iter().enumerate() {
            match record {
                Ok(comment) => comments.push(comment),
                Err(e) if self.config.strict => {
                    return Err(DanmakuError::Record(e))
                        .with_context(|| format!("Comment element {} is malformed", index + 1));
                }
                Err(e) => {
                    warn!("Skipping comment element {}: {}", index + 1, e);
                    malformed += 1;
                }
            }
        }

        let (document, mut report) = self.convert_comments(comments)?;
        report.total = total;
        report.malformed = malformed;
        Ok((document, report))
    }

    /// Convert already ingested comments
    pub fn convert_comments(&self, mut comments: Vec<SourceComment>) -> Result<(AssDocument, ConversionReport)> {
        let mut report = ConversionReport {
            total: comments.len(),
            ..ConversionReport::default()
        };

        // Stable: equal start times keep document order
        comments.sort_by(|a, b| a.comment.start_time.total_cmp(&b.comment.start_time));

        let duration = self.duration.as_ref();
        let mut allocator = LaneAllocator::new(
            self.config.resolution,
            self.config.bottom_margin_percent,
            self.metrics.as_ref(),
            duration,
        );

        let mut placed_comments = Vec::with_capacity(comments.len());
        for source in comments {
            let comment = source.comment;

            if self.config.is_blocked(&comment) {
                debug!("Blocked type {} color {:06x}: {}", comment.type_code, comment.color, comment.content);
                report.blocked += 1;
                continue;
            }

            if comment.size_class().is_none() {
                let e = RenderError::UnknownStyleClass(comment.font_size);
                if self.config.strict {
                    return Err(DanmakuError::Render(e))
                        .with_context(|| format!("Comment at {}s cannot be styled", comment.start_time));
                }
                warn!("Skipping comment at {}s: {}", comment.start_time, e);
                report.unknown_style += 1;
                continue;
            }

            let placement = allocator.place(&comment);
            if placement.is_visible() {
                report.placed += 1;
            } else {
                report.off_screen += 1;
            }

            let end_time = comment.start_time + duration.seconds_for(&comment);
            let mut comment = comment;
            comment.content = escape_text(&comment.content);
            placed_comments.push(PlacedComment::new(comment, end_time, placement));
        }

        let styles = StyleSheet::new(self.config.font.clone(), self.config.alpha, self.config.bold);
        let document = AssDocument::new(
            placed_comments,
            self.config.title.clone(),
            self.config.resolution,
            styles,
        );
        Ok((document, report))
    }

    /// Convert one XML file into `<stem>.ass` inside `output_dir`
    ///
    /// Returns the output path, or `None` when an existing output was kept.
    pub fn convert_file(&self, input_file: &Path, output_dir: &Path, force_overwrite: bool) -> Result<Option<PathBuf>> {
        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_path = FileManager::generate_output_path(input_file, output_dir);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, output already exists (use -f to force overwrite)", output_path);
            return Ok(None);
        }

        let markup = FileManager::read_to_string(input_file)?;
        let (mut document, report) = self.convert_xml(&markup)
            .with_context(|| format!("Failed to convert {:?}", input_file))?;

        if document.title.is_empty() {
            document.title = FileManager::title_from_path(input_file);
        }

        FileManager::ensure_dir(output_dir)?;
        document.write_to_file(&output_path)?;

        info!("{:?}: {}", input_file.file_name().unwrap_or_default(), report);
        Ok(Some(output_path))
    }

    /// Convert every XML file below `input_dir`, writing next to each input
    pub fn convert_folder(&self, input_dir: &Path, force_overwrite: bool) -> Result<FolderSummary> {
        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_files(input_dir, DANMAKU_EXTENSION)?;
        if files.is_empty() {
            warn!("No danmaku files found in {:?}", input_dir);
            return Ok(FolderSummary::default());
        }

        info!("Converting {} danmaku files in {:?}", files.len(), input_dir);
        let progress = ProgressBar::new(files.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut summary = FolderSummary::default();
        for file in &files {
            progress.set_message(FileManager::title_from_path(file));
            let output_dir = file.parent().unwrap_or(input_dir);
            match self.convert_file(file, output_dir, force_overwrite) {
                Ok(Some(_)) => summary.converted += 1,
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    error!("Error converting {:?}: {:#}", file, e);
                    summary.failed += 1;
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        info!(
            "Finished: {} converted, {} skipped, {} failed",
            summary.converted, summary.skipped, summary.failed
        );
        Ok(summary)
    }
}
