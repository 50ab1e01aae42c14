/*!
 * # danmaku-converter
 *
 * A Rust library for converting XML danmaku (timed overlay comments) into
 * ASS subtitle scripts.
 *
 * ## Features
 *
 * - Parse the `<d p="...">` XML comment format
 * - Lay out scrolling, top and bottom comments on lanes without overlap
 * - Drop comments gracefully when the screen is full
 * - Block comment types or all colored comments
 * - Configurable font, transparency, boldness, resolution and durations
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `danmaku`: The conversion core:
 *   - `danmaku::model`: Comment records and placements
 *   - `danmaku::xml`: XML ingestion
 *   - `danmaku::metrics`: Text measurement
 *   - `danmaku::layout`: Lane allocation
 *   - `danmaku::ass`: ASS rendering
 * - `converter`: Pipeline driving a conversion
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod converter;
pub mod danmaku;
pub mod errors;
pub mod file_utils;

// Re-export main types for easier usage
pub use app_config::Config;
pub use converter::{ConversionReport, Converter};
pub use danmaku::{AssDocument, Comment, LaneAllocator, Placement, SourceComment};
pub use errors::{AppError, DanmakuError, RecordError, RenderError};
