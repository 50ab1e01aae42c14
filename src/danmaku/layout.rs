/*!
 * Lane allocation for danmaku.
 *
 * The screen is split into horizontal lanes of fixed height. Scrolling
 * comments and fixed (top/bottom) comments each have their own pool of
 * lanes. Comments are placed greedily, first fit, in the order they are
 * submitted; a placement is never revisited. Callers must submit comments
 * in non-decreasing start time order, since a placement only consults the
 * occupancies recorded before it.
 *
 * When no lane is free the comment is placed off-screen and nothing is
 * recorded for it.
 */

use log::{debug, trace};

use super::metrics::TextMetrics;
use super::model::{Comment, CommentKind, FontSizeClass, Placement};
use crate::app_config::{DisplayDuration, Resolution};

/// Height of a rendered glyph line in pixels
pub const GLYPH_HEIGHT: f64 = 52.0;

/// Gap above and below each glyph line
pub const LANE_MARGIN: f64 = 4.0;

/// Full height of one lane
pub const LANE_HEIGHT: f64 = LANE_MARGIN * 2.0 + GLYPH_HEIGHT;

/// Extra seconds a lane's entry side stays busy after a comment has fully entered
pub const NEXT_DANMAKU_DELAY: f64 = 0.05;

/// Seconds a comment stays on screen
pub trait DurationProvider {
    fn seconds_for(&self, comment: &Comment) -> f64;
}

impl DurationProvider for DisplayDuration {
    fn seconds_for(&self, comment: &Comment) -> f64 {
        if comment.kind().is_vertical() {
            self.fixed_secs
        } else {
            self.scroll_secs
        }
    }
}

impl<F> DurationProvider for F
where
    F: Fn(&Comment) -> f64,
{
    fn seconds_for(&self, comment: &Comment) -> f64 {
        self(comment)
    }
}

// @struct: Lane usage of a scrolling comment
#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalOccupancy {
    pub lane: usize,
    pub width: f64,
    pub start_time: f64,
    // @field: Until this time the comment still covers the entry edge
    pub visible_until: f64,
    pub end_time: f64,
}

// @struct: Lane usage of a fixed comment
#[derive(Debug, Clone, PartialEq)]
pub struct VerticalOccupancy {
    pub lane: usize,
    pub start_time: f64,
    pub end_time: f64,
}

/// Number of lanes that fit above the reserved bottom margin
pub fn track_count(resolution: Resolution, bottom_margin_percent: f64) -> usize {
    let usable = f64::from(resolution.height) * (1.0 - bottom_margin_percent);
    let count = (usable / LANE_HEIGHT).floor();
    if count > 0.0 { count as usize } else { 0 }
}

/// Assigns lanes and placement directives to comments of one document
pub struct LaneAllocator<'a> {
    resolution: Resolution,
    track_count: usize,
    metrics: &'a dyn TextMetrics,
    duration: &'a dyn DurationProvider,
    // Indexed by lane, append only
    horizontal: Vec<Vec<HorizontalOccupancy>>,
    vertical: Vec<Vec<VerticalOccupancy>>,
}

impl<'a> LaneAllocator<'a> {
    pub fn new(
        resolution: Resolution,
        bottom_margin_percent: f64,
        metrics: &'a dyn TextMetrics,
        duration: &'a dyn DurationProvider,
    ) -> Self {
        let track_count = track_count(resolution, bottom_margin_percent);
        debug!(
            "Lane allocator for {}x{}: {} lanes of {}px",
            resolution.width, resolution.height, track_count, LANE_HEIGHT
        );
        Self {
            resolution,
            track_count,
            metrics,
            duration,
            horizontal: vec![Vec::new(); track_count],
            vertical: vec![Vec::new(); track_count],
        }
    }

    pub fn track_count(&self) -> usize {
        self.track_count
    }

    pub fn lane_height(&self) -> f64 {
        LANE_HEIGHT
    }

    /// All recorded scrolling occupancies, lane by lane
    pub fn horizontal_occupancies(&self) -> impl Iterator<Item = &HorizontalOccupancy> {
        self.horizontal.iter().flatten()
    }

    /// All recorded fixed occupancies, lane by lane
    pub fn vertical_occupancies(&self) -> impl Iterator<Item = &VerticalOccupancy> {
        self.vertical.iter().flatten()
    }

    /// Place one comment. Comments must arrive in start time order.
    pub fn place(&mut self, comment: &Comment) -> Placement {
        let kind = comment.kind();
        let placement = match kind {
            CommentKind::Normal | CommentKind::Reversed => self.place_horizontal(comment),
            CommentKind::Top | CommentKind::Bottom => self.place_vertical(comment, kind),
            CommentKind::Special => {
                trace!("Unsupported comment type {} at {}s", comment.type_code, comment.start_time);
                Placement::OffScreen
            }
        };

        if !placement.is_visible() && kind != CommentKind::Special {
            debug!(
                "No free {:?} lane at {}s, dropping \"{}\"",
                kind, comment.start_time, comment.content
            );
        }
        placement
    }

    fn half_width(&self, comment: &Comment) -> f64 {
        let size = comment.size_class().unwrap_or(FontSizeClass::Large);
        let (width, _) = self.metrics.measure(&comment.content, size);
        width / 2.0
    }

    /// Vertical center of a lane counted from the top edge
    fn lane_y(&self, lane: usize) -> f64 {
        lane as f64 * LANE_HEIGHT + LANE_MARGIN + GLYPH_HEIGHT / 2.0
    }

    fn place_horizontal(&mut self, comment: &Comment) -> Placement {
        let screen_width = f64::from(self.resolution.width);
        let half = self.half_width(comment);
        let width = half * 2.0;
        let duration = self.duration.seconds_for(comment);
        let time = comment.start_time;
        let visible_offset = duration * width / (screen_width + width) + NEXT_DANMAKU_DELAY;
        // Time the new comment needs to reach the left edge
        let crossing = duration * screen_width / (screen_width + width);

        let blocks = |occupancy: &HorizontalOccupancy| {
            if occupancy.width < width {
                // A longer comment moves faster and must not catch the one ahead
                crossing <= occupancy.end_time - time
            } else {
                occupancy.visible_until > time
            }
        };

        let Some(lane) = (0..self.track_count).find(|&lane| !self.horizontal[lane].iter().any(blocks)) else {
            return Placement::OffScreen;
        };

        self.horizontal[lane].push(HorizontalOccupancy {
            lane,
            width,
            start_time: time,
            visible_until: time + visible_offset,
            end_time: time + duration,
        });

        let y = self.lane_y(lane);
        Placement::Move {
            from: (screen_width + half, y),
            to: (-half, y),
            duration_ms: duration * 1000.0,
        }
    }

    fn place_vertical(&mut self, comment: &Comment, kind: CommentKind) -> Placement {
        let time = comment.start_time;
        let is_free = |lane: &usize| !self.vertical[*lane].iter().any(|o| o.end_time > time);

        let lane = if kind == CommentKind::Top {
            (0..self.track_count).find(is_free)
        } else {
            (0..self.track_count).rev().find(is_free)
        };
        let Some(lane) = lane else {
            return Placement::OffScreen;
        };

        let duration = self.duration.seconds_for(comment);
        self.vertical[lane].push(VerticalOccupancy {
            lane,
            start_time: time,
            end_time: time + duration,
        });

        let x = f64::from(self.resolution.width) / 2.0;
        let y = if kind == CommentKind::Top {
            self.lane_y(lane)
        } else {
            f64::from(self.resolution.height)
                - LANE_MARGIN
                - GLYPH_HEIGHT / 2.0
                - (self.track_count - 1 - lane) as f64 * LANE_HEIGHT
        };
        Placement::Position { x, y }
    }
}
