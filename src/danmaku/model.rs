/*!
 * Comment records for both sides of a conversion.
 *
 * A `Comment` carries the fields shared by every representation. The XML
 * side wraps it in a `SourceComment` with the sender metadata, the ASS side
 * wraps it in a `PlacedComment` with the computed end time and placement.
 */

use std::fmt;

use crate::errors::RecordError;

/// Pure white, the default danmaku color
pub const WHITE: u32 = 0xFF_FF_FF;

// @struct: Fields common to source and placed comments
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    // @field: Comment body
    pub content: String,

    // @field: Appearance time in seconds
    pub start_time: f64,

    // @field: Raw type code (1-8)
    pub type_code: u8,

    // @field: Raw font size class code (25 or 18)
    pub font_size: u32,

    // @field: 24-bit RGB color
    pub color: u32,
}

impl Comment {
    pub fn new(content: impl Into<String>, start_time: f64, type_code: u8, font_size: u32, color: u32) -> Self {
        Self {
            content: content.into(),
            start_time,
            type_code,
            font_size,
            color,
        }
    }

    /// Behavior category derived from the type code
    pub fn kind(&self) -> CommentKind {
        CommentKind::from_type_code(self.type_code)
    }

    /// Size class, if the font size code is one we have a style for
    pub fn size_class(&self) -> Option<FontSizeClass> {
        FontSizeClass::from_code(self.font_size)
    }

    pub fn is_white(&self) -> bool {
        self.color == WHITE
    }
}

/// Layout behavior of a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// Scrolls right to left
    Normal,
    /// Scrolls left to right; laid out like `Normal`
    Reversed,
    /// Fixed, anchored to the bottom edge
    Bottom,
    /// Fixed, anchored to the top edge
    Top,
    /// Positioned/scripted comment, never shown
    Special,
}

impl CommentKind {
    pub fn from_type_code(code: u8) -> Self {
        match code {
            1..=3 => Self::Normal,
            4 => Self::Bottom,
            5 => Self::Top,
            6 => Self::Reversed,
            _ => Self::Special,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Normal | Self::Reversed)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// Symbolic font size category used by the XML format
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FontSizeClass {
    Large,
    Small,
}

impl FontSizeClass {
    pub const ALL: [FontSizeClass; 2] = [FontSizeClass::Large, FontSizeClass::Small];

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            25 => Some(Self::Large),
            18 => Some(Self::Small),
            _ => None,
        }
    }

    /// Code used in the XML metadata field
    pub fn code(self) -> u32 {
        match self {
            Self::Large => 25,
            Self::Small => 18,
        }
    }

    /// Rendered font size in pixels
    pub fn pixel_size(self) -> u32 {
        match self {
            Self::Large => 52,
            Self::Small => 36,
        }
    }

    /// Name of the ASS style line for this class
    pub fn style_name(self) -> &'static str {
        match self {
            Self::Large => "Medium",
            Self::Small => "Small",
        }
    }
}

// @struct: Comment as read from the XML document
#[derive(Debug, Clone, PartialEq)]
pub struct SourceComment {
    pub comment: Comment,

    // @field: Send time (unix seconds)
    pub timestamp: i64,

    // @field: Comment pool
    pub pool: u32,

    // @field: Opaque sender hash
    pub user_hash: String,

    // @field: Row id of the comment
    pub row_id: u64,
}

impl SourceComment {
    /// Build a record from the `p` attribute and the (escaped) text payload
    pub fn from_metadata(metadata: &str, content: &str) -> Result<Self, RecordError> {
        let fields: Vec<&str> = metadata.split(',').collect();
        if fields.len() != 8 {
            return Err(RecordError::FieldCount { found: fields.len() });
        }

        let start_time: f64 = parse_field("start time", fields[0])?;
        if !start_time.is_finite() {
            return Err(RecordError::InvalidField {
                field: "start time",
                value: fields[0].to_string(),
            });
        }

        Ok(Self {
            comment: Comment {
                content: content.to_string(),
                start_time,
                type_code: parse_field("type", fields[1])?,
                font_size: parse_field("font size", fields[2])?,
                color: parse_field("color", fields[3])?,
            },
            timestamp: parse_field("timestamp", fields[4])?,
            pool: parse_field("pool", fields[5])?,
            user_hash: fields[6].to_string(),
            row_id: parse_field("row id", fields[7])?,
        })
    }

    /// Encode the metadata fields back into a `p` attribute value
    pub fn to_metadata(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{}",
            self.comment.start_time,
            self.comment.type_code,
            self.comment.font_size,
            self.comment.color,
            self.timestamp,
            self.pool,
            self.user_hash,
            self.row_id
        )
    }

    /// Serialize as a `<d>` element; the content is expected to be escaped already
    pub fn to_xml_element(&self) -> String {
        format!("<d p=\"{}\">{}</d>", self.to_metadata(), self.comment.content)
    }
}

fn parse_field<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, RecordError> {
    value.parse::<T>().map_err(|_| RecordError::InvalidField {
        field,
        value: value.to_string(),
    })
}

/// Where a placed comment is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Linear motion over `duration_ms`
    Move {
        from: (f64, f64),
        to: (f64, f64),
        duration_ms: f64,
    },
    /// Static position (anchor is the style's center alignment)
    Position { x: f64, y: f64 },
    /// Outside the visible frame
    OffScreen,
}

impl Placement {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::OffScreen)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Move { from, to, duration_ms } => write!(
                f,
                "\\move({},{},{},{},0,{})",
                Num(from.0),
                Num(from.1),
                Num(to.0),
                Num(to.1),
                Num(*duration_ms)
            ),
            Self::Position { x, y } => write!(f, "\\pos({},{})", Num(*x), Num(*y)),
            Self::OffScreen => write!(f, "\\pos(0,-999)"),
        }
    }
}

/// Shortest decimal form of a coordinate, without a sign on zero
struct Num(f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0 == 0.0 {
            write!(f, "0")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// @struct: Comment ready to be written as a dialogue line
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedComment {
    pub comment: Comment,

    // @field: Disappearance time in seconds
    pub end_time: f64,

    // @field: Layout engine decision
    pub placement: Placement,
}

impl PlacedComment {
    pub fn new(comment: Comment, end_time: f64, placement: Placement) -> Self {
        Self {
            comment,
            end_time,
            placement,
        }
    }

    /// Placement override tag (`\move(...)` or `\pos(...)`)
    pub fn type_tag(&self) -> String {
        self.placement.to_string()
    }

    /// Primary color override tag, empty for white
    pub fn color_tag(&self) -> String {
        super::ass::color_tag(self.comment.color)
    }
}
