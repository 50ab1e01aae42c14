/*!
 * Danmaku conversion core.
 *
 * - `model`: comment records and placement directives
 * - `xml`: ingestion of the `<d p="...">` XML format
 * - `metrics`: text measurement seam used by the layout engine
 * - `layout`: lane allocation and collision avoidance
 * - `ass`: ASS script rendering
 */

pub mod ass;
pub mod layout;
pub mod metrics;
pub mod model;
pub mod xml;

pub use ass::{AssDocument, StyleSheet};
pub use layout::{DurationProvider, LaneAllocator};
pub use metrics::{EstimatedMetrics, TextMetrics};
pub use model::{Comment, CommentKind, FontSizeClass, PlacedComment, Placement, SourceComment};
