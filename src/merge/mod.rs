//! Merge engine: parsed interchange model in, target annotations out

pub mod appearance;
pub mod engine;
pub mod record;
pub mod replies;

pub use appearance::{Appearance, AppearanceCache, AppearanceCachePolicy, AppearanceId, AppearanceKind, PathOp};
pub use engine::{default_color, merge, MergeSession, MergeStatistics, MergeSummary};
pub use record::{AnnotationRecord, MarkupFields, NoteFields, RecordId, RecordKind, ReplyType};
pub use replies::{ReplyResolver, ReplyState, UnresolvedReply};
