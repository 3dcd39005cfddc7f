//! Path change notifications
//!
//! Every structural edit of a [`Path`](crate::path::Path) produces one
//! [`PathEvent`]. The path first lets its own closing moves react, then calls
//! the external listeners registered with [`Path::subscribe`](crate::path::Path::subscribe).

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::segment::SegmentId;

/// Kind of structural edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathEventKind {
    /// Segment appended at the end
    SegmentAdded,
    /// Segment inserted before an existing one
    SegmentInserted,
    /// Segment taken out of the path
    SegmentRemoved,
    /// Segment replaced by another
    SegmentChanged,
    /// Bulk change; listeners must re-derive everything
    PathChanged,
    /// Path marked open
    PathOpened,
    /// Path marked closed
    PathClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathEvent {
    pub kind: PathEventKind,
    /// Index the edit happened at, if it concerns a single segment
    pub index: Option<usize>,
    pub old_segment: Option<SegmentId>,
    pub new_segment: Option<SegmentId>,
}

impl PathEvent {
    pub fn added(index: usize, segment: SegmentId) -> Self {
        Self {
            kind: PathEventKind::SegmentAdded,
            index: Some(index),
            old_segment: None,
            new_segment: Some(segment),
        }
    }

    pub fn inserted(index: usize, segment: SegmentId) -> Self {
        Self {
            kind: PathEventKind::SegmentInserted,
            index: Some(index),
            old_segment: None,
            new_segment: Some(segment),
        }
    }

    pub fn removed(index: usize, segment: SegmentId) -> Self {
        Self {
            kind: PathEventKind::SegmentRemoved,
            index: Some(index),
            old_segment: Some(segment),
            new_segment: None,
        }
    }

    pub fn changed(index: usize, old: SegmentId, new: SegmentId) -> Self {
        Self {
            kind: PathEventKind::SegmentChanged,
            index: Some(index),
            old_segment: Some(old),
            new_segment: Some(new),
        }
    }

    pub fn whole_path(kind: PathEventKind) -> Self {
        Self {
            kind,
            index: None,
            old_segment: None,
            new_segment: None,
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({})", &self.0.to_string()[..8])
    }
}

/// External listener callback
pub type PathListener = Arc<dyn Fn(&PathEvent) + Send + Sync>;
