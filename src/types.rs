use std::fmt;
use std::path::{Path, PathBuf};

use notify::EventKind;
use notify::event::{MetadataKind, ModifyKind};

/// Kind of filesystem change that can trigger a run.
///
/// Removals, access events and pure permission/ownership changes are not
/// represented; the watch source drops them before filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOp {
    Create,
    Write,
    Rename,
}

impl WatchOp {
    /// Map a `notify` event kind onto the operations we react to.
    pub fn from_kind(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(WatchOp::Create),
            EventKind::Modify(ModifyKind::Name(_)) => Some(WatchOp::Rename),
            EventKind::Modify(ModifyKind::Data(_))
            | EventKind::Modify(ModifyKind::Any)
            | EventKind::Modify(ModifyKind::Other) => Some(WatchOp::Write),
            EventKind::Modify(ModifyKind::Metadata(
                MetadataKind::WriteTime | MetadataKind::Any,
            )) => Some(WatchOp::Write),
            _ => None,
        }
    }
}

impl fmt::Display for WatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WatchOp::Create => "create",
            WatchOp::Write => "write",
            WatchOp::Rename => "rename",
        };
        f.write_str(s)
    }
}

/// A single filtered change notification flowing into the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    path: Option<PathBuf>,
    op: WatchOp,
}

impl WatchEvent {
    pub fn new(path: impl Into<PathBuf>, op: WatchOp) -> Self {
        Self {
            path: Some(path.into()),
            op,
        }
    }

    /// Synthetic trigger re-emitted when events arrived during a run.
    pub fn rerun() -> Self {
        Self {
            path: None,
            op: WatchOp::Write,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn op(&self) -> WatchOp {
        self.op
    }

    pub fn is_rerun(&self) -> bool {
        self.path.is_none()
    }
}
