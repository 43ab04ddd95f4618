//! Staged resize lifecycle
//!
//! A staged resize moves through
//! `AwaitingUpload -> Uploading -> Uploaded(key) -> Fetching -> Resizing -> Done`,
//! and any non-terminal stage may fail. `Done` and `Failed` are terminal; a
//! failed staged resize starts over with a new authorization.

use std::fmt;
use thiserror::Error;

/// Stage at which a staged resize failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailedStage {
    Authorization,
    Upload,
    Fetch,
    Resize,
}

impl fmt::Display for FailedStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailedStage::Authorization => "authorization",
            FailedStage::Upload => "upload",
            FailedStage::Fetch => "fetch",
            FailedStage::Resize => "resize",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StagedResize {
    #[default]
    AwaitingUpload,
    Uploading,
    Uploaded { key: String },
    Fetching { key: String },
    Resizing { key: String },
    Done { key: String },
    Failed { stage: FailedStage },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    BeginUpload,
    UploadSucceeded { key: String },
    BeginFetch,
    FetchSucceeded,
    ResizeSucceeded,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal staged resize transition {transition:?} from {from}")]
pub struct TransitionError {
    pub from: &'static str,
    pub transition: Transition,
}

impl StagedResize {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &'static str {
        match self {
            StagedResize::AwaitingUpload => "awaiting_upload",
            StagedResize::Uploading => "uploading",
            StagedResize::Uploaded { .. } => "uploaded",
            StagedResize::Fetching { .. } => "fetching",
            StagedResize::Resizing { .. } => "resizing",
            StagedResize::Done { .. } => "done",
            StagedResize::Failed { .. } => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StagedResize::Done { .. } | StagedResize::Failed { .. })
    }

    /// Object key once the upload has completed.
    pub fn key(&self) -> Option<&str> {
        match self {
            StagedResize::Uploaded { key }
            | StagedResize::Fetching { key }
            | StagedResize::Resizing { key }
            | StagedResize::Done { key } => Some(key),
            _ => None,
        }
    }

    /// The stage a failure in the current state is attributed to.
    fn failing_stage(&self) -> Option<FailedStage> {
        match self {
            StagedResize::AwaitingUpload => Some(FailedStage::Authorization),
            StagedResize::Uploading => Some(FailedStage::Upload),
            StagedResize::Uploaded { .. } | StagedResize::Fetching { .. } => {
                Some(FailedStage::Fetch)
            }
            StagedResize::Resizing { .. } => Some(FailedStage::Resize),
            StagedResize::Done { .. } | StagedResize::Failed { .. } => None,
        }
    }

    /// Apply `transition`, returning the next state or an error for illegal moves.
    pub fn apply(self, transition: Transition) -> Result<StagedResize, TransitionError> {
        let next = match (&self, &transition) {
            (StagedResize::AwaitingUpload, Transition::BeginUpload) => {
                Some(StagedResize::Uploading)
            }
            (StagedResize::Uploading, Transition::UploadSucceeded { key }) => {
                Some(StagedResize::Uploaded { key: key.clone() })
            }
            (StagedResize::Uploaded { key }, Transition::BeginFetch) => {
                Some(StagedResize::Fetching { key: key.clone() })
            }
            (StagedResize::Fetching { key }, Transition::FetchSucceeded) => {
                Some(StagedResize::Resizing { key: key.clone() })
            }
            (StagedResize::Resizing { key }, Transition::ResizeSucceeded) => {
                Some(StagedResize::Done { key: key.clone() })
            }
            (state, Transition::Fail) => state
                .failing_stage()
                .map(|stage| StagedResize::Failed { stage }),
            _ => None,
        };

        next.ok_or(TransitionError {
            from: self.name(),
            transition,
        })
    }
}
