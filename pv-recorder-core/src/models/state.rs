/// Recorder state machine.
///
/// State transitions:
/// ```text
/// idle → recording ↔ stopped
/// ```
/// `delete` is valid from any state and consumes the recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording { frames_read: u64 },
    Stopped { frames_read: u64 },
}

impl RecorderState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording { .. })
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped { .. })
    }

    /// Frames read since the last `start`, if the recorder has ever started.
    pub fn frames_read(&self) -> Option<u64> {
        match self {
            Self::Recording { frames_read } | Self::Stopped { frames_read } => Some(*frames_read),
            Self::Idle => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording { .. } => "recording",
            Self::Stopped { .. } => "stopped",
        }
    }
}
