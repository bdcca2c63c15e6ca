//! Conversion Job
//!
//! One request/response/write cycle turning a message's text into one audio
//! file. The job only tracks progress; it never owns the file on disk.

use std::path::{Path, PathBuf};

/// Lifecycle of a single conversion.
///
/// ```text
/// Created -> Requesting -> Writing -> Complete
///                 |           |
///                 +-> Failed <+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Created,
    Requesting,
    Writing,
    Complete,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    pub fn can_transition_to(self, next: JobState) -> bool {
        matches!(
            (self, next),
            (Self::Created, Self::Requesting)
                | (Self::Requesting, Self::Writing)
                | (Self::Requesting, Self::Failed)
                | (Self::Writing, Self::Complete)
                | (Self::Writing, Self::Failed)
        )
    }
}

#[derive(Debug)]
pub struct ConversionJob {
    source_text: String,
    destination: PathBuf,
    state: JobState,
}

impl ConversionJob {
    pub fn new(source_text: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source_text: source_text.into(),
            destination: destination.into(),
            state: JobState::Created,
        }
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Move the job forward. Illegal transitions are refused and logged;
    /// the state is left unchanged.
    pub fn advance(&mut self, next: JobState) -> bool {
        if !self.state.can_transition_to(next) {
            tracing::warn!(
                "TTS job {}: refused transition {:?} -> {:?}",
                self.destination.display(),
                self.state,
                next
            );
            return false;
        }
        tracing::trace!(
            "TTS job {}: {:?} -> {:?}",
            self.destination.display(),
            self.state,
            next
        );
        self.state = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_new_job_starts_created() {
        let job = ConversionJob::new("Hello world", "/tmp/speech_1_2_0.wav");
        assert_eq!(job.state(), JobState::Created);
        assert_eq!(job.source_text(), "Hello world");
        assert_eq!(job.destination(), Path::new("/tmp/speech_1_2_0.wav"));
    }

    #[test]
    fn test_happy_path() {
        let mut job = ConversionJob::new("hi", "out.wav");
        assert!(job.advance(JobState::Requesting));
        assert!(job.advance(JobState::Writing));
        assert!(job.advance(JobState::Complete));
        assert!(job.state().is_terminal());
    }

    #[test]
    fn test_request_failure_path() {
        let mut job = ConversionJob::new("hi", "out.wav");
        job.advance(JobState::Requesting);
        assert!(job.advance(JobState::Failed));
        assert_eq!(job.state(), JobState::Failed);
    }

    #[rstest]
    #[case(JobState::Created, JobState::Writing)]
    #[case(JobState::Created, JobState::Complete)]
    #[case(JobState::Requesting, JobState::Complete)]
    #[case(JobState::Writing, JobState::Requesting)]
    #[case(JobState::Complete, JobState::Failed)]
    #[case(JobState::Failed, JobState::Requesting)]
    #[case(JobState::Complete, JobState::Writing)]
    fn test_illegal_transitions(#[case] from: JobState, #[case] to: JobState) {
        assert!(!from.can_transition_to(to));
    }

    #[test]
    fn test_terminal_state_is_sticky() {
        let mut job = ConversionJob::new("hi", "out.wav");
        job.advance(JobState::Requesting);
        job.advance(JobState::Failed);
        assert!(!job.advance(JobState::Writing));
        assert_eq!(job.state(), JobState::Failed);
    }
}
