use super::result::StageName;

/// Lifecycle of one pipeline execution.
///
/// ```text
/// Received -> Transcribing -> Responding -> Synthesizing -> Done
///                  \               \              \
///                   +---------------+--------------+--> Failed(stage)
/// ```
///
/// `Rejected` is reached only from `Received`, when Ingress refuses the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Received,
    Transcribing,
    Responding,
    Synthesizing,
    Done,
    Failed(StageName),
    Rejected,
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineState::Done | PipelineState::Failed(_) | PipelineState::Rejected
        )
    }

    /// Stage currently executing, if any
    pub fn stage(&self) -> Option<StageName> {
        match self {
            PipelineState::Transcribing => Some(StageName::Transcribe),
            PipelineState::Responding => Some(StageName::Respond),
            PipelineState::Synthesizing => Some(StageName::Synthesize),
            _ => None,
        }
    }

    /// State after the current step succeeds
    pub fn advance(self) -> Option<PipelineState> {
        match self {
            PipelineState::Received => Some(PipelineState::Transcribing),
            PipelineState::Transcribing => Some(PipelineState::Responding),
            PipelineState::Responding => Some(PipelineState::Synthesizing),
            PipelineState::Synthesizing => Some(PipelineState::Done),
            _ => None,
        }
    }

    /// State after the current step fails
    pub fn fail(self) -> Option<PipelineState> {
        match self {
            PipelineState::Received => Some(PipelineState::Rejected),
            in_flight => in_flight.stage().map(PipelineState::Failed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_reaches_done() {
        let mut state = PipelineState::Received;
        let mut visited = vec![state];
        while let Some(next) = state.advance() {
            state = next;
            visited.push(state);
        }
        assert_eq!(
            visited,
            vec![
                PipelineState::Received,
                PipelineState::Transcribing,
                PipelineState::Responding,
                PipelineState::Synthesizing,
                PipelineState::Done,
            ]
        );
        assert!(state.is_terminal());
    }

    #[test]
    fn failure_is_absorbing() {
        let failed = PipelineState::Responding.fail().unwrap();
        assert_eq!(failed, PipelineState::Failed(StageName::Respond));
        assert!(failed.is_terminal());
        assert_eq!(failed.advance(), None);
        assert_eq!(failed.fail(), None);
        assert_eq!(PipelineState::Done.fail(), None);
    }

    #[test]
    fn ingress_refusal_is_rejected() {
        assert_eq!(PipelineState::Received.fail(), Some(PipelineState::Rejected));
        assert!(!PipelineState::Received.is_terminal());
    }
}
