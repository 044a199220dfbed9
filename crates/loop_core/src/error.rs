use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("loop has been dropped; event discarded")]
    Closed,
    #[error("{} effect handler failure(s): {}", .0.len(), summarize(.0))]
    Effects(Vec<EffectFailure>),
}

impl DispatchError {
    /// Handler failures carried by this error; empty for [`DispatchError::Closed`].
    pub fn failures(&self) -> &[EffectFailure] {
        match self {
            DispatchError::Closed => &[],
            DispatchError::Effects(failures) => failures,
        }
    }
}

/// One effect handler that returned an error while an effect was delivered.
#[derive(Debug)]
pub struct EffectFailure {
    /// Position of the effect within the transition's effect list.
    pub effect_index: usize,
    /// Registration position of the failing handler.
    pub handler_index: usize,
    pub error: anyhow::Error,
}

impl fmt::Display for EffectFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "effect #{} handler #{}: {:#}",
            self.effect_index, self.handler_index, self.error
        )
    }
}

fn summarize(failures: &[EffectFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombineError {
    #[error("duplicate key in updater mapping: {0}")]
    DuplicateKey(String),
}
