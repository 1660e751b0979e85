//! Error types for the state machine.

/// Label misuse. Labels are rendered with their `Debug` form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// A state with this label is already registered. The registered
    /// state is left untouched.
    #[error("state {0} is already registered")]
    DuplicateState(String),

    /// The label does not name a registered state.
    #[error("state {0} is not registered")]
    UnknownState(String),
}
