/// Reasons a session operation is refused by the store.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("a work session needs a description")]
    EmptyDescription,

    #[error("session can't end before it starts")]
    EndBeforeStart,
}
