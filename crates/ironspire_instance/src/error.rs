//! Typed failures for the instance manager and the account-level managers
//! (§4.10, §4.11). These never reach a client directly; they're returned to
//! the login/realm code that drives these managers.

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InstanceManagerError {
    #[error("an instance with this id already exists")]
    DuplicateInstanceId,
    #[error("no instance exists with this id")]
    UnknownInstance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccountManagerError {
    #[error("the manager is at capacity")]
    CapacityReached,
    #[error("an entry already exists for this account id")]
    DuplicateAccountId,
    #[error("an entry already exists for this account name")]
    DuplicateAccountName,
}
