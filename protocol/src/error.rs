use ember_exec::AuthorizerError;
use ember_redemption::RedemptionError;
use ember_vote::VoteError;
use thiserror::Error;

/// Any failure of an applied operation, tagged by component.
#[derive(Debug, Error)]
pub enum OpError {
    #[error(transparent)]
    Vote(#[from] VoteError),

    #[error(transparent)]
    Authorizer(#[from] AuthorizerError),

    #[error(transparent)]
    Redemption(#[from] RedemptionError),
}

impl OpError {
    /// Stable numeric failure code reported at the call boundary.
    pub fn code(&self) -> u32 {
        match self {
            Self::Vote(e) => e.code(),
            Self::Authorizer(e) => e.code(),
            Self::Redemption(e) => e.code(),
        }
    }
}
