use ember_types::Principal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthorizerError {
    #[error("{0} is not an authorized signer")]
    UnauthorizedSigner(Principal),

    #[error("{0} has already approved this subject")]
    DuplicateApproval(Principal),

    #[error("subject is already authorized for execution")]
    AlreadyAuthorized,

    #[error("{0}")]
    Other(String),
}

impl AuthorizerError {
    /// Stable numeric failure code reported at the call boundary.
    pub fn code(&self) -> u32 {
        match self {
            Self::Other(_) => 1_000,
            Self::UnauthorizedSigner(_) => 1_001,
            Self::DuplicateApproval(_) => 1_002,
            Self::AlreadyAuthorized => 1_003,
        }
    }
}
