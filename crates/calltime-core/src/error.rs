/// Failures surfaced to the user. Each one is recovered at the UI boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecapError {
    /// Data load failed or returned nothing.
    #[error("failed to fetch recap data: {0}")]
    Fetch(String),
    /// Gift send attempted with zero selections.
    #[error("no collaborators selected")]
    Validation,
    /// Backend rejected the gift send.
    #[error("failed to send gifts: {0}")]
    Send(String),
    /// Screenshot generation or export failed.
    #[error("failed to capture slide: {0}")]
    Capture(String),
}

impl RecapError {
    /// Short headline for a toast.
    pub fn headline(&self) -> &'static str {
        match self {
            RecapError::Fetch(_) => "Oops! Something Went Wrong",
            RecapError::Validation => "No collaborators selected",
            RecapError::Send(_) => "Failed to send gifts",
            RecapError::Capture(_) => "Failed to download slide",
        }
    }

    /// Longer explanation shown under the headline.
    pub fn detail(&self) -> String {
        match self {
            RecapError::Fetch(_) => "We couldn't load your wrapped data. Please try again.".into(),
            RecapError::Validation => {
                "Please select at least one collaborator to send a gift to.".into()
            }
            RecapError::Send(_) => "Something went wrong. Please try again.".into(),
            RecapError::Capture(reason) => reason.clone(),
        }
    }
}
