//! The observable state exposed by a fetch controller.

use crate::errors::FetchError;

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;

/// A snapshot of the state owned by a [`FetchController`](crate::FetchController).
///
/// `data` and `error` are not mutually exclusive: a failed attempt after a
/// successful one keeps the previous payload while recording the failure.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    /// Payload of the most recent successful, non-discarded attempt.
    pub data: Option<T>,

    /// True while the latest attempt is outstanding.
    pub loading: bool,

    /// Failure of the most recent completed, non-discarded attempt.
    pub error: Option<FetchError>,

    /// Generation of the most recently started attempt. Zero until the first
    /// attempt starts.
    pub generation: u64,
}

impl<T> FetchState<T> {
    /// State of a freshly constructed controller.
    ///
    /// An automatic controller starts its first attempt on construction, so it
    /// is observed as loading straight away.
    pub fn initial(manual: bool) -> Self {
        Self {
            data: None,
            loading: !manual,
            error: None,
            generation: 0,
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.loading
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}
