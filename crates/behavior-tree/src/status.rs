//! Status returned by behavior nodes.

/// The result of evaluating a behavior node.
///
/// # Frame Semantics
///
/// Every node resolves within a single tick:
/// - Conditions evaluate immediately (e.g., "Is a horde check due?")
/// - Actions execute atomically (e.g., "Join the nearest horde")
/// - Actions that hand work to the host (e.g., a navigation request) report
///   `InProgress` for the frame in which the work is still outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The behavior completed successfully.
    ///
    /// For conditions: The condition was met.
    /// For actions: The action executed without errors.
    Success,

    /// The behavior failed.
    ///
    /// For conditions: The condition was not met.
    /// For actions: The action could not be executed (e.g., horde is full).
    Failure,

    /// The behavior issued a request that the host has not finished yet.
    ///
    /// This is a single-frame marker: nothing is resumed on the next tick, the
    /// tree is simply evaluated again from the root.
    InProgress,
}

impl Status {
    /// Returns `true` if this status is `Success`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    /// Returns `true` if this status is `Failure`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// Returns `true` if this status is `InProgress`.
    #[inline]
    pub fn is_in_progress(self) -> bool {
        matches!(self, Status::InProgress)
    }

    /// Inverts the status: Success becomes Failure and vice versa.
    ///
    /// `InProgress` is left untouched since the outcome is not known yet.
    #[inline]
    pub fn invert(self) -> Self {
        match self {
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
            Status::InProgress => Status::InProgress,
        }
    }

    /// Converts a boolean condition result into a status.
    #[inline]
    pub fn from_bool(value: bool) -> Self {
        if value {
            Status::Success
        } else {
            Status::Failure
        }
    }
}
