use std::error::Error;

use crate::error::ErrorKind;
use crate::reply::TurnOutcome;
use crate::request::TurnRequest;

/// The error type for a failed exchange with the assistant service.
///
/// These are transport-level failures: the request never completed, or the
/// reply could not be understood. Failures that the service reports itself
/// are delivered as [`TurnOutcome::ServiceFailed`] instead.
pub trait AssistantServiceError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that carries a user turn to the assistant and brings back its
/// outcome.
///
/// Once created, the service should behave like a stateless object. All
/// conversational state travels in the request's history, so callers may
/// share one service across any number of conversations.
pub trait AssistantService: Send + Sync {
    /// The error type that may be returned by the service.
    type Error: AssistantServiceError;

    /// Sends one turn to the service.
    ///
    /// The returned future must not borrow from `self` or `req`.
    fn send_turn(
        &self,
        req: &TurnRequest,
    ) -> impl Future<Output = Result<TurnOutcome, Self::Error>> + Send + 'static;
}
