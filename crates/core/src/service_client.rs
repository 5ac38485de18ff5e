use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;

use futures_util::FutureExt;
use toolchat_proto::{
    AssistantService, AssistantServiceError, TurnOutcome, TurnRequest,
};
use tracing::Instrument;

type SendTurnResult = Result<TurnOutcome, Box<dyn AssistantServiceError>>;
type BoxedSendTurnFuture = Pin<Box<dyn Future<Output = SendTurnResult> + Send>>;
type HandlerFn = Arc<dyn Fn(TurnRequest) -> BoxedSendTurnFuture + Send + Sync>;

/// A wrapper around an assistant service that provides a type-erased
/// interface for the other modules.
#[derive(Clone)]
pub struct ServiceClient {
    handler_fn: HandlerFn,
}

impl ServiceClient {
    #[inline]
    pub fn new<S: AssistantService + 'static>(service: S) -> Self {
        // Erase `S` so that the controller doesn't need a generic parameter.
        let handler_fn: HandlerFn =
            Arc::new(move |req: TurnRequest| -> BoxedSendTurnFuture {
                let fut = service.send_turn(&req);
                Box::pin(
                    async move {
                        trace!("sending a turn: {:?}", req.message);
                        fut.await.map_err(|err| {
                            error!("got an error ({}): {err:?}", err.kind());
                            Box::new(err) as Box<dyn AssistantServiceError>
                        })
                    }
                    .instrument(trace_span!("service client req")),
                )
            });
        Self { handler_fn }
    }

    /// Sends a turn and returns its outcome.
    ///
    /// Transport failures, and panics raised while the service handles the
    /// turn, are both flattened into a description string.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe as long as the underlying service is.
    pub async fn send_turn(
        &self,
        req: TurnRequest,
    ) -> Result<TurnOutcome, String> {
        // The service may panic while building its future, too.
        let handler_fn = Arc::clone(&self.handler_fn);
        let fut = async move { handler_fn(req).await };
        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(err)) => Err(format!("{err}")),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("service panicked: {message}");
                Err(message)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "the request task panicked".to_owned()
    }
}
