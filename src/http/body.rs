//! Relayed response body with a hard deadline.
//!
//! The upstream body is passed through frame by frame; nothing is buffered.
//! Once the deadline passes the stream ends with an error, which hyper
//! surfaces by aborting the response to the caller.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::BoxError;
use hyper::body::{Body, Frame, SizeHint};
use tokio::time::{Instant, Sleep};

/// Error yielded when the exchange deadline passes mid-body.
#[derive(Debug, thiserror::Error)]
#[error("upstream response body exceeded the request deadline")]
pub struct DeadlineElapsed;

/// Body wrapper enforcing an absolute deadline on the whole transfer.
pub struct DeadlineBody<B> {
    inner: B,
    deadline: Pin<Box<Sleep>>,
    failed: bool,
}

impl<B> DeadlineBody<B> {
    pub fn new(inner: B, deadline: Instant) -> Self {
        Self {
            inner,
            deadline: Box::pin(tokio::time::sleep_until(deadline)),
            failed: false,
        }
    }
}

impl<B> Body for DeadlineBody<B>
where
    B: Body + Unpin,
    B::Error: Into<BoxError>,
{
    type Data = B::Data;
    type Error = BoxError;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        if this.failed {
            return Poll::Ready(None);
        }

        if this.deadline.as_mut().poll(cx).is_ready() {
            this.failed = true;
            tracing::warn!("Upstream body relay cut short by request deadline");
            return Poll::Ready(Some(Err(Box::new(DeadlineElapsed))));
        }

        match Pin::new(&mut this.inner).poll_frame(cx) {
            Poll::Ready(Some(Err(e))) => {
                this.failed = true;
                let e: BoxError = e.into();
                tracing::warn!(error = %e, "Upstream body relay failed");
                Poll::Ready(Some(Err(e)))
            }
            other => other.map_err(Into::into),
        }
    }

    fn is_end_stream(&self) -> bool {
        self.failed || self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}
