//! The per-request response object handed to handlers.
//!
//! [`ResponseWriter`] lets a handler produce the response itself (custom
//! headers, a streamed body) instead of returning a value. It accepts exactly
//! one response; the adapter checks [`ResponseWriter::headers_sent`] before
//! settling so a handler-written response is never followed by a second one.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::response::{IntoResponse, Response};

/// The commit flag and the committed response, guarded together so a
/// committed writer always has its response in place.
#[derive(Default)]
struct Slot {
    sent: bool,
    response: Option<Response>,
}

/// Handle to the response of one in-flight request.
///
/// Cloning shares the same underlying slot.
#[derive(Clone, Default)]
pub struct ResponseWriter {
    inner: Arc<Mutex<Slot>>,
}

impl ResponseWriter {
    pub(crate) fn new() -> Self {
        ResponseWriter::default()
    }

    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True once a response has been committed by anyone.
    pub fn headers_sent(&self) -> bool {
        self.slot().sent
    }

    /// Commits `response` as the request's response.
    ///
    /// Returns `false` and drops `response` if one was already committed,
    /// including after the request has settled.
    pub fn send(&self, response: impl IntoResponse) -> bool {
        let response = response.into_response();
        let mut slot = self.slot();
        if slot.sent {
            drop(slot);
            tracing::debug!("response already sent; ignoring second send");
            return false;
        }
        slot.sent = true;
        slot.response = Some(response);
        true
    }

    /// Marks the response as committed. Returns `true` for the caller that
    /// won the race, `false` if it was already committed.
    ///
    /// When this returns `false` because of a [`send`](Self::send), the
    /// response is already available to [`take`](Self::take).
    pub(crate) fn claim(&self) -> bool {
        let mut slot = self.slot();
        !std::mem::replace(&mut slot.sent, true)
    }

    /// Removes the response committed through [`send`](Self::send), if any.
    pub(crate) fn take(&self) -> Option<Response> {
        self.slot().response.take()
    }
}

impl fmt::Debug for ResponseWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseWriter")
            .field("headers_sent", &self.headers_sent())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn first_send_wins() {
        let writer = ResponseWriter::new();
        assert!(!writer.headers_sent());
        assert!(writer.send((StatusCode::CREATED, "first")));
        assert!(writer.headers_sent());
        assert!(!writer.send((StatusCode::OK, "second")));

        let response = writer.take().unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(writer.take().is_none());
    }

    #[test]
    fn clones_share_state() {
        let writer = ResponseWriter::new();
        let clone = writer.clone();
        assert!(clone.send(StatusCode::ACCEPTED));
        assert!(writer.headers_sent());
    }

    #[test]
    fn lost_claim_always_finds_the_sent_response() {
        for _ in 0..200 {
            let writer = ResponseWriter::new();
            let sender = writer.clone();
            let claimed = std::thread::scope(|scope| {
                scope.spawn(move || sender.send(StatusCode::ACCEPTED));
                writer.claim()
            });
            if !claimed {
                let response = writer.take().expect("sent response must be in the slot");
                assert_eq!(response.status(), StatusCode::ACCEPTED);
            }
        }
    }

    #[test]
    fn claim_blocks_later_sends() {
        let writer = ResponseWriter::new();
        assert!(writer.claim());
        assert!(!writer.claim());
        assert!(!writer.send(StatusCode::OK));
        assert!(writer.take().is_none());
    }
}
