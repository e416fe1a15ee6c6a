//! Detached dialogue calls.
//!
//! Each meeting spawns one task on the tokio runtime.  The task awaits the
//! collaborator and pushes the outcome into an unbounded channel; the tick
//! loop collects finished outcomes with a non-blocking [`drain`].
//!
//! Session timeouts do not cancel calls: a late reply is still delivered and
//! logged.  Only [`cancel_all`] (simulation stop) aborts in-flight tasks.
//!
//! [`drain`]: DialogueDispatcher::drain
//! [`cancel_all`]: DialogueDispatcher::cancel_all

use std::collections::HashMap;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

use village_core::SessionId;

use crate::{DialogueReply, DialogueRequest, DialogueResult, DialogueService};

/// A finished dialogue call.
#[derive(Debug)]
pub struct DialogueOutcome {
    pub session: SessionId,
    pub request: DialogueRequest,
    pub result:  DialogueResult<DialogueReply>,
}

pub struct DialogueDispatcher<D: DialogueService> {
    service:   Arc<D>,
    runtime:   Handle,
    in_flight: HashMap<SessionId, JoinHandle<()>>,
    tx:        UnboundedSender<DialogueOutcome>,
    rx:        UnboundedReceiver<DialogueOutcome>,
}

impl<D: DialogueService> DialogueDispatcher<D> {
    pub fn new(service: Arc<D>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { service, runtime, in_flight: HashMap::new(), tx, rx }
    }

    pub fn service(&self) -> &D {
        &self.service
    }

    /// Start a call for `session`.  Returns immediately.
    pub fn dispatch(&mut self, session: SessionId, request: DialogueRequest) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        let handle = self.runtime.spawn(async move {
            let result = service.converse(request.clone()).await;
            // The receiver is gone once the call was cancelled.
            let _ = tx.send(DialogueOutcome { session, request, result });
        });
        debug!(session = %session, "dialogue dispatched");
        self.in_flight.insert(session, handle);
    }

    /// Collect every outcome that has arrived so far, in arrival order.
    pub fn drain(&mut self) -> Vec<DialogueOutcome> {
        let mut outcomes = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(outcome) => {
                    self.in_flight.remove(&outcome.session);
                    outcomes.push(outcome);
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        outcomes
    }

    /// Abort every in-flight call and discard undelivered outcomes.
    /// Returns the number of calls aborted.
    ///
    /// A task already inside a poll cannot be aborted and may still finish.
    /// The channel is replaced so such a task sends into a closed receiver
    /// and its outcome never reaches a later [`drain`](Self::drain).
    pub fn cancel_all(&mut self) -> usize {
        let aborted = self.in_flight.len();
        for (session, handle) in self.in_flight.drain() {
            handle.abort();
            debug!(session = %session, "dialogue cancelled");
        }
        let (tx, rx) = mpsc::unbounded_channel();
        self.tx = tx;
        self.rx = rx;
        aborted
    }

    /// Calls dispatched but not yet drained.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

impl<D: DialogueService> Drop for DialogueDispatcher<D> {
    fn drop(&mut self) {
        for handle in self.in_flight.values() {
            handle.abort();
        }
    }
}
