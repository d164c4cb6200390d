//! Approve-order orchestration.
//!
//! [`ApproveOrderClient`] drives one approval attempt through the states
//!
//! ```text
//! Idle -> Confirming -> { Completed | ChallengePending }
//!                        -> ChallengeInProgress
//!                        -> { Approved | Declined | Cancelled }
//! ```
//!
//! and pushes the outcome to a caller-supplied [`ApproveOrderListener`].
//! Per attempt the listener receives exactly one terminal event
//! ([`ApproveOrderEvent::Success`], [`ApproveOrderEvent::Failure`] or
//! [`ApproveOrderEvent::Cancelled`]) and, for challenge-bearing attempts, a
//! matched [`ApproveOrderEvent::ChallengeWillLaunch`] /
//! [`ApproveOrderEvent::ChallengeDidFinish`] pair strictly before it.
//!
//! All delivery happens on a single per-attempt task, so host-side state
//! mutation in response to callbacks is race-free regardless of which task
//! completed the underlying network or challenge work.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use paysdk::error::ConcurrentOperationError;
use tokio::sync::mpsc;
use url::Url;

use crate::card::Card;
use crate::client::CardConfirmationClient;
use crate::types::ThreeDsChallenge;

/// Terminal verdict of the interactive 3DS sub-flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreeDsVerdict {
    /// The payer completed verification and the order was approved.
    Approved {
        /// Identifier of the approved order.
        order_id: String,
        /// Payer identifier, when the sub-flow learned one.
        payer_id: Option<String>,
    },
    /// Verification was declined.
    Declined {
        /// Machine-readable decline reason.
        reason: String,
    },
    /// The payer dismissed the challenge.
    Cancelled,
}

/// Performs the out-of-process interactive 3DS verification.
///
/// This is the seam where platform-specific UI (webview, browser tab) is
/// injected; the orchestrator never inspects its internals. The contract
/// requires the sub-flow to resolve — including to
/// [`ThreeDsVerdict::Cancelled`] when the host dismisses it — rather than
/// hang; timeouts are the sub-flow's responsibility.
#[async_trait]
pub trait ChallengeHandler: Send + Sync {
    /// Presents the challenge and resolves to its verdict.
    async fn present(&self, challenge: &ThreeDsChallenge, return_url: &Url) -> ThreeDsVerdict;
}

/// Lifecycle event of one approval attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApproveOrderEvent {
    /// A 3DS challenge is about to launch. Informational.
    ChallengeWillLaunch,
    /// The 3DS challenge returned a verdict. Informational; always follows
    /// a `ChallengeWillLaunch` and precedes the terminal event.
    ChallengeDidFinish,
    /// The order was approved. Terminal.
    Success {
        /// Identifier of the approved order.
        order_id: String,
        /// Payer identifier, when known.
        payer_id: Option<String>,
    },
    /// The attempt failed. Terminal.
    Failure {
        /// Human-readable failure description.
        description: String,
    },
    /// The payer cancelled the attempt. Terminal.
    Cancelled,
}

impl ApproveOrderEvent {
    /// Returns true for events after which no further events may fire.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Success { .. } | Self::Failure { .. } | Self::Cancelled
        )
    }
}

/// Receives the events of one approval attempt.
pub trait ApproveOrderListener: Send + Sync {
    /// Called once per event, in order, on a single delivery task.
    fn on_event(&self, event: ApproveOrderEvent);
}

/// Per-attempt event channel drained by a single delivery task.
///
/// The drain loop stops permanently after the first terminal event, so
/// anything emitted later — spurious sub-flow signals included — is never
/// delivered.
struct EventDispatcher {
    tx: mpsc::UnboundedSender<ApproveOrderEvent>,
}

impl EventDispatcher {
    fn spawn(listener: Arc<dyn ApproveOrderListener>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<ApproveOrderEvent>();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let terminal = event.is_terminal();
                tracing::debug!(?event, "delivering approve-order event");
                listener.on_event(event);
                if terminal {
                    break;
                }
            }
        });
        Self { tx }
    }

    fn emit(&self, event: ApproveOrderEvent) {
        // A closed channel means delivery was already shut down; late
        // events are dropped by contract.
        let _ = self.tx.send(event);
    }
}

/// Releases the in-flight flag on every exit path, including cancellation
/// of the `approve_order` future.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, ConcurrentOperationError> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| ConcurrentOperationError)?;
        Ok(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Approves an order with a card, driving the optional 3DS step-up.
///
/// Holds per-attempt state: a second [`approve_order`] call while one is in
/// flight is rejected with [`ConcurrentOperationError`] without affecting
/// the pending attempt. Dropping the returned future (host cancellation)
/// stops event production; the delivery task ends with the channel.
///
/// [`approve_order`]: ApproveOrderClient::approve_order
pub struct ApproveOrderClient {
    confirmation_client: CardConfirmationClient,
    challenge_handler: Arc<dyn ChallengeHandler>,
    return_url: Url,
    in_flight: AtomicBool,
}

impl std::fmt::Debug for ApproveOrderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApproveOrderClient")
            .field("confirmation_client", &self.confirmation_client)
            .field("return_url", &self.return_url)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl ApproveOrderClient {
    /// Creates an orchestrator over the given confirmation client and
    /// challenge sub-flow.
    #[must_use]
    pub fn new(
        confirmation_client: CardConfirmationClient,
        challenge_handler: Arc<dyn ChallengeHandler>,
        return_url: Url,
    ) -> Self {
        Self {
            confirmation_client,
            challenge_handler,
            return_url,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Runs one approval attempt, pushing events to `listener`.
    ///
    /// Resolves once the terminal event has been emitted. Confirmation
    /// errors are normalized to [`ApproveOrderEvent::Failure`]; they never
    /// reach the listener as a distinct type.
    ///
    /// # Errors
    ///
    /// Returns [`ConcurrentOperationError`] when another attempt is already
    /// in flight on this orchestrator.
    pub async fn approve_order(
        &self,
        order_id: &str,
        card: &Card,
        listener: Arc<dyn ApproveOrderListener>,
    ) -> Result<(), ConcurrentOperationError> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;
        let dispatcher = EventDispatcher::spawn(listener);

        tracing::debug!(order_id, stage = "confirming", "approval attempt started");
        let result = self
            .confirmation_client
            .confirm_payment_source(order_id, card)
            .await;

        match result {
            Err(error) => {
                tracing::debug!(order_id, stage = "completed", %error, "confirmation failed");
                dispatcher.emit(ApproveOrderEvent::Failure {
                    description: error.to_string(),
                });
            }
            Ok(confirmation) => match confirmation.challenge {
                None => {
                    tracing::debug!(order_id, stage = "completed", "approved without challenge");
                    dispatcher.emit(ApproveOrderEvent::Success {
                        order_id: confirmation.order_id,
                        payer_id: None,
                    });
                }
                Some(challenge) => {
                    tracing::debug!(order_id, stage = "challenge_in_progress", "launching 3DS");
                    dispatcher.emit(ApproveOrderEvent::ChallengeWillLaunch);
                    let verdict = self
                        .challenge_handler
                        .present(&challenge, &self.return_url)
                        .await;
                    dispatcher.emit(ApproveOrderEvent::ChallengeDidFinish);
                    dispatcher.emit(Self::terminal_event_for(verdict));
                }
            },
        }
        Ok(())
    }

    /// Maps the sub-flow verdict 1:1 onto the terminal listener event.
    fn terminal_event_for(verdict: ThreeDsVerdict) -> ApproveOrderEvent {
        match verdict {
            ThreeDsVerdict::Approved { order_id, payer_id } => {
                ApproveOrderEvent::Success { order_id, payer_id }
            }
            ThreeDsVerdict::Declined { reason } => ApproveOrderEvent::Failure {
                description: reason,
            },
            ThreeDsVerdict::Cancelled => ApproveOrderEvent::Cancelled,
        }
    }
}
