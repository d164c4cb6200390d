//! Typed results of a card confirmation.

use url::Url;

/// Descriptor for an interactive 3-D Secure step-up challenge.
///
/// Opaque to the SDK beyond the URL; the interactive sub-flow owns the
/// redirect and the verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreeDsChallenge {
    /// The payer-action URL the sub-flow must open.
    pub url: Url,
}

/// Result of confirming a card as a payment source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardConfirmationResult {
    /// Identifier of the order the card was attached to.
    pub order_id: String,
    /// Upstream order status, e.g. `APPROVED` or `PAYER_ACTION_REQUIRED`.
    pub status: String,
    /// Last digits of the masked card number.
    pub last_digits: String,
    /// Card network, e.g. `VISA`.
    pub brand: String,
    /// Step-up challenge the payer must complete, when one is required.
    pub challenge: Option<ThreeDsChallenge>,
}

impl CardConfirmationResult {
    /// Returns true when approval requires the interactive 3DS sub-flow.
    #[must_use]
    pub const fn requires_challenge(&self) -> bool {
        self.challenge.is_some()
    }
}
