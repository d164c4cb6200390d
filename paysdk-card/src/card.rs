//! Card data and its wire form.

use serde::Serialize;

/// A payment card as entered by the payer.
///
/// Never logged or serialized except into the confirm-payment-source
/// request body.
#[derive(Clone, PartialEq, Eq)]
pub struct Card {
    /// Primary account number, digits only.
    pub number: String,
    /// Two-digit expiration month, `"01"`..`"12"`.
    pub expiration_month: String,
    /// Four-digit expiration year.
    pub expiration_year: String,
    /// Card verification code.
    pub security_code: String,
}

impl Card {
    /// Creates a card from its raw fields.
    pub fn new(
        number: impl Into<String>,
        expiration_month: impl Into<String>,
        expiration_year: impl Into<String>,
        security_code: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            expiration_month: expiration_month.into(),
            expiration_year: expiration_year.into(),
            security_code: security_code.into(),
        }
    }

    /// Wire-format expiry, `YYYY-MM`.
    #[must_use]
    pub fn expiry(&self) -> String {
        format!("{}-{}", self.expiration_year, self.expiration_month)
    }
}

// Card numbers must not leak through debug logs.
impl std::fmt::Debug for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Card")
            .field("number", &"[redacted]")
            .field("expiry", &self.expiry())
            .finish_non_exhaustive()
    }
}

/// `payment_source.card` wire object of the confirm request.
#[derive(Debug, Serialize)]
pub(crate) struct CardWire<'a> {
    number: &'a str,
    expiry: String,
    security_code: &'a str,
    attributes: CardAttributes,
}

/// Verification attributes: ask the processor for a 3DS step-up only when
/// the card network requires one.
#[derive(Debug, Serialize)]
struct CardAttributes {
    verification: Verification,
}

#[derive(Debug, Serialize)]
struct Verification {
    method: &'static str,
}

impl<'a> From<&'a Card> for CardWire<'a> {
    fn from(card: &'a Card) -> Self {
        Self {
            number: &card.number,
            expiry: card.expiry(),
            security_code: &card.security_code,
            attributes: CardAttributes {
                verification: Verification {
                    method: "SCA_WHEN_REQUIRED",
                },
            },
        }
    }
}
