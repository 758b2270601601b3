/// An inbound notification exactly as received: raw body bytes plus the
/// `Stripe-Signature` header value. The body must not be re-serialized
/// before verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEnvelope {
    payload: Vec<u8>,
    signature: String,
}

impl WebhookEnvelope {
    pub fn new(payload: impl Into<Vec<u8>>, signature: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            signature: signature.into(),
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Header value; empty when the header was absent.
    pub fn signature(&self) -> &str {
        &self.signature
    }
}
