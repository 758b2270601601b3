//! Stripe webhook signature verification.
//!
//! Authenticates inbound notifications with HMAC-SHA256 over
//! `"{timestamp}.{raw body}"` and rejects stale or future-dated
//! timestamps to defeat replays. Verification always runs on the exact
//! bytes received, before any JSON parsing.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::envelope::WebhookEnvelope;
use super::errors::{SignatureError, WebhookError};
use super::event::VerifiedEvent;

type HmacSha256 = Hmac<Sha256>;

/// Default maximum age of a signed timestamp (5 minutes).
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Default allowance for timestamps slightly ahead of our clock (1 minute).
pub const DEFAULT_CLOCK_SKEW_SECS: i64 = 60;

/// Accepted age range for a signature timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayWindow {
    tolerance_secs: i64,
    clock_skew_secs: i64,
}

impl ReplayWindow {
    pub fn new(tolerance_secs: i64, clock_skew_secs: i64) -> Self {
        Self {
            tolerance_secs,
            clock_skew_secs,
        }
    }

    pub fn tolerance_secs(&self) -> i64 {
        self.tolerance_secs
    }

    pub fn clock_skew_secs(&self) -> i64 {
        self.clock_skew_secs
    }

    /// Checks `timestamp` against `now` (both unix seconds).
    ///
    /// An age of exactly `tolerance_secs` is still accepted.
    pub fn check(&self, timestamp: i64, now: i64) -> Result<(), SignatureError> {
        let age = now.saturating_sub(timestamp);

        if age > self.tolerance_secs {
            return Err(SignatureError::TimestampTooOld { age_secs: age });
        }
        if age < -self.clock_skew_secs {
            return Err(SignatureError::TimestampInFuture {
                skew_secs: age.saturating_neg(),
            });
        }
        Ok(())
    }
}

impl Default for ReplayWindow {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE_SECS, DEFAULT_CLOCK_SKEW_SECS)
    }
}

/// Parsed components from the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when the signature was generated.
    pub timestamp: i64,
    /// The `t` value exactly as sent. This is what the sender signed.
    pub raw_timestamp: String,
    /// Every v1 signature present, in header order. Secret rotation sends several.
    pub v1_signatures: Vec<Vec<u8>>,
    /// Legacy v0 signature. Parsed but never trusted.
    pub v0_signature: Option<Vec<u8>>,
}

impl SignatureHeader {
    /// Parses a Stripe-Signature header string.
    ///
    /// Format: `t=<timestamp>,v1=<signature>[,v1=<signature>...][,v0=<legacy>]`
    ///
    /// Unknown keys are ignored for forward compatibility.
    pub fn parse(header: &str) -> Result<Self, SignatureError> {
        let header = header.trim();
        if header.is_empty() {
            return Err(SignatureError::EmptyHeader);
        }

        let mut timestamp: Option<(i64, String)> = None;
        let mut v1_signatures: Vec<Vec<u8>> = Vec::new();
        let mut v0_signature: Option<Vec<u8>> = None;

        for part in header.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| SignatureError::MalformedHeader(part.trim().to_string()))?;

            match key.trim() {
                "t" => {
                    let raw = value.trim();
                    let parsed = raw.parse().map_err(|_| SignatureError::InvalidTimestamp)?;
                    timestamp = Some((parsed, raw.to_string()));
                }
                "v1" => v1_signatures.push(decode_signature(value)?),
                "v0" => v0_signature = Some(decode_signature(value)?),
                _ => {}
            }
        }

        let (timestamp, raw_timestamp) = timestamp.ok_or(SignatureError::MissingTimestamp)?;
        if v1_signatures.is_empty() {
            return Err(SignatureError::MissingV1Signature);
        }

        Ok(Self {
            timestamp,
            raw_timestamp,
            v1_signatures,
            v0_signature,
        })
    }
}

/// Verifier for Stripe webhook signatures.
pub struct WebhookVerifier {
    secret: SecretString,
    window: ReplayWindow,
}

impl WebhookVerifier {
    pub fn new(secret: SecretString, window: ReplayWindow) -> Self {
        Self { secret, window }
    }

    pub fn window(&self) -> ReplayWindow {
        self.window
    }

    /// Verifies the envelope against the current wall clock.
    pub fn verify(&self, envelope: &WebhookEnvelope) -> Result<VerifiedEvent, WebhookError> {
        self.verify_at(envelope, chrono::Utc::now().timestamp())
    }

    /// Verifies the envelope as if the current time were `now`.
    ///
    /// # Verification Steps
    ///
    /// 1. Parse the signature header
    /// 2. Check the timestamp against the replay window
    /// 3. Compute the expected HMAC over the raw body
    /// 4. Accept if any v1 signature matches in constant time
    /// 5. Decode the generic event shape
    ///
    /// # Errors
    ///
    /// - `SignatureInvalid` for any header, timestamp or MAC failure
    /// - `MalformedEvent` when the authenticated body is not an event
    pub fn verify_at(
        &self,
        envelope: &WebhookEnvelope,
        now: i64,
    ) -> Result<VerifiedEvent, WebhookError> {
        let header = SignatureHeader::parse(envelope.signature())?;

        self.window.check(header.timestamp, now)?;

        let expected = self.compute_signature(&header.raw_timestamp, envelope.payload());

        // Fold over every candidate so the comparison count does not depend on
        // which signature matched.
        let matched = header
            .v1_signatures
            .iter()
            .fold(false, |found, candidate| {
                constant_time_compare(&expected, candidate) | found
            });
        if !matched {
            return Err(SignatureError::Mismatch.into());
        }

        VerifiedEvent::from_verified_body(envelope.payload())
    }

    fn compute_signature(&self, timestamp: &str, payload: &[u8]) -> Vec<u8> {
        hmac_sha256(self.secret.expose_secret().as_bytes(), timestamp, payload)
    }
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"[REDACTED]")
            .field("window", &self.window)
            .finish()
    }
}

/// Builds a `Stripe-Signature` header value for `payload` signed at `timestamp`.
///
/// Used to sign fixtures and locally replayed notifications.
pub fn signature_header(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let timestamp = timestamp.to_string();
    let signature = hmac_sha256(secret.as_bytes(), &timestamp, payload);
    format!("t={},v1={}", timestamp, hex::encode(signature))
}

fn hmac_sha256(key: &[u8], timestamp: &str, payload: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

fn decode_signature(value: &str) -> Result<Vec<u8>, SignatureError> {
    hex::decode(value.trim()).map_err(|_| SignatureError::InvalidSignatureFormat)
}
