//! Account validator port - registration authorization boundary

use async_trait::async_trait;

/// Confirms that a one-time device token is currently valid for a username
/// and knows how to extract the device's durable public identifier from it.
///
/// Implementations must be side-effect-free with respect to registry
/// state; any token-consumption bookkeeping is the validator's own
/// concern (verification services typically burn the OTP counter).
#[async_trait]
pub trait AccountValidator: Send + Sync {
    /// Whether the token authorizes a registration for this username
    async fn is_valid(&self, username: &str, token: &str) -> bool;

    /// Extract the device's durable public identifier from the token.
    ///
    /// Returns `None` when the token does not carry one (malformed input).
    fn token_public_id(&self, token: &str) -> Option<String>;
}
