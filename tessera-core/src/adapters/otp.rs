//! Modhex OTP validator
//!
//! A hardware token emits a one-time password in modhex (the 16-letter
//! alphabet `cbdefghijklnrtuv`, chosen to survive keyboard layouts). The
//! trailing 32 characters are the per-press encrypted passcode; whatever
//! precedes them is the device's durable public identifier.
//!
//! This adapter gates on token shape. Deployments that verify OTPs against
//! an upstream verification service wrap this with their own
//! `AccountValidator` that burns the one-time counter; shape checking is
//! all the registry itself needs from the boundary.

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use crate::ports::AccountValidator;

/// Length of the per-press passcode portion of an OTP
const PASSCODE_LEN: usize = 32;

/// Validates modhex one-time tokens and extracts device public ids
pub struct ModhexAccountValidator {
    token_pattern: Regex,
}

impl ModhexAccountValidator {
    pub fn new() -> Self {
        // Public id of 2..=16 chars followed by the 32-char passcode
        let token_pattern =
            Regex::new("^[cbdefghijklnrtuv]{34,48}$").expect("static pattern compiles");
        Self { token_pattern }
    }
}

impl Default for ModhexAccountValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountValidator for ModhexAccountValidator {
    async fn is_valid(&self, username: &str, token: &str) -> bool {
        if username.trim().is_empty() {
            return false;
        }
        let valid = self.token_pattern.is_match(token);
        if !valid {
            debug!(username, "Token failed modhex shape check");
        }
        valid
    }

    fn token_public_id(&self, token: &str) -> Option<String> {
        if !self.token_pattern.is_match(token) {
            return None;
        }
        Some(token[..token.len() - PASSCODE_LEN].to_string())
    }
}
