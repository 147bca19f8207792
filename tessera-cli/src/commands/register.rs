//! Register command - enroll a device for a user

use anyhow::{bail, Result};
use tessera_core::RegistrationRequest;

use super::get_context;
use crate::output;

pub async fn run(username: &str, token: &str, name: &str) -> Result<()> {
    let ctx = get_context().await?;

    let request = RegistrationRequest {
        username: username.to_string(),
        token: token.to_string(),
        device_name: name.to_string(),
    };

    if !ctx.registry.register_device(&request).await? {
        bail!("Registration rejected: token is not valid for user '{username}'");
    }

    output::success(&format!("Registered device '{name}' for '{username}'"));
    Ok(())
}
