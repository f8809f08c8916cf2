//! JID (protocol address) parsing
//!
//! Grammar: `user[.agent][:device]@server`. The agent and device parts only
//! appear on addresses that target one specific linked device.

use domain::{DomainError, RecipientAddress};

use crate::error::SessionError;

/// Parse a JID string into a recipient address.
///
/// Server-only JIDs (no `@`) are rejected since they cannot receive messages.
pub fn parse_jid(input: &str) -> Result<RecipientAddress, SessionError> {
    let Some((user_part, server)) = input.split_once('@') else {
        return Err(SessionError::invalid_jid("address has no server part"));
    };

    let (user, agent, device) = if let Some((user, ad)) = user_part.split_once('.') {
        if ad.contains('.') {
            return Err(SessionError::invalid_jid("unexpected number of dots"));
        }
        let (agent, device) = match ad.split_once(':') {
            Some((agent, device)) => (agent, Some(device)),
            None => (ad, None),
        };
        if device.is_some_and(|d| d.contains(':')) {
            return Err(SessionError::invalid_jid("unexpected number of colons"));
        }
        let agent = agent
            .parse::<u8>()
            .map_err(|e| SessionError::invalid_jid(format!("failed to parse agent: {e}")))?;
        let device = device.map(parse_device).transpose()?.unwrap_or(0);
        (user, agent, device)
    } else if let Some((user, device)) = user_part.split_once(':') {
        if device.contains(':') {
            return Err(SessionError::invalid_jid("unexpected number of colons"));
        }
        (user, 0, parse_device(device)?)
    } else {
        (user_part, 0, 0)
    };

    RecipientAddress::with_device(user, agent, device, server).map_err(|e| match e {
        DomainError::InvalidAddress(reason) => SessionError::InvalidJid(reason),
        DomainError::MissingRecipient => SessionError::invalid_jid("missing user"),
    })
}

fn parse_device(device: &str) -> Result<u16, SessionError> {
    device
        .parse::<u16>()
        .map_err(|e| SessionError::invalid_jid(format!("failed to parse device: {e}")))
}
