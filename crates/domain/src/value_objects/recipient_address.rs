//! Recipient address value object and recipient normalization
//!
//! Backends hand the bridge loosely formatted identifiers such as
//! `"whatsapp:+15551234567"`. These are normalized and turned into the
//! protocol's canonical `user@server` form. Device-qualified addresses
//! (`user:device@server`) follow a grammar owned by the protocol layer and
//! are returned untouched for the protocol parser to handle.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Server used for plain phone-number users
pub const DEFAULT_USER_SERVER: &str = "s.whatsapp.net";

/// Separates the device qualifier from the user part
pub const DEVICE_SEPARATOR: char = ':';

/// Separates the user part from the server part
pub const SERVER_SEPARATOR: char = '@';

const SCHEME_PREFIX: &str = "whatsapp:";

/// Canonical protocol address of a message recipient
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipientAddress {
    user: String,
    server: String,
    #[serde(default)]
    agent: u8,
    #[serde(default)]
    device: u16,
}

impl RecipientAddress {
    /// Create an address from a user and server.
    ///
    /// An empty server falls back to [`DEFAULT_USER_SERVER`].
    pub fn new(user: impl Into<String>, server: impl Into<String>) -> Result<Self, DomainError> {
        let user = user.into();
        if user.is_empty() {
            return Err(DomainError::invalid_address("missing user"));
        }

        let server = server.into();
        let server = if server.is_empty() {
            DEFAULT_USER_SERVER.to_string()
        } else {
            server
        };

        Ok(Self {
            user,
            server,
            agent: 0,
            device: 0,
        })
    }

    /// Create a phone-number address on the default user server
    pub fn phone(user: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(user, DEFAULT_USER_SERVER)
    }

    /// Create a device-qualified address.
    ///
    /// Used by protocol-layer parsers; no server defaulting is applied.
    pub fn with_device(
        user: impl Into<String>,
        agent: u8,
        device: u16,
        server: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let user = user.into();
        let server = server.into();
        if user.is_empty() {
            return Err(DomainError::invalid_address("missing user"));
        }
        if server.is_empty() {
            return Err(DomainError::invalid_address("missing server"));
        }

        Ok(Self {
            user,
            server,
            agent,
            device,
        })
    }

    /// User part (phone number, group id, ...)
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Server part
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Raw agent number (0 when absent)
    pub const fn agent(&self) -> u8 {
        self.agent
    }

    /// Device number (0 for the primary device)
    pub const fn device(&self) -> u16 {
        self.device
    }

    /// Whether this address targets a specific linked device
    pub const fn is_device_qualified(&self) -> bool {
        self.agent > 0 || self.device > 0
    }
}

impl fmt::Display for RecipientAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.agent > 0 {
            write!(
                f,
                "{}.{}:{}@{}",
                self.user, self.agent, self.device, self.server
            )
        } else if self.device > 0 {
            write!(f, "{}:{}@{}", self.user, self.device, self.server)
        } else {
            write!(f, "{}@{}", self.user, self.server)
        }
    }
}

/// Outcome of parsing a raw recipient without the protocol parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRecipient<'a> {
    /// Input carries a device qualifier and must go to the protocol parser as-is
    DeviceQualified(&'a str),
    /// Input was resolved locally
    Resolved(RecipientAddress),
}

/// Strip surrounding whitespace, a leading `whatsapp:` scheme and a leading `+`.
///
/// Each prefix is stripped at most once, so the result is not always a fixed
/// point: `"whatsapp: +1"` normalizes to `"+1"`, and that again to `"1"`.
pub fn normalize_recipient(raw: &str) -> &str {
    let recipient = raw.trim();
    let recipient = recipient.strip_prefix(SCHEME_PREFIX).unwrap_or(recipient);
    let recipient = recipient.strip_prefix('+').unwrap_or(recipient);
    recipient.trim()
}

/// Normalize a raw recipient and resolve it as far as the bridge's own rules go.
///
/// The device-qualifier check runs before the server-separator check, so an
/// input containing both is always handed to the protocol parser.
pub fn parse_recipient(raw: &str) -> Result<ParsedRecipient<'_>, DomainError> {
    let recipient = normalize_recipient(raw);
    if recipient.is_empty() {
        return Err(DomainError::MissingRecipient);
    }

    if recipient.contains(DEVICE_SEPARATOR) {
        return Ok(ParsedRecipient::DeviceQualified(recipient));
    }

    if let Some((user, server)) = recipient.split_once(SERVER_SEPARATOR) {
        return RecipientAddress::new(user.trim(), server.trim()).map(ParsedRecipient::Resolved);
    }

    RecipientAddress::phone(recipient).map(ParsedRecipient::Resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(raw: &str) -> RecipientAddress {
        match parse_recipient(raw) {
            Ok(ParsedRecipient::Resolved(address)) => address,
            other => unreachable!("expected resolved address, got {other:?}"),
        }
    }

    #[test]
    fn normalize_strips_scheme_and_plus() {
        assert_eq!(normalize_recipient("whatsapp:+15551234567"), "15551234567");
    }

    #[test]
    fn normalize_strips_whitespace() {
        assert_eq!(normalize_recipient("  +4915112345678 \n"), "4915112345678");
        assert_eq!(normalize_recipient("whatsapp:+15551234567  "), "15551234567");
    }

    #[test]
    fn normalize_leaves_plain_input_alone() {
        assert_eq!(normalize_recipient("15551234567"), "15551234567");
        assert_eq!(normalize_recipient("123@g.us"), "123@g.us");
    }

    #[test]
    fn normalize_strips_each_prefix_once() {
        assert_eq!(normalize_recipient("++1"), "+1");
        assert_eq!(normalize_recipient("whatsapp:whatsapp:1"), "whatsapp:1");
    }

    #[test]
    fn normalize_keeps_plus_behind_inner_whitespace() {
        let once = normalize_recipient("whatsapp: +1");
        assert_eq!(once, "+1");
        assert_eq!(normalize_recipient(once), "1");
    }

    #[test]
    fn normalize_of_blank_is_empty() {
        assert_eq!(normalize_recipient("   "), "");
        assert_eq!(normalize_recipient("whatsapp:+"), "");
    }

    #[test]
    fn scheme_prefixed_number_resolves_to_default_server() {
        let address = resolved("whatsapp:+15551234567");
        assert_eq!(address.user(), "15551234567");
        assert_eq!(address.server(), DEFAULT_USER_SERVER);
        assert_eq!(address.to_string(), "15551234567@s.whatsapp.net");
    }

    #[test]
    fn explicit_server_is_kept() {
        let address = resolved("120363025246125486@g.us");
        assert_eq!(address.user(), "120363025246125486");
        assert_eq!(address.server(), "g.us");
    }

    #[test]
    fn parts_around_separator_are_trimmed() {
        let address = resolved(" 4915112345678 @ s.whatsapp.net ");
        assert_eq!(address.user(), "4915112345678");
        assert_eq!(address.server(), "s.whatsapp.net");
    }

    #[test]
    fn empty_server_defaults() {
        let address = resolved("15551234567@");
        assert_eq!(address.server(), DEFAULT_USER_SERVER);
    }

    #[test]
    fn empty_user_is_rejected() {
        let err = parse_recipient("@s.whatsapp.net").unwrap_err();
        assert_eq!(err, DomainError::InvalidAddress("missing user".to_string()));
    }

    #[test]
    fn split_happens_on_first_separator() {
        let address = resolved("abc@def@ghi");
        assert_eq!(address.user(), "abc");
        assert_eq!(address.server(), "def@ghi");
    }

    #[test]
    fn empty_recipient_is_missing() {
        assert_eq!(parse_recipient(""), Err(DomainError::MissingRecipient));
        assert_eq!(parse_recipient(" whatsapp:+ "), Err(DomainError::MissingRecipient));
    }

    #[test]
    fn device_qualified_input_is_not_resolved() {
        assert_eq!(
            parse_recipient("15551234567:12@s.whatsapp.net"),
            Ok(ParsedRecipient::DeviceQualified("15551234567:12@s.whatsapp.net"))
        );
    }

    #[test]
    fn device_check_precedes_server_check() {
        assert_eq!(
            parse_recipient("whatsapp:+1555:3"),
            Ok(ParsedRecipient::DeviceQualified("1555:3"))
        );
    }

    #[test]
    fn device_qualified_display() {
        let address = RecipientAddress::with_device("1555", 0, 12, "s.whatsapp.net").unwrap();
        assert!(address.is_device_qualified());
        assert_eq!(address.to_string(), "1555:12@s.whatsapp.net");

        let address = RecipientAddress::with_device("1555", 1, 3, "lid").unwrap();
        assert_eq!(address.to_string(), "1555.1:3@lid");
    }

    #[test]
    fn device_address_requires_server() {
        let err = RecipientAddress::with_device("1555", 0, 1, "").unwrap_err();
        assert_eq!(err, DomainError::invalid_address("missing server"));
    }

    #[test]
    fn plain_address_is_not_device_qualified() {
        let address = RecipientAddress::phone("1555").unwrap();
        assert!(!address.is_device_qualified());
        assert_eq!(address.device(), 0);
        assert_eq!(address.agent(), 0);
    }
}
