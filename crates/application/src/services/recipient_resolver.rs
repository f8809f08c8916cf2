//! Recipient resolution
//!
//! Turns the loosely formatted recipients backends send (`whatsapp:+1555...`,
//! `1555...@s.whatsapp.net`, `1555...:3@s.whatsapp.net`) into protocol
//! addresses. Device-qualified input goes to the protocol parser untouched.

use std::fmt;
use std::sync::Arc;

use domain::{ParsedRecipient, RecipientAddress, parse_recipient};
use tracing::debug;

use crate::error::ApplicationError;
use crate::ports::AddressParserPort;

/// Resolves raw recipient strings into protocol addresses
pub struct RecipientResolver {
    parser: Arc<dyn AddressParserPort>,
}

impl fmt::Debug for RecipientResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecipientResolver").finish_non_exhaustive()
    }
}

impl RecipientResolver {
    /// Create a resolver delegating device-qualified addresses to `parser`
    pub fn new(parser: Arc<dyn AddressParserPort>) -> Self {
        Self { parser }
    }

    /// Resolve a raw recipient
    ///
    /// # Errors
    ///
    /// - [`domain::DomainError::MissingRecipient`] if nothing is left after normalization
    /// - [`domain::DomainError::InvalidAddress`] for `@server` input without a user
    /// - whatever the protocol parser reports for device-qualified input
    pub fn resolve(&self, raw: &str) -> Result<RecipientAddress, ApplicationError> {
        match parse_recipient(raw)? {
            ParsedRecipient::Resolved(address) => Ok(address),
            ParsedRecipient::DeviceQualified(address) => {
                debug!(address = %address, "Delegating device-qualified address to protocol parser");
                self.parser.parse_address(address)
            },
        }
    }
}
