//! Address parser port
//!
//! The grammar of device-qualified addresses belongs to the protocol layer.
//! The bridge hands such addresses over verbatim.

#[cfg(test)]
use mockall::automock;

use domain::RecipientAddress;

use crate::error::ApplicationError;

/// Parses protocol addresses the bridge does not resolve itself
#[cfg_attr(test, automock)]
pub trait AddressParserPort: Send + Sync {
    /// Parse a normalized, device-qualified address.
    ///
    /// Failures are reported as [`ApplicationError::AddressParse`].
    fn parse_address(&self, address: &str) -> Result<RecipientAddress, ApplicationError>;
}
