//! Value Objects - Immutable, identity-less domain primitives

mod recipient_address;

pub use recipient_address::{
    DEFAULT_USER_SERVER, DEVICE_SEPARATOR, ParsedRecipient, RecipientAddress, SERVER_SEPARATOR,
    normalize_recipient, parse_recipient,
};
