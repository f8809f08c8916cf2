//! Adapters implementing application ports

mod webhook_adapter;
mod whatsapp_adapter;

pub use webhook_adapter::HttpWebhookAdapter;
pub use whatsapp_adapter::WhatsAppSessionAdapter;
