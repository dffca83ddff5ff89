pub mod chat_driver;
pub mod chat_view;
pub mod gemini;
pub mod relay;
pub mod relay_client;
