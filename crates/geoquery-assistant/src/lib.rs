mod client;
mod error;
mod extract;
mod intent;

pub use client::AssistantClient;
pub use error::AssistantError;
pub use extract::extract_json_object;
pub use intent::{intent_from_response, ExtractedIntent};
