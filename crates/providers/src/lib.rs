//! Generation infrastructure: credential/model rotation, the Gemini HTTP
//! adapter, and the retry-over-rotation generation client.

pub mod client;
pub mod gemini;
pub mod rotation;
pub mod traits;
pub mod util;

pub use client::GenerationClient;
pub use gemini::GeminiGenerator;
pub use rotation::{CredentialRotator, RotationPick};
pub use traits::TextGenerator;
