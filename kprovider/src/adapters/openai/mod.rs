mod backend;
mod serde_api;
mod transport;
mod types;

pub use backend::OpenAiBackend;
pub use transport::{OpenAiHttpTransport, OpenAiTransport};
pub use types::{
    OpenAiAuth, OpenAiChatRequest, OpenAiChatResponse, OpenAiImageRequest, OpenAiImageResponse,
    OpenAiMessage, OpenAiRole, OpenAiSpeechRequest, OpenAiSpeechResponse,
};
