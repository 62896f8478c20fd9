#[cfg(feature = "backend-openai")]
pub mod openai;

#[cfg(feature = "backend-ollama")]
pub mod ollama;

#[cfg(feature = "system-speech")]
pub mod system_speech;
