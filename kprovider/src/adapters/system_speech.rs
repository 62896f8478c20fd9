//! Native text-to-speech through a local speech program.
//!
//! ```rust
//! use kprovider::adapters::system_speech::SystemSpeech;
//! use kprovider::{BackendId, LocalSpeechCapability};
//!
//! let speech = SystemSpeech::default().with_args(["-s", "150"]);
//! assert_eq!(speech.id(), BackendId::SystemSpeech);
//! assert_eq!(speech.program(), "espeak");
//! ```

use std::process::Stdio;

use tokio::process::Command;

use crate::{BackendId, LocalSpeechCapability, ProviderError, ProviderFuture};

pub const DEFAULT_SPEECH_PROGRAM: &str = "espeak";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemSpeech {
    program: String,
    args: Vec<String>,
    voice_flag: Option<String>,
}

impl Default for SystemSpeech {
    fn default() -> Self {
        Self::new(DEFAULT_SPEECH_PROGRAM)
    }
}

impl SystemSpeech {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            voice_flag: Some("-v".to_string()),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Flag used to pass the locale as a voice name; `None` drops the locale.
    pub fn with_voice_flag(mut self, flag: Option<String>) -> Self {
        self.voice_flag = flag;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, text: &str, locale: Option<&str>) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let (Some(flag), Some(locale)) = (self.voice_flag.as_deref(), locale)
            && !locale.trim().is_empty()
        {
            command.arg(flag).arg(locale.trim().to_ascii_lowercase());
        }

        command.arg(text);
        command
    }
}

impl LocalSpeechCapability for SystemSpeech {
    fn id(&self) -> BackendId {
        BackendId::SystemSpeech
    }

    fn speak<'a>(
        &'a self,
        text: String,
        locale: Option<String>,
    ) -> ProviderFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            if text.trim().is_empty() {
                return Err(ProviderError::invalid_request("speech text must not be empty"));
            }

            let output = self
                .command(&text, locale.as_deref())
                .output()
                .await
                .map_err(|err| {
                    ProviderError::unavailable(format!(
                        "failed to start speech program '{}': {err}",
                        self.program
                    ))
                })?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(ProviderError::rejected(format!(
                    "speech program '{}' exited with {}: {}",
                    self.program,
                    output.status,
                    stderr.trim()
                )));
            }

            Ok(())
        })
    }
}
