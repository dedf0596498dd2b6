use serde::{Deserialize, Serialize};

use super::services::VoiceCommand;

#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct VoiceCommandResponse {
    pub transcript: String,
    pub command: VoiceCommand,
}
