use serde::{Deserialize, Serialize};

/// Intent recognised from a spoken command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceCommand {
    Analyze,
    Camera,
    Capture,
    Upload,
    History,
    Help,
    Reset,
    Repeat,
    Unknown,
}

/// Checked top to bottom; the first command with a matching phrase wins.
const PHRASES: &[(VoiceCommand, &[&str])] = &[
    (VoiceCommand::Help, &["help", "what can you do", "commands"]),
    (VoiceCommand::Repeat, &["repeat", "say that again", "say again", "again"]),
    (VoiceCommand::Reset, &["reset", "start over", "clear", "new scan"]),
    (VoiceCommand::History, &["history", "recent", "past scans", "previous"]),
    (VoiceCommand::Upload, &["upload", "choose file", "gallery", "pick a photo"]),
    (VoiceCommand::Capture, &["capture", "take a photo", "take photo", "take a picture", "snap", "shoot"]),
    (VoiceCommand::Camera, &["camera", "open camera", "start camera"]),
    (VoiceCommand::Analyze, &["analyze", "analyse", "scan", "check this", "what is this", "identify"]),
];

/// Lowercases and strips punctuation, padding with spaces so phrases match whole words.
fn normalize(transcript: &str) -> String {
    let words: Vec<String> = transcript
        .split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric() || *c == '\'')
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect();
    format!(" {} ", words.join(" "))
}

impl VoiceCommand {
    pub fn from_transcript(transcript: &str) -> Self {
        let text = normalize(transcript);
        PHRASES
            .iter()
            .find(|(_, phrases)| phrases.iter().any(|p| text.contains(&format!(" {p} "))))
            .map(|(cmd, _)| *cmd)
            .unwrap_or(VoiceCommand::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_every_command() {
        let cases = [
            ("Analyze this apple", VoiceCommand::Analyze),
            ("scan it", VoiceCommand::Analyze),
            ("Open the camera.", VoiceCommand::Camera),
            ("Capture!", VoiceCommand::Capture),
            ("take a photo please", VoiceCommand::Capture),
            ("upload from gallery", VoiceCommand::Upload),
            ("show my history", VoiceCommand::History),
            ("HELP", VoiceCommand::Help),
            ("reset", VoiceCommand::Reset),
            ("let's start over", VoiceCommand::Reset),
            ("could you repeat that", VoiceCommand::Repeat),
        ];
        for (text, expected) in cases {
            assert_eq!(VoiceCommand::from_transcript(text), expected, "{text}");
        }
    }

    #[test]
    fn unrelated_speech_is_unknown() {
        assert_eq!(VoiceCommand::from_transcript("I like turtles"), VoiceCommand::Unknown);
        assert_eq!(VoiceCommand::from_transcript(""), VoiceCommand::Unknown);
        // whole words only
        assert_eq!(VoiceCommand::from_transcript("scanner"), VoiceCommand::Unknown);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_value(VoiceCommand::History).unwrap(), "history");
    }
}
