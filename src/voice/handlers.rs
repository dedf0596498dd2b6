use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    error::{ApiError, ApiResult},
    extract::ApiJson,
    state::AppState,
    upload::read_file_field,
};

use super::dto::{SpeechRequest, VoiceCommandResponse};
use super::services::VoiceCommand;

pub fn voice_routes() -> Router<AppState> {
    Router::new()
        .route("/speech", post(synthesize_speech))
        .route("/voice-command", post(voice_command))
}

/// Returns WAV audio; a 500 tells the client to fall back to on-device speech.
#[instrument(skip(state, body))]
pub async fn synthesize_speech(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SpeechRequest>,
) -> ApiResult<impl IntoResponse> {
    let text = body.text.trim();
    if text.is_empty() {
        return Err(ApiError::bad_request("Text is required"));
    }
    let audio = state
        .speech
        .synthesize(text)
        .await
        .map_err(|e| ApiError::upstream("Speech synthesis failed", e))?;
    info!(chars = text.len(), bytes = audio.len(), "speech synthesized");
    Ok(([(header::CONTENT_TYPE, "audio/wav")], audio))
}

#[instrument(skip(state, mp))]
pub async fn voice_command(
    State(state): State<AppState>,
    mut mp: Multipart,
) -> ApiResult<Json<VoiceCommandResponse>> {
    let audio = read_file_field(&mut mp, "audio")
        .await?
        .filter(|a| !a.body.is_empty())
        .ok_or_else(|| ApiError::bad_request("No audio file provided"))?;

    let filename = audio.filename_or("recording");
    let transcript = state
        .speech
        .transcribe(audio.body, &filename, &audio.content_type)
        .await
        .map_err(|e| ApiError::upstream("Transcription failed", e))?;

    let command = VoiceCommand::from_transcript(&transcript);
    info!(?command, "voice command recognised");
    Ok(Json(VoiceCommandResponse {
        transcript: transcript.trim().to_string(),
        command,
    }))
}
