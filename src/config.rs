use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub issuer: String,
    pub audience: String,
    /// Shared secret for HS256 tokens (local development).
    pub jwt_secret: Option<String>,
    /// PEM encoded RSA public key for RS256 tokens issued by the identity provider.
    pub public_key_pem: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroqConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub vision_model: String,
    pub tts_model: String,
    pub tts_voice: String,
    pub stt_model: String,
    pub timeout_secs: u64,
    pub voice_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub static_dir: Option<String>,
    pub max_upload_bytes: usize,
    pub auth: AuthConfig,
    pub groq: GroqConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let auth = AuthConfig {
            issuer: std::env::var("AUTH_ISSUER").unwrap_or_else(|_| "campus-eats".into()),
            audience: std::env::var("AUTH_AUDIENCE").unwrap_or_else(|_| "campus-eats".into()),
            jwt_secret: std::env::var("AUTH_JWT_SECRET").ok(),
            public_key_pem: std::env::var("AUTH_PUBLIC_KEY_PEM").ok(),
        };
        let groq = GroqConfig {
            api_key: std::env::var("GROQ_API_KEY").ok().filter(|k| !k.is_empty()),
            base_url: std::env::var("GROQ_BASE_URL")
                .unwrap_or_else(|_| "https://api.groq.com/openai/v1".into()),
            vision_model: std::env::var("GROQ_VISION_MODEL")
                .unwrap_or_else(|_| "meta-llama/llama-4-maverick-17b-128e-instruct".into()),
            tts_model: std::env::var("GROQ_TTS_MODEL").unwrap_or_else(|_| "playai-tts".into()),
            tts_voice: std::env::var("GROQ_TTS_VOICE").unwrap_or_else(|_| "Fritz-PlayAI".into()),
            stt_model: std::env::var("GROQ_STT_MODEL")
                .unwrap_or_else(|_| "whisper-large-v3-turbo".into()),
            timeout_secs: env_parse("GROQ_TIMEOUT_SECS", 30),
            voice_timeout_secs: env_parse("VOICE_TIMEOUT_SECS", 10),
        };
        Ok(Self {
            database_url,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_parse("APP_PORT", 5000),
            static_dir: std::env::var("STATIC_DIR").ok(),
            max_upload_bytes: env_parse::<usize>("MAX_UPLOAD_MB", 50) * 1024 * 1024,
            auth,
            groq,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
