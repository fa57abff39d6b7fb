// ABOUTME: Default values for every recognised configuration option

pub const HOST: &str = "127.0.0.1";
pub const PORT: u16 = 3000;
pub const CORS_ORIGIN: &str = "http://localhost:3000";

pub const FIGMA_API_URL: &str = "https://api.figma.com/v1";
pub const FIGMA_TIMEOUT_SECS: u64 = 30;
pub const FIGMA_MAX_RESPONSE_MB: u64 = 50;
/// Declared sizes above this only produce a warning
pub const FIGMA_LARGE_RESPONSE_MB: u64 = 10;
pub const FIGMA_MAX_FRAMES: usize = 50;
pub const FIGMA_IMAGE_BATCH_SIZE: usize = 10;
/// Tree depth requested when falling back to a metadata-only fetch
pub const FIGMA_METADATA_DEPTH: u32 = 2;

pub const AI_PROVIDER: &str = "ollama";
pub const AI_TIMEOUT_SECS: u64 = 300;
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const OLLAMA_MODEL: &str = "llama3";
pub const OLLAMA_VISION_MODEL: &str = "llava";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const OPENAI_MODEL: &str = "gpt-4o-mini";
