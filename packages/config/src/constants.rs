// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Figstory

// Server Configuration
pub const HOST: &str = "HOST";
pub const PORT: &str = "PORT";
pub const CORS_ORIGIN: &str = "CORS_ORIGIN";
pub const STATIC_DIR: &str = "STATIC_DIR";

// Figma API
pub const FIGMA_ACCESS_TOKEN: &str = "FIGMA_ACCESS_TOKEN";
pub const FIGMA_TOKEN: &str = "FIGMA_TOKEN"; // Legacy
pub const FIGMA_API_URL: &str = "FIGMA_API_URL";
pub const FIGMA_TIMEOUT_SECS: &str = "FIGMA_TIMEOUT_SECS";
pub const FIGMA_MAX_RESPONSE_MB: &str = "FIGMA_MAX_RESPONSE_MB";
pub const FIGMA_MAX_FRAMES: &str = "FIGMA_MAX_FRAMES";
pub const FIGMA_IMAGE_BATCH_SIZE: &str = "FIGMA_IMAGE_BATCH_SIZE";

// Story Generation
pub const AI_PROVIDER: &str = "AI_PROVIDER";
pub const AI_TIMEOUT_SECS: &str = "AI_TIMEOUT_SECS";
pub const OLLAMA_BASE_URL: &str = "OLLAMA_BASE_URL";
pub const OLLAMA_MODEL: &str = "OLLAMA_MODEL";
pub const OLLAMA_VISION_MODEL: &str = "OLLAMA_VISION_MODEL";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
