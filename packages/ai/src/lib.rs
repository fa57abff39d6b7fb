// ABOUTME: Story generation for imported design frames
// ABOUTME: Local and cloud generator backends, prompt templates and story normalization

pub mod analyzer;
pub mod normalizer;
pub mod ollama;
pub mod openai;
pub mod prompts;
pub mod service;

pub use analyzer::{frame_context, FrameAnalyzer};
pub use normalizer::{fallback_story, parse_user_stories};
pub use ollama::OllamaGenerator;
pub use openai::OpenAiGenerator;
pub use prompts::{frame_analysis_prompt, screen_stories_prompt, PromptError, PromptTemplate};
pub use service::{
    build_generator, AIServiceError, AIServiceResult, AiProvider, GenerationConfig,
    StoryGenerator,
};
