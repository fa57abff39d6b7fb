// ABOUTME: Built-in prompt templates for frame analysis and screen-list story drafting
// ABOUTME: Type-checked {{parameter}} substitution with required-parameter validation

use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PromptError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),
}

/// A prompt template with the parameters it must be given
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    pub id: &'static str,
    pub template: &'static str,
    pub parameters: &'static [&'static str],
}

pub const FRAME_ANALYSIS: PromptTemplate = PromptTemplate {
    id: "frame-analysis",
    template: r#"You are an expert Product Manager analyzing a UI/UX design. Look carefully at this image and identify ALL user flows, interactions, and features visible in the design.

Context: {{context}}

IMPORTANT: Analyze the visual elements you can see in the image:
- Navigation patterns and menus
- Buttons, forms, and input fields
- Data displays, lists, and tables
- Modal dialogs and overlays
- User workflows and step-by-step processes
- Any interactive elements or components

For each distinct user flow or feature you identify, create a detailed user story with:
- title: Specific, action-oriented title describing the feature
- description: As a [specific user type], I want to [specific action] so that [clear benefit]
- acceptance_criteria: 3-5 specific, testable criteria based on what you see
- priority: High/Medium/Low (High for core flows, Medium for secondary features)
- story_points: 1-8 (Fibonacci scale)
- persona: Specific user type (e.g., "Mobile App User", "Admin", "Customer")
- category: Specific component type (e.g., "Authentication", "Data Visualization", "Settings")

Focus on what you can actually SEE in the image. Be specific about visual elements and user flows.

Return ONLY a valid JSON array of user stories. No markdown formatting, no additional text."#,
    parameters: &["context"],
};

pub const SCREEN_STORIES: PromptTemplate = PromptTemplate {
    id: "screen-stories",
    template: r#"You are a Product Manager and must write user stories for these screens of an app:
{{screens}}

Format:
- As a [type of user], I want [goal], so that [benefit]
Acceptance criteria in Gherkin (Given/When/Then)."#,
    parameters: &["screens"],
};

impl PromptTemplate {
    /// Substitute `{{name}}` placeholders, failing if a required parameter is absent
    pub fn render(&self, parameters: &[(&str, &str)]) -> Result<String, PromptError> {
        let param_map: HashMap<&str, &str> = parameters.iter().copied().collect();

        for required in self.parameters {
            if !param_map.contains_key(required) {
                return Err(PromptError::MissingParameter(required.to_string()));
            }
        }

        let mut result = self.template.to_string();
        for (key, value) in parameters {
            let placeholder = format!("{{{{{}}}}}", key);
            result = result.replace(&placeholder, value);
        }

        Ok(result)
    }
}

/// Prompt for one frame image, given its context string
pub fn frame_analysis_prompt(context: &str) -> String {
    // The only placeholder is always supplied
    FRAME_ANALYSIS
        .render(&[("context", context)])
        .unwrap_or_else(|_| FRAME_ANALYSIS.template.to_string())
}

/// Text-only prompt listing screen names, one per line
pub fn screen_stories_prompt(screens: &[String]) -> String {
    let joined = screens.join("\n");
    SCREEN_STORIES
        .render(&[("screens", &joined)])
        .unwrap_or_else(|_| SCREEN_STORIES.template.to_string())
}
