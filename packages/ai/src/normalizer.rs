// ABOUTME: Converts free-form generator output into validated user stories
// ABOUTME: Tolerates markdown fences, alternate field names and array wrapping, never fails

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use figstory_core::{generate_story_id, Priority, UserStory};

const DEFAULT_STORY_POINTS: u32 = 3;
const DEFAULT_PERSONA: &str = "End User";
const DEFAULT_CATEGORY: &str = "UI Component";
const NO_DESCRIPTION: &str = "No description provided";
const NO_CRITERIA: &str = "Criteria not specified";

/// Story fields exactly as a model may emit them, every alias kept apart
#[derive(Debug, Default, Deserialize)]
struct RawStory {
    title: Option<Value>,
    description: Option<Value>,
    story: Option<Value>,
    acceptance_criteria: Option<Value>,
    #[serde(rename = "acceptanceCriteria")]
    acceptance_criteria_camel: Option<Value>,
    criteria: Option<Value>,
    priority: Option<Value>,
    story_points: Option<Value>,
    #[serde(rename = "storyPoints")]
    story_points_camel: Option<Value>,
    points: Option<Value>,
    persona: Option<Value>,
    #[serde(rename = "userType")]
    user_type: Option<Value>,
    category: Option<Value>,
    #[serde(rename = "type")]
    kind: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoryPayload {
    Bare(Vec<Value>),
    Wrapped { user_stories: Vec<Value> },
}

impl StoryPayload {
    fn into_items(self) -> Vec<Value> {
        match self {
            StoryPayload::Bare(items) => items,
            StoryPayload::Wrapped { user_stories } => user_stories,
        }
    }
}

impl RawStory {
    fn from_value(value: Value) -> Self {
        // Non-object elements decode to an all-default story
        serde_json::from_value(value).unwrap_or_default()
    }

    fn into_story(self, index: usize) -> UserStory {
        let title = first_text(&[&self.title]).unwrap_or_else(|| format!("User Story {}", index + 1));

        let description = first_text(&[&self.description, &self.story])
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());

        let acceptance_criteria = first_list(&[&self.acceptance_criteria, &self.acceptance_criteria_camel])
            .or_else(|| criteria_fallback(&self.criteria))
            .unwrap_or_else(|| vec![NO_CRITERIA.to_string()]);

        let priority = first_text(&[&self.priority])
            .and_then(|p| Priority::parse_loose(&p))
            .unwrap_or_default();

        let story_points = [&self.story_points, &self.story_points_camel, &self.points]
            .into_iter()
            .find_map(|v| v.as_ref().filter(|v| is_truthy(v)))
            .and_then(parse_points)
            .unwrap_or(DEFAULT_STORY_POINTS);

        let persona = first_text(&[&self.persona, &self.user_type])
            .unwrap_or_else(|| DEFAULT_PERSONA.to_string());

        let category = first_text(&[&self.category, &self.kind])
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        UserStory {
            id: generate_story_id(),
            title,
            description,
            acceptance_criteria,
            priority,
            story_points,
            persona,
            category,
        }
    }
}

/// Parse raw generator text into user stories.
///
/// Structural failures (not JSON, neither an array nor a `user_stories`
/// wrapper) yield the single fallback story. Ids are always freshly generated.
pub fn parse_user_stories(raw: &str) -> Vec<UserStory> {
    let json_text = strip_code_fences(raw);

    let payload: StoryPayload = match serde_json::from_str(json_text) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Generator output is not a story array, using fallback story: {}", e);
            debug!(
                "Unparsed output (first 500 chars): {}",
                json_text.chars().take(500).collect::<String>()
            );
            return vec![fallback_story()];
        }
    };

    payload
        .into_items()
        .into_iter()
        .enumerate()
        .map(|(index, value)| RawStory::from_value(value).into_story(index))
        .collect()
}

/// The deterministic story used when output cannot be parsed
pub fn fallback_story() -> UserStory {
    UserStory {
        id: generate_story_id(),
        title: "Analyze UI Components".to_string(),
        description: "As a user, I want to interact with the UI elements shown in this design"
            .to_string(),
        acceptance_criteria: vec![
            "UI elements are properly implemented".to_string(),
            "Interactions work as expected".to_string(),
            "Design matches the mockup".to_string(),
        ],
        priority: Priority::Medium,
        story_points: DEFAULT_STORY_POINTS,
        persona: DEFAULT_PERSONA.to_string(),
        category: "UI Implementation".to_string(),
    }
}

/// Remove a surrounding ```json / ``` fence, or return the trimmed text
fn strip_code_fences(text: &str) -> &str {
    let cleaned = text.trim();
    let Some(body) = cleaned.strip_prefix("```") else {
        return cleaned;
    };

    // The language tag may be followed by a newline or just a space
    let body = body.strip_prefix("json").unwrap_or(body);
    let body = match body.rfind("```") {
        Some(end) => &body[..end],
        None => body,
    };
    body.trim()
}

/// Values a loosely-typed producer would treat as "present"
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_text(candidates: &[&Option<Value>]) -> Option<String> {
    candidates
        .iter()
        .copied()
        .filter_map(Option::as_ref)
        .find_map(value_to_text)
}

fn list_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .map(|item| value_to_text(item).unwrap_or_else(|| item.to_string()))
        .collect()
}

fn first_list(candidates: &[&Option<Value>]) -> Option<Vec<String>> {
    candidates.iter().find_map(|candidate| match candidate {
        Some(Value::Array(items)) if !items.is_empty() => Some(list_items(items)),
        _ => None,
    })
}

fn criteria_fallback(criteria: &Option<Value>) -> Option<Vec<String>> {
    match criteria {
        Some(Value::Array(items)) if !items.is_empty() => Some(list_items(items)),
        Some(value) => value_to_text(value).map(|text| vec![text]),
        None => None,
    }
}

/// Leading-integer parse: 5 -> 5, 4.7 -> 4, "8 points" -> 8, "abc" -> None
fn parse_points(value: &Value) -> Option<u32> {
    let parsed = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 1.0).map(|f| f.trunc() as u64)),
        Value::String(s) => {
            let digits: String = s
                .trim()
                .trim_start_matches('+')
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse::<u64>().ok()
        }
        _ => None,
    }?;

    u32::try_from(parsed).ok().filter(|points| *points >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    const TWO_STORIES: &str = r#"[
        {
            "title": "Sign in",
            "description": "As a customer, I want to sign in so that I can see my orders",
            "acceptance_criteria": ["Email is validated", "Errors are shown inline"],
            "priority": "High",
            "story_points": 5,
            "persona": "Customer",
            "category": "Authentication"
        },
        {
            "title": "Browse catalog",
            "description": "As a shopper, I want to browse products",
            "acceptanceCriteria": ["Products are paginated"],
            "priority": "Low",
            "storyPoints": "2",
            "persona": "Shopper",
            "category": "Catalog"
        }
    ]"#;

    #[test]
    fn test_parses_well_formed_array() {
        let stories = parse_user_stories(TWO_STORIES);
        assert_eq!(stories.len(), 2);

        assert_eq!(stories[0].title, "Sign in");
        assert_eq!(
            stories[0].acceptance_criteria,
            vec!["Email is validated", "Errors are shown inline"]
        );
        assert_eq!(stories[0].priority, Priority::High);
        assert_eq!(stories[0].story_points, 5);
        assert_eq!(stories[0].category, "Authentication");

        assert_eq!(stories[1].acceptance_criteria, vec!["Products are paginated"]);
        assert_eq!(stories[1].priority, Priority::Low);
        assert_eq!(stories[1].story_points, 2);
    }

    #[test]
    fn test_ids_are_fresh_on_every_parse() {
        let first = parse_user_stories(TWO_STORIES);
        let second = parse_user_stories(TWO_STORIES);

        assert_ne!(first[0].id, first[1].id);
        assert_ne!(first[0].id, second[0].id);
        assert_ne!(first[1].id, second[1].id);
    }

    #[test]
    fn test_model_supplied_id_is_ignored() {
        let stories = parse_user_stories(r#"[{"id": "from-model", "title": "X"}]"#);
        assert_ne!(stories[0].id, "from-model");
        assert!(stories[0].id.starts_with("story-"));
    }

    #[rstest]
    #[case("```json\n[{\"title\": \"Fenced\"}]\n```")]
    #[case("```\n[{\"title\": \"Fenced\"}]\n```")]
    #[case("```json [{\"title\": \"Fenced\"}] ```")]
    #[case("```[{\"title\": \"Fenced\"}]```")]
    #[case("  \n[{\"title\": \"Fenced\"}]  ")]
    #[case("{\"user_stories\": [{\"title\": \"Fenced\"}]}")]
    fn test_accepts_fenced_and_wrapped_output(#[case] raw: &str) {
        let stories = parse_user_stories(raw);
        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].title, "Fenced");
    }

    #[rstest]
    #[case("not json at all")]
    #[case("{\"stories\": []}")]
    #[case("42")]
    #[case("")]
    fn test_structural_failure_yields_fallback(#[case] raw: &str) {
        let stories = parse_user_stories(raw);
        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].category, "UI Implementation");
        assert_eq!(stories[0].title, "Analyze UI Components");
        assert_eq!(stories[0].acceptance_criteria.len(), 3);
    }

    #[test]
    fn test_single_line_fence_keeps_model_stories() {
        let stories =
            parse_user_stories("```json [{\"title\": \"A\", \"category\": \"Auth\"}] ```");
        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].title, "A");
        assert_eq!(stories[0].category, "Auth");
    }

    #[test]
    fn test_empty_array_yields_no_stories() {
        assert!(parse_user_stories("[]").is_empty());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let stories = parse_user_stories("[{}, \"just a string\"]");
        assert_eq!(stories.len(), 2);

        let story = &stories[1];
        assert_eq!(story.title, "User Story 2");
        assert_eq!(story.description, "No description provided");
        assert_eq!(story.acceptance_criteria, vec!["Criteria not specified"]);
        assert_eq!(story.priority, Priority::Medium);
        assert_eq!(story.story_points, 3);
        assert_eq!(story.persona, "End User");
        assert_eq!(story.category, "UI Component");
    }

    #[test]
    fn test_alternate_field_names() {
        let raw = json!([{
            "story": "As an admin, I want to ban users",
            "criteria": "Banned users cannot log in",
            "points": 8,
            "userType": "Admin",
            "type": "Moderation",
            "priority": "high"
        }])
        .to_string();

        let story = &parse_user_stories(&raw)[0];
        assert_eq!(story.description, "As an admin, I want to ban users");
        assert_eq!(story.acceptance_criteria, vec!["Banned users cannot log in"]);
        assert_eq!(story.story_points, 8);
        assert_eq!(story.persona, "Admin");
        assert_eq!(story.category, "Moderation");
        assert_eq!(story.priority, Priority::High);
    }

    #[test]
    fn test_snake_case_criteria_wins_over_camel_case() {
        let raw = json!([{
            "acceptance_criteria": ["snake"],
            "acceptanceCriteria": ["camel"]
        }])
        .to_string();
        assert_eq!(parse_user_stories(&raw)[0].acceptance_criteria, vec!["snake"]);
    }

    #[rstest]
    #[case(json!(5), 5)]
    #[case(json!("8 points"), 8)]
    #[case(json!(4.7), 4)]
    #[case(json!(100), 100)]
    #[case(json!("lots"), 3)]
    #[case(json!(0), 3)]
    #[case(json!(-2), 3)]
    #[case(json!(null), 3)]
    fn test_story_points_parsing(#[case] points: Value, #[case] expected: u32) {
        let raw = json!([{ "story_points": points }]).to_string();
        assert_eq!(parse_user_stories(&raw)[0].story_points, expected);
    }

    #[test]
    fn test_zero_story_points_falls_through_to_next_alias() {
        let raw = json!([{ "story_points": 0, "storyPoints": 2 }]).to_string();
        assert_eq!(parse_user_stories(&raw)[0].story_points, 2);
    }

    #[test]
    fn test_unknown_priority_becomes_medium() {
        let raw = json!([{ "priority": "Critical" }]).to_string();
        assert_eq!(parse_user_stories(&raw)[0].priority, Priority::Medium);
    }
}
