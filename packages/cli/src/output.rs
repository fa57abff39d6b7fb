// ABOUTME: Terminal rendering of an analysis report
// ABOUTME: Story cards and the session summary as comfy-table tables

use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};

use figstory_core::{Priority, UserStory};

use crate::analyze::AnalysisReport;

pub fn print_report(report: &AnalysisReport) {
    println!(
        "{}",
        format!("User stories for {}", report.session.figma_file_id)
            .blue()
            .bold()
    );
    println!();

    for story in &report.session.user_stories {
        println!("{}", story_table(story));
    }

    println!("{}", "Summary".blue().bold());
    println!("{}", summary_table(report));
}

fn priority_label(priority: Priority) -> ColoredString {
    match priority {
        Priority::High => "High".red().bold(),
        Priority::Medium => "Medium".yellow(),
        Priority::Low => "Low".green(),
    }
}

fn story_table(story: &UserStory) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![story.title.clone(), String::new()]);
    table.add_row(vec!["Description".to_string(), story.description.clone()]);
    table.add_row(vec![
        "Acceptance criteria".to_string(),
        story
            .acceptance_criteria
            .iter()
            .map(|c| format!("• {}", c))
            .collect::<Vec<_>>()
            .join("\n"),
    ]);
    table.add_row(vec![
        "Priority".to_string(),
        priority_label(story.priority).to_string(),
    ]);
    table.add_row(vec!["Story points".to_string(), story.story_points.to_string()]);
    table.add_row(vec!["Persona".to_string(), story.persona.clone()]);
    table.add_row(vec!["Category".to_string(), story.category.clone()]);
    table
}

fn summary_table(report: &AnalysisReport) -> Table {
    let summary = &report.summary;
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Frames".to_string(), summary.total_frames.to_string()]);
    table.add_row(vec![
        "Selected frames".to_string(),
        summary.selected_frames.to_string(),
    ]);
    table.add_row(vec!["Stories".to_string(), summary.total_stories.to_string()]);
    table.add_row(vec![
        "Story points".to_string(),
        summary.total_story_points.to_string(),
    ]);
    table.add_row(vec![
        "Priorities (H/M/L)".to_string(),
        format!(
            "{}/{}/{}",
            summary.priorities.high, summary.priorities.medium, summary.priorities.low
        ),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_story_table_lists_criteria() {
        let story = UserStory {
            id: "story-1".to_string(),
            title: "Sign in".to_string(),
            description: "As a user, I want to sign in".to_string(),
            acceptance_criteria: vec!["Email is validated".to_string(), "Errors shown".to_string()],
            priority: Priority::High,
            story_points: 5,
            persona: "Customer".to_string(),
            category: "Authentication".to_string(),
        };

        let rendered = story_table(&story).to_string();
        assert!(rendered.contains("Sign in"));
        assert!(rendered.contains("• Email is validated"));
        assert!(rendered.contains("Authentication"));
    }
}
