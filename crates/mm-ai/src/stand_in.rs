//! Deterministic offline generator, used when no credential is configured.

use crate::collaborator::Collaborator;
use crate::error::AiError;
use mm_core::model::{GeneratedIdea, GeneratedTask, MindMapState};

#[derive(Debug, Clone, Copy, Default)]
pub struct StandIn;

fn ideas_about(topic: &str) -> Vec<GeneratedIdea> {
    (1..=4)
        .map(|n| GeneratedIdea {
            text: format!("Mock idea about {topic} {n}"),
        })
        .collect()
}

fn tasks(texts: &[&str]) -> Vec<GeneratedTask> {
    texts
        .iter()
        .map(|text| GeneratedTask {
            text: (*text).to_string(),
            completed: false,
        })
        .collect()
}

impl Collaborator for StandIn {
    fn generate_ideas(&self, topic: &str) -> Result<Vec<GeneratedIdea>, AiError> {
        Ok(ideas_about(topic))
    }

    fn extract_ideas(&self, _image: &[u8], _mime_type: &str) -> Result<Vec<GeneratedIdea>, AiError> {
        Ok(ideas_about("uploaded image"))
    }

    fn generate_tasks(&self, _state: &MindMapState) -> Result<Vec<GeneratedTask>, AiError> {
        Ok(tasks(&["Review mock task 1", "Finalize mock plan"]))
    }

    fn breakdown_task(&self, _text: &str) -> Result<Vec<GeneratedTask>, AiError> {
        Ok(tasks(&["Sub-task 1", "Sub-task 2"]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ideas_name_the_topic() {
        let ideas = StandIn.generate_ideas("cats").unwrap();
        assert_eq!(ideas.len(), 4);
        assert_eq!(ideas[0].text, "Mock idea about cats 1");
        assert_eq!(ideas[3].text, "Mock idea about cats 4");
    }

    #[test]
    fn image_ideas_are_fixed() {
        let ideas = StandIn.extract_ideas(&[0x89, 0x50], "image/png").unwrap();
        assert_eq!(ideas[1].text, "Mock idea about uploaded image 2");
    }

    #[test]
    fn tasks_and_breakdown() {
        let generated = StandIn.generate_tasks(&MindMapState::default()).unwrap();
        assert_eq!(
            generated.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
            ["Review mock task 1", "Finalize mock plan"]
        );
        let steps = StandIn.breakdown_task("anything").unwrap();
        assert_eq!(steps.len(), 2);
        assert!(steps.iter().all(|t| !t.completed));
    }
}
