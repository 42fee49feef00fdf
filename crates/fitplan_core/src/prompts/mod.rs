//! Prompt rendering for plan generation.

mod embedded;

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::Value;

use crate::error::ServiceError;
use crate::records::{PlanKind, QuizResponse, UserProfile};

const NOT_SPECIFIED: &str = "not specified";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuizAnswer {
    /// `[step N] ` or empty. Pre-rendered because handlebars treats 0 as false.
    pub step_label: String,
    pub question: String,
    pub answer: String,
}

/// Values substituted into the plan prompt templates
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PromptContext {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub height: String,
    pub weight: String,
    pub quiz_answers: Vec<QuizAnswer>,
    pub preferences: Option<String>,
}

impl PromptContext {
    pub fn new(
        profile: &UserProfile,
        responses: &[QuizResponse],
        preferences: Option<&str>,
    ) -> Self {
        Self {
            name: display_or_default(profile.name.as_deref()),
            age: display_or_default(profile.age),
            gender: display_or_default(profile.gender.as_deref()),
            height: display_or_default(profile.height),
            weight: display_or_default(profile.weight),
            quiz_answers: responses.iter().map(quiz_answer).collect(),
            preferences: preferences
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_string),
        }
    }
}

pub struct PromptRenderer {
    hbs: Handlebars<'static>,
}

impl PromptRenderer {
    pub fn new() -> Result<Self, ServiceError> {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        for kind in [PlanKind::Exercise, PlanKind::Diet] {
            let name = template_name(kind);
            let source = embedded::get_embedded(name)
                .ok_or_else(|| ServiceError::Prompt(format!("missing template {name}")))?;
            hbs.register_template_string(name, source)
                .map_err(|error| ServiceError::Prompt(error.to_string()))?;
        }
        Ok(Self { hbs })
    }

    pub fn render(&self, kind: PlanKind, context: &PromptContext) -> Result<String, ServiceError> {
        self.hbs
            .render(template_name(kind), context)
            .map_err(|error| ServiceError::Prompt(error.to_string()))
    }
}

fn template_name(kind: PlanKind) -> &'static str {
    match kind {
        PlanKind::Exercise => "exercise-plan",
        PlanKind::Diet => "diet-plan",
    }
}

fn display_or_default<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

fn quiz_answer(response: &QuizResponse) -> QuizAnswer {
    let question = if response.question_text.trim().is_empty() {
        response.question_id.clone()
    } else {
        response.question_text.trim().to_string()
    };

    QuizAnswer {
        step_label: response
            .step_number
            .map(|step| format!("[step {step}] "))
            .unwrap_or_default(),
        question,
        answer: format_response_data(&response.response_data),
    }
}

/// Flattens the opaque `responseData` document into one readable line.
fn format_response_data(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "(no answer)".to_string();
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(text)) => text,
        Ok(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Ok(Value::Null) => "(no answer)".to_string(),
        Ok(other) => other.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            user_id: "user-1".to_string(),
            name: Some("Ada".to_string()),
            age: Some(34),
            gender: None,
            height: Some(170.0),
            weight: Some(62.5),
            created_at: "t0".to_string(),
            updated_at: "t0".to_string(),
            attributes: Map::new(),
        }
    }

    fn response(question_id: &str, text: &str, data: &str, step: Option<i64>) -> QuizResponse {
        QuizResponse {
            user_id: "user-1".to_string(),
            question_id: question_id.to_string(),
            question_text: text.to_string(),
            response_data: data.to_string(),
            step_number: step,
            created_at: "t0".to_string(),
            updated_at: "t0".to_string(),
        }
    }

    #[test]
    fn renders_profile_and_quiz_answers() {
        let renderer = PromptRenderer::new().expect("templates register");
        let responses = vec![
            response("q1", "Main goal?", "\"lose weight\"", Some(1)),
            response("q2", "Equipment?", "[\"dumbbells\", \"bench\"]", None),
        ];
        let context = PromptContext::new(&profile(), &responses, Some("  no running  "));

        let prompt = renderer
            .render(PlanKind::Exercise, &context)
            .expect("prompt renders");

        assert!(prompt.contains("- Name: Ada"));
        assert!(prompt.contains("- Gender: not specified"));
        assert!(prompt.contains("- Height: 170"));
        assert!(prompt.contains("[step 1] Main goal?: lose weight"));
        assert!(prompt.contains("- Equipment?: dumbbells, bench"));
        assert!(prompt.contains("Additional preferences from the user: no running"));
        assert!(prompt.contains("\"exercises\""));
    }

    #[test]
    fn empty_quiz_still_renders_a_prompt() {
        let renderer = PromptRenderer::new().expect("templates register");
        let context = PromptContext::new(&profile(), &[], None);

        let prompt = renderer.render(PlanKind::Diet, &context).expect("prompt renders");

        assert!(prompt.contains("has not answered the nutrition questionnaire"));
        assert!(!prompt.contains("Additional preferences"));
        assert!(prompt.contains("\"dailyCalories\""));
    }

    #[test]
    fn step_zero_is_kept_in_the_prompt() {
        let renderer = PromptRenderer::new().expect("templates register");
        let responses = vec![response("intro", "Ready?", "\"yes\"", Some(0))];
        let context = PromptContext::new(&profile(), &responses, None);

        let prompt = renderer.render(PlanKind::Diet, &context).expect("prompt renders");

        assert!(prompt.contains("- [step 0] Ready?: yes"));
    }

    #[test]
    fn response_data_falls_back_to_raw_text() {
        assert_eq!(format_response_data("not json"), "not json");
        assert_eq!(format_response_data("{\"level\":3}"), "{\"level\":3}");
        assert_eq!(format_response_data(""), "(no answer)");
        assert_eq!(format_response_data("null"), "(no answer)");
    }

    #[test]
    fn question_id_stands_in_for_missing_text() {
        let answer = quiz_answer(&response("sleep-hours", " ", "7", Some(4)));
        assert_eq!(answer.question, "sleep-hours");
        assert_eq!(answer.step_label, "[step 4] ");
        assert_eq!(answer.answer, "7");
    }
}
