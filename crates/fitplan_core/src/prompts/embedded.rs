//! Prompt templates compiled into the binary.

pub const EXERCISE_PLAN: &str = r#"You are a certified personal trainer designing a weekly exercise plan.

User profile:
- Name: {{name}}
- Age: {{age}}
- Gender: {{gender}}
- Height: {{height}}
- Weight: {{weight}}

{{#if quiz_answers}}Questionnaire answers:
{{#each quiz_answers}}- {{step_label}}{{question}}: {{answer}}
{{/each}}{{else}}The user has not answered the fitness questionnaire yet. Base the plan on the profile alone.
{{/if}}
{{#if preferences}}Additional preferences from the user: {{preferences}}
{{/if}}
Respond with a single JSON object and nothing else, using exactly this shape:
{
  "title": "short plan title",
  "description": "two or three sentences describing the plan",
  "exercises": [
    {"name": "exercise name", "sets": 3, "reps": "8-12", "duration": "optional duration", "day": "Monday", "notes": "form cues"}
  ]
}
"#;

pub const DIET_PLAN: &str = r#"You are a registered dietitian designing a daily meal plan.

User profile:
- Name: {{name}}
- Age: {{age}}
- Gender: {{gender}}
- Height: {{height}}
- Weight: {{weight}}

{{#if quiz_answers}}Questionnaire answers:
{{#each quiz_answers}}- {{step_label}}{{question}}: {{answer}}
{{/each}}{{else}}The user has not answered the nutrition questionnaire yet. Base the plan on the profile alone.
{{/if}}
{{#if preferences}}Additional preferences from the user: {{preferences}}
{{/if}}
Respond with a single JSON object and nothing else, using exactly this shape:
{
  "title": "short plan title",
  "dailyCalories": 2000,
  "meals": [
    {"name": "Breakfast", "description": "what to eat", "calories": 450, "ingredients": ["oats", "berries"]}
  ],
  "dietaryRestrictions": ["restriction"]
}
"#;

pub fn get_embedded(name: &str) -> Option<&'static str> {
    match name {
        "exercise-plan" => Some(EXERCISE_PLAN),
        "diet-plan" => Some(DIET_PLAN),
        _ => None,
    }
}
