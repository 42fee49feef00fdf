use fitplan_core::contract::{
    CreateUserProfileInput, SaveQuizResponseInput, UpdateUserProfileInput,
};
use fitplan_core::error::{ServiceError, StoreError};
use fitplan_core::records::{QuizResponse, UserProfile, USER_ID_ATTRIBUTE};
use fitplan_core::update_expression::FieldUpdate;
use tracing::info;

use super::RequestContext;
use crate::adapters::record_store::ProfileStore;

const PROFILE_ENTITY: &str = "UserProfile";

pub fn get_profile(
    store: &dyn ProfileStore,
    user_id: &str,
) -> Result<Option<UserProfile>, ServiceError> {
    Ok(store.get_profile(require_user_id(user_id)?)?)
}

pub fn create_profile(
    store: &dyn ProfileStore,
    input: CreateUserProfileInput,
    context: &RequestContext,
) -> Result<UserProfile, ServiceError> {
    require_user_id(&input.user_id)?;
    let profile = UserProfile::from_input(input, &context.event_time);

    match store.create_profile(&profile) {
        Ok(()) => {
            info!(component = "profiles", event = "profile_created", user_id = %profile.user_id);
            Ok(profile)
        }
        Err(StoreError::ConditionFailed) => Err(ServiceError::AlreadyExists {
            entity: PROFILE_ENTITY,
            key: format!("userId={}", profile.user_id),
        }),
        Err(error) => Err(error.into()),
    }
}

pub fn update_profile(
    store: &dyn ProfileStore,
    input: UpdateUserProfileInput,
    context: &RequestContext,
) -> Result<UserProfile, ServiceError> {
    let user_id = require_user_id(&input.user_id)?;
    let update = FieldUpdate::from_fields(&input.fields, USER_ID_ATTRIBUTE, &context.event_time);

    match store.update_profile(user_id, &update) {
        Ok(profile) => {
            info!(
                component = "profiles",
                event = "profile_updated",
                user_id = %user_id,
                fields = update.assignments().len()
            );
            Ok(profile)
        }
        Err(StoreError::ConditionFailed) => Err(ServiceError::NotFound {
            entity: PROFILE_ENTITY,
            key: format!("userId={user_id}"),
        }),
        Err(error) => Err(error.into()),
    }
}

/// Responses in the order they were saved. Ties keep the table's
/// `questionId` order.
pub fn get_quiz_responses(
    store: &dyn ProfileStore,
    user_id: &str,
) -> Result<Vec<QuizResponse>, ServiceError> {
    let mut responses = store.query_quiz_responses(require_user_id(user_id)?)?;
    responses.sort_by(|left, right| left.created_at.cmp(&right.created_at));
    Ok(responses)
}

pub fn save_quiz_response(
    store: &dyn ProfileStore,
    input: SaveQuizResponseInput,
    context: &RequestContext,
) -> Result<QuizResponse, ServiceError> {
    require_user_id(&input.user_id)?;
    if input.question_id.trim().is_empty() {
        return Err(ServiceError::InvalidArguments(
            "questionId cannot be empty".to_string(),
        ));
    }

    let response = QuizResponse::from_input(input, &context.event_time);
    store.put_quiz_response(&response)?;
    Ok(response)
}

pub(crate) fn require_user_id(user_id: &str) -> Result<&str, ServiceError> {
    if user_id.trim().is_empty() {
        return Err(ServiceError::InvalidArguments(
            "userId cannot be empty".to_string(),
        ));
    }
    Ok(user_id)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::adapters::memory::InMemoryStore;

    fn create_input(user_id: &str) -> CreateUserProfileInput {
        serde_json::from_value(json!({
            "userId": user_id,
            "name": "Ada",
            "age": 34,
            "gender": "female",
            "height": 170.0,
            "weight": 62.5
        }))
        .expect("input should parse")
    }

    fn quiz_input(question_id: &str, data: &str) -> SaveQuizResponseInput {
        SaveQuizResponseInput {
            user_id: "user-1".to_string(),
            question_id: question_id.to_string(),
            question_text: Some(format!("Question {question_id}")),
            response_data: data.to_string(),
            step_number: Some(1),
        }
    }

    #[test]
    fn created_profile_is_readable_with_timestamps() {
        let store = InMemoryStore::new();
        let created = create_profile(&store, create_input("user-1"), &RequestContext::new("t0"))
            .expect("create should succeed");

        let fetched = get_profile(&store, "user-1")
            .expect("get should succeed")
            .expect("profile should exist");

        assert_eq!(fetched, created);
        assert_eq!(fetched.name.as_deref(), Some("Ada"));
        assert_eq!(fetched.age, Some(34));
        assert_eq!(fetched.created_at, "t0");
        assert_eq!(fetched.updated_at, "t0");
    }

    #[test]
    fn second_create_fails_with_already_exists() {
        let store = InMemoryStore::new();
        create_profile(&store, create_input("user-1"), &RequestContext::new("t0"))
            .expect("first create should succeed");

        let error = create_profile(&store, create_input("user-1"), &RequestContext::new("t1"))
            .expect_err("second create should fail");

        assert_eq!(error.error_type(), "AlreadyExists");
        let stored = get_profile(&store, "user-1").expect("get").expect("profile");
        assert_eq!(stored.created_at, "t0");
    }

    #[test]
    fn partial_update_keeps_absent_fields_and_refreshes_updated_at() {
        let store = InMemoryStore::new();
        create_profile(&store, create_input("user-1"), &RequestContext::new("t0"))
            .expect("create should succeed");
        let input: UpdateUserProfileInput = serde_json::from_value(json!({
            "userId": "user-1",
            "weight": 60.0,
            "name": null,
            "trainingDays": 4
        }))
        .expect("input should parse");

        let updated = update_profile(&store, input, &RequestContext::new("t1"))
            .expect("update should succeed");

        assert_eq!(updated.weight, Some(60.0));
        assert_eq!(updated.name.as_deref(), Some("Ada"));
        assert_eq!(updated.gender.as_deref(), Some("female"));
        assert_eq!(updated.created_at, "t0");
        assert_eq!(updated.updated_at, "t1");
        assert_eq!(updated.attributes.get("trainingDays"), Some(&json!(4)));
    }

    #[test]
    fn update_with_conflicting_type_keeps_profile_readable() {
        let store = InMemoryStore::new();
        create_profile(&store, create_input("user-1"), &RequestContext::new("t0"))
            .expect("create should succeed");
        let input: UpdateUserProfileInput =
            serde_json::from_value(json!({"userId": "user-1", "age": "thirty"})).expect("input");

        let updated = update_profile(&store, input, &RequestContext::new("t1"))
            .expect("update should succeed");
        let fetched = get_profile(&store, "user-1")
            .expect("get should succeed")
            .expect("profile should exist");

        assert_eq!(fetched, updated);
        assert_eq!(fetched.age, None);
        assert_eq!(fetched.attributes.get("age"), Some(&json!("thirty")));
        assert_eq!(fetched.name.as_deref(), Some("Ada"));
        let output = serde_json::to_value(&fetched).expect("profile serializes");
        assert_eq!(output["age"], "thirty");
        assert_eq!(output["updatedAt"], "t1");
    }

    #[test]
    fn nested_object_and_array_values_are_written_verbatim() {
        let store = InMemoryStore::new();
        create_profile(&store, create_input("user-1"), &RequestContext::new("t0"))
            .expect("create should succeed");
        let goals = json!({"primary": "strength", "targets": {"squat": 100}});
        let injuries = json!(["left knee", {"area": "shoulder", "since": 2024}]);
        let input: UpdateUserProfileInput = serde_json::from_value(json!({
            "userId": "user-1",
            "goals": goals,
            "injuries": injuries
        }))
        .expect("input should parse");

        update_profile(&store, input, &RequestContext::new("t1")).expect("update should succeed");
        let fetched = get_profile(&store, "user-1")
            .expect("get should succeed")
            .expect("profile should exist");

        assert_eq!(fetched.attributes.get("goals"), Some(&goals));
        assert_eq!(fetched.attributes.get("injuries"), Some(&injuries));
        assert_eq!(fetched.age, Some(34));
    }

    #[test]
    fn typed_field_recovers_after_a_well_typed_update() {
        let store = InMemoryStore::new();
        create_profile(&store, create_input("user-1"), &RequestContext::new("t0"))
            .expect("create should succeed");
        for (age, time) in [(json!("unknown"), "t1"), (json!(35), "t2")] {
            let input: UpdateUserProfileInput =
                serde_json::from_value(json!({"userId": "user-1", "age": age})).expect("input");
            update_profile(&store, input, &RequestContext::new(time)).expect("update");
        }

        let fetched = get_profile(&store, "user-1").expect("get").expect("profile");

        assert_eq!(fetched.age, Some(35));
        assert!(!fetched.attributes.contains_key("age"));
    }

    #[test]
    fn update_of_missing_profile_is_not_found() {
        let store = InMemoryStore::new();
        let input: UpdateUserProfileInput =
            serde_json::from_value(json!({"userId": "ghost", "age": 40})).expect("input");

        let error = update_profile(&store, input, &RequestContext::new("t1"))
            .expect_err("update should fail");

        assert_eq!(error.error_type(), "NotFound");
    }

    #[test]
    fn quiz_responses_return_saved_set_in_insertion_order() {
        let store = InMemoryStore::new();
        save_quiz_response(&store, quiz_input("q9", "\"a\""), &RequestContext::new("t1"))
            .expect("save q9");
        save_quiz_response(&store, quiz_input("q1", "\"b\""), &RequestContext::new("t2"))
            .expect("save q1");
        save_quiz_response(&store, quiz_input("q9", "\"c\""), &RequestContext::new("t3"))
            .expect("overwrite q9");

        let responses = get_quiz_responses(&store, "user-1").expect("query should succeed");

        let ids: Vec<&str> = responses.iter().map(|r| r.question_id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q9"]);
        assert_eq!(responses[1].response_data, "\"c\"");
    }

    #[test]
    fn unknown_user_has_no_quiz_responses() {
        let store = InMemoryStore::new();
        assert!(get_quiz_responses(&store, "nobody")
            .expect("query should succeed")
            .is_empty());
        assert_eq!(get_profile(&store, "nobody").expect("get should succeed"), None);
    }

    #[test]
    fn blank_user_id_is_rejected() {
        let store = InMemoryStore::new();
        let error = get_profile(&store, " ").expect_err("blank id should fail");
        assert_eq!(error.error_type(), "InvalidArguments");
    }
}
