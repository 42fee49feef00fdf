use std::collections::HashMap;
use std::future::Future;

use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use fitplan_core::config::{
    ServiceConfig, DIET_PLAN_TABLE_VAR, EXERCISE_PLAN_TABLE_VAR, QUIZ_RESPONSE_TABLE_VAR,
    USER_PROFILE_TABLE_VAR,
};
use fitplan_core::error::StoreError;
use fitplan_core::records::{
    DietPlan, ExercisePlan, QuizResponse, UserProfile, PLAN_ID_ATTRIBUTE, USER_ID_ATTRIBUTE,
};
use fitplan_core::update_expression::FieldUpdate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::record_store::{PlanStore, ProfileStore};

type Item = HashMap<String, AttributeValue>;

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

fn backend_error(action: &str, table: &str, error: impl std::error::Error) -> StoreError {
    StoreError::Backend(format!(
        "failed to {action} on table {table}: {}",
        DisplayErrorContext(error)
    ))
}

fn string_key(value: &str) -> AttributeValue {
    AttributeValue::S(value.to_string())
}

/// One DynamoDB table whose partition key is `userId`. The table name is
/// checked on every call, so a resolver only needs the tables its field
/// touches.
#[derive(Clone)]
struct Table {
    client: aws_sdk_dynamodb::Client,
    name: String,
    variable: &'static str,
}

impl Table {
    fn new(client: &aws_sdk_dynamodb::Client, name: &str, variable: &'static str) -> Self {
        Self {
            client: client.clone(),
            name: name.trim().to_string(),
            variable,
        }
    }

    fn name(&self) -> Result<&str, StoreError> {
        if self.name.is_empty() {
            return Err(StoreError::Misconfigured(self.variable));
        }
        Ok(&self.name)
    }

    fn get<T: DeserializeOwned>(&self, key: Item) -> Result<Option<T>, StoreError> {
        let name = self.name()?;
        debug!(table = %name, "get_item");
        let output = block_on(
            self.client
                .get_item()
                .table_name(name)
                .set_key(Some(key))
                .send(),
        )
        .map_err(|error| backend_error("get item", name, error))?;

        output.item.map(|item| decode(name, item)).transpose()
    }

    fn put<T: Serialize>(&self, value: &T, condition: Option<&str>) -> Result<(), StoreError> {
        let name = self.name()?;
        debug!(table = %name, conditional = condition.is_some(), "put_item");
        let item: Item = serde_dynamo::to_item(value)
            .map_err(|error| StoreError::Backend(format!("failed to encode item: {error}")))?;

        let result = block_on(
            self.client
                .put_item()
                .table_name(name)
                .set_item(Some(item))
                .set_condition_expression(condition.map(str::to_string))
                .send(),
        );

        match result {
            Ok(_) => Ok(()),
            Err(error)
                if error
                    .as_service_error()
                    .is_some_and(|service| service.is_conditional_check_failed_exception()) =>
            {
                Err(StoreError::ConditionFailed)
            }
            Err(error) => Err(backend_error("put item", name, error)),
        }
    }

    /// Reads the whole `userId` partition, following pagination. With
    /// `newest_only` set, reads the single item with the greatest sort key.
    fn query<T: DeserializeOwned>(
        &self,
        user_id: &str,
        newest_only: bool,
    ) -> Result<Vec<T>, StoreError> {
        let name = self.name()?;
        debug!(table = %name, newest_only, "query");
        let mut records = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let mut request = self
                .client
                .query()
                .table_name(name)
                .key_condition_expression("#pk = :pk")
                .expression_attribute_names("#pk", USER_ID_ATTRIBUTE)
                .expression_attribute_values(":pk", string_key(user_id))
                .set_exclusive_start_key(start_key.take());
            if newest_only {
                request = request.scan_index_forward(false).limit(1);
            }

            let output =
                block_on(request.send()).map_err(|error| backend_error("query", name, error))?;
            for item in output.items.unwrap_or_default() {
                records.push(decode(name, item)?);
            }

            match output.last_evaluated_key {
                Some(key) if !newest_only => start_key = Some(key),
                _ => break,
            }
        }

        Ok(records)
    }
}

fn decode<T: DeserializeOwned>(table: &str, item: Item) -> Result<T, StoreError> {
    serde_dynamo::from_item(item)
        .map_err(|error| StoreError::Backend(format!("invalid item in table {table}: {error}")))
}

pub struct DynamoProfileStore {
    profiles: Table,
    quiz_responses: Table,
}

impl DynamoProfileStore {
    pub fn new(client: &aws_sdk_dynamodb::Client, config: &ServiceConfig) -> Self {
        Self {
            profiles: Table::new(client, &config.user_profile_table, USER_PROFILE_TABLE_VAR),
            quiz_responses: Table::new(
                client,
                &config.quiz_response_table,
                QUIZ_RESPONSE_TABLE_VAR,
            ),
        }
    }
}

impl ProfileStore for DynamoProfileStore {
    fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let key = HashMap::from([(USER_ID_ATTRIBUTE.to_string(), string_key(user_id))]);
        self.profiles.get(key)
    }

    fn create_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.profiles.put(profile, Some("attribute_not_exists(userId)"))
    }

    fn update_profile(
        &self,
        user_id: &str,
        update: &FieldUpdate,
    ) -> Result<UserProfile, StoreError> {
        let table = &self.profiles;
        let name = table.name()?;
        let mut request = table
            .client
            .update_item()
            .table_name(name)
            .key(USER_ID_ATTRIBUTE, string_key(user_id))
            .update_expression(update.expression())
            .condition_expression("attribute_exists(#key)")
            .expression_attribute_names("#key", USER_ID_ATTRIBUTE)
            .return_values(ReturnValue::AllNew);
        for (placeholder, attribute) in update.attribute_names() {
            request = request.expression_attribute_names(placeholder, attribute);
        }
        for (placeholder, value) in update.attribute_values() {
            let encoded: AttributeValue =
                serde_dynamo::to_attribute_value(value).map_err(|error| {
                    StoreError::Backend(format!("failed to encode {placeholder}: {error}"))
                })?;
            request = request.expression_attribute_values(placeholder, encoded);
        }

        debug!(table = %name, fields = update.assignments().len(), "update_item");
        match block_on(request.send()) {
            Ok(output) => {
                let item = output.attributes.ok_or_else(|| {
                    StoreError::Backend("update returned no attributes".to_string())
                })?;
                decode(name, item)
            }
            Err(error)
                if error
                    .as_service_error()
                    .is_some_and(|service| service.is_conditional_check_failed_exception()) =>
            {
                Err(StoreError::ConditionFailed)
            }
            Err(error) => Err(backend_error("update item", name, error)),
        }
    }

    fn query_quiz_responses(&self, user_id: &str) -> Result<Vec<QuizResponse>, StoreError> {
        self.quiz_responses.query(user_id, false)
    }

    fn put_quiz_response(&self, response: &QuizResponse) -> Result<(), StoreError> {
        self.quiz_responses.put(response, None)
    }
}

pub struct DynamoPlanStore {
    exercise_plans: Table,
    diet_plans: Table,
}

impl DynamoPlanStore {
    pub fn new(client: &aws_sdk_dynamodb::Client, config: &ServiceConfig) -> Self {
        Self {
            exercise_plans: Table::new(
                client,
                &config.exercise_plan_table,
                EXERCISE_PLAN_TABLE_VAR,
            ),
            diet_plans: Table::new(client, &config.diet_plan_table, DIET_PLAN_TABLE_VAR),
        }
    }
}

fn plan_key(user_id: &str, plan_id: &str) -> Item {
    HashMap::from([
        (USER_ID_ATTRIBUTE.to_string(), string_key(user_id)),
        (PLAN_ID_ATTRIBUTE.to_string(), string_key(plan_id)),
    ])
}

impl PlanStore for DynamoPlanStore {
    fn get_exercise_plan(
        &self,
        user_id: &str,
        plan_id: &str,
    ) -> Result<Option<ExercisePlan>, StoreError> {
        self.exercise_plans.get(plan_key(user_id, plan_id))
    }

    fn latest_exercise_plan(&self, user_id: &str) -> Result<Option<ExercisePlan>, StoreError> {
        Ok(self.exercise_plans.query(user_id, true)?.into_iter().next())
    }

    fn query_exercise_plans(&self, user_id: &str) -> Result<Vec<ExercisePlan>, StoreError> {
        self.exercise_plans.query(user_id, false)
    }

    fn put_exercise_plan(&self, plan: &ExercisePlan) -> Result<(), StoreError> {
        self.exercise_plans.put(plan, None)
    }

    fn get_diet_plan(&self, user_id: &str, plan_id: &str) -> Result<Option<DietPlan>, StoreError> {
        self.diet_plans.get(plan_key(user_id, plan_id))
    }

    fn latest_diet_plan(&self, user_id: &str) -> Result<Option<DietPlan>, StoreError> {
        Ok(self.diet_plans.query(user_id, true)?.into_iter().next())
    }

    fn query_diet_plans(&self, user_id: &str) -> Result<Vec<DietPlan>, StoreError> {
        self.diet_plans.query(user_id, false)
    }

    fn put_diet_plan(&self, plan: &DietPlan) -> Result<(), StoreError> {
        self.diet_plans.put(plan, None)
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_dynamodb::config::{BehaviorVersion, Region};

    use super::*;

    fn offline_client() -> aws_sdk_dynamodb::Client {
        let config = aws_sdk_dynamodb::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        aws_sdk_dynamodb::Client::from_conf(config)
    }

    #[test]
    fn profile_reads_need_only_the_profile_table() {
        let config = ServiceConfig {
            user_profile_table: " ".to_string(),
            ..ServiceConfig::default()
        };
        let profiles = DynamoProfileStore::new(&offline_client(), &config);

        assert_eq!(
            profiles.get_profile("user-1"),
            Err(StoreError::Misconfigured(USER_PROFILE_TABLE_VAR))
        );
        assert_eq!(
            profiles.query_quiz_responses("user-1"),
            Err(StoreError::Misconfigured(QUIZ_RESPONSE_TABLE_VAR))
        );
    }

    #[test]
    fn missing_plan_table_is_reported_per_table() {
        let config = ServiceConfig {
            exercise_plan_table: "exercise-plans".to_string(),
            ..ServiceConfig::default()
        };
        let plans = DynamoPlanStore::new(&offline_client(), &config);

        assert_eq!(
            plans.latest_diet_plan("user-1"),
            Err(StoreError::Misconfigured(DIET_PLAN_TABLE_VAR))
        );
        assert_eq!(
            plans.put_diet_plan(&DietPlan::from_generated(
                "user-1",
                "p1",
                "t0",
                &serde_json::json!({})
            )),
            Err(StoreError::Misconfigured(DIET_PLAN_TABLE_VAR))
        );
    }
}
