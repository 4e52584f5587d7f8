// Copyright (c) 2020 Rafael Alcaraz Mercado. All rights reserved.
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or distributed
// except according to those terms.
// THE SOURCE CODE IS AVAILABLE UNDER THE ABOVE CHOSEN LICENSE "AS IS", WITH NO WARRANTIES.

//! Garbage collection subclient.

use crate::operation::Operation;
use crate::paging;
use crate::schema::{GcHistory, Schedule, ScheduleObj, ScheduleType};
use crate::transport::{Request, TransportError};
use crate::HarborClient;
use futures::TryFutureExt;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GcError {
    #[error("invalid schedule type")]
    InvalidSchedule,
    #[error("unauthorized")]
    Unauthorized,
    #[error("user does not have permission to garbage collection")]
    NoPermission,
    #[error("garbage collection not found on server side")]
    NotFound,
    #[error("a garbage collection is already in progress")]
    InProgress,
    #[error("unexpected internal errors")]
    InternalErrors,
    #[error("no schedule provided")]
    ScheduleNotProvided,
    #[error("no garbage collection schedule is defined")]
    ScheduleUndefined,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub(crate) fn handle_errors(err: TransportError) -> GcError {
    let Some((operation, status)) = err.operation_status() else {
        return GcError::Transport(err);
    };

    match (operation, status) {
        (Operation::CreateGcSchedule, StatusCode::CONFLICT) => GcError::InProgress,
        (_, StatusCode::BAD_REQUEST) => GcError::InvalidSchedule,
        (_, StatusCode::UNAUTHORIZED) => GcError::Unauthorized,
        (_, StatusCode::FORBIDDEN) => GcError::NoPermission,
        (_, StatusCode::NOT_FOUND) => GcError::NotFound,
        (_, StatusCode::INTERNAL_SERVER_ERROR) => GcError::InternalErrors,
        _ => GcError::Transport(err),
    }
}

const GC_PATH: [&str; 2] = ["system", "gc"];
const GC_SCHEDULE_PATH: [&str; 3] = ["system", "gc", "schedule"];

/// Operations on garbage collection runs and their schedule.
pub struct GcClient<'a> {
    client: &'a HarborClient,
}

impl<'a> GcClient<'a> {
    pub(crate) fn new(client: &'a HarborClient) -> GcClient<'a> {
        GcClient { client }
    }

    /// Creates the garbage collection schedule. A `Manual` schedule runs it right away.
    pub async fn new_garbage_collection(&self, schedule: &Schedule) -> Result<(), GcError> {
        if schedule.schedule.is_none() {
            return Err(GcError::ScheduleNotProvided);
        }

        let request = Request::post(Operation::CreateGcSchedule, &GC_SCHEDULE_PATH)
            .json(schedule)
            .expect(StatusCode::CREATED)
            .tolerate(StatusCode::OK);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Replaces the garbage collection schedule.
    pub async fn update_garbage_collection(&self, schedule: &Schedule) -> Result<(), GcError> {
        if schedule.schedule.is_none() {
            return Err(GcError::ScheduleNotProvided);
        }

        let request = Request::put(Operation::UpdateGcSchedule, &GC_SCHEDULE_PATH).json(schedule);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Returns the current schedule along with its job parameters.
    pub async fn get_garbage_collection_schedule(&self) -> Result<GcHistory, GcError> {
        let request = Request::get(Operation::GetGcSchedule, &GC_SCHEDULE_PATH);
        let response = self
            .client
            .execute::<Option<GcHistory>>(request)
            .map_err(handle_errors)
            .await?;

        response
            .payload
            .filter(|history| history.schedule.is_some())
            .ok_or(GcError::ScheduleUndefined)
    }

    /// Removes the schedule.
    pub async fn reset_garbage_collection(&self) -> Result<(), GcError> {
        let schedule = Schedule {
            schedule: Some(ScheduleObj {
                kind: ScheduleType::None,
                cron: None,
                next_scheduled_time: None,
            }),
            parameters: None,
        };
        self.update_garbage_collection(&schedule).await
    }

    /// Lists garbage collection runs, latest first.
    pub async fn list_gc_history(&self) -> Result<Vec<GcHistory>, GcError> {
        let client = self.client;
        paging::collect_pages(client.options().page, move |page| {
            let request =
                Request::get(Operation::GetGcHistory, &GC_PATH).page(client.options(), page);
            client.execute::<Vec<GcHistory>>(request)
        })
        .map_err(handle_errors)
        .await
    }

    /// Returns a single garbage collection run.
    pub async fn get_gc(&self, id: i64) -> Result<GcHistory, GcError> {
        let request = Request::get(Operation::GetGc, &["system", "gc", &id.to_string()]);
        let response = self
            .client
            .execute(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload)
    }

    /// Returns the job log of a garbage collection run.
    pub async fn get_gc_log(&self, id: i64) -> Result<String, GcError> {
        let request = Request::get(Operation::GetGcLog, &["system", "gc", &id.to_string(), "log"]);
        let response = self
            .client
            .execute_text(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload)
    }

    /// Stops a running garbage collection.
    pub async fn stop_gc(&self, id: i64) -> Result<(), GcError> {
        let request = Request::put(Operation::StopGc, &["system", "gc", &id.to_string()]);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{api, client, harbor_error, page};
    use rstest::rstest;
    use std::collections::HashMap;
    use wiremock::matchers::{any, body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn custom(cron: &str) -> Schedule {
        let mut parameters = HashMap::new();
        parameters.insert(String::from("delete_untagged"), serde_json::json!(true));
        Schedule {
            schedule: Some(ScheduleObj {
                kind: ScheduleType::Custom,
                cron: Some(cron.to_string()),
                next_scheduled_time: None,
            }),
            parameters: Some(parameters),
        }
    }

    #[rstest]
    #[case(201)]
    #[case(200)]
    #[tokio::test]
    async fn new_gc_accepts(#[case] status: u16) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(api("/system/gc/schedule")))
            .and(body_json(serde_json::json!({
                "schedule": { "type": "Custom", "cron": "0 0 * * * *" },
                "parameters": { "delete_untagged": true }
            })))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .gc()
            .new_garbage_collection(&custom("0 0 * * * *"))
            .await
            .unwrap();
    }

    #[rstest]
    #[case(400, GcError::InvalidSchedule)]
    #[case(401, GcError::Unauthorized)]
    #[case(403, GcError::NoPermission)]
    #[case(409, GcError::InProgress)]
    #[case(500, GcError::InternalErrors)]
    #[tokio::test]
    async fn new_gc_errors(#[case] status: u16, #[case] expected: GcError) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(api("/system/gc/schedule")))
            .respond_with(harbor_error(status))
            .mount(&server)
            .await;

        let err = client(&server)
            .gc()
            .new_garbage_collection(&custom("0 0 * * * *"))
            .await
            .unwrap_err();
        assert_eq!(
            std::mem::discriminant(&err),
            std::mem::discriminant(&expected)
        );
    }

    #[tokio::test]
    async fn schedule_required() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let harbor = client(&server);
        let err = harbor
            .gc()
            .new_garbage_collection(&Schedule::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GcError::ScheduleNotProvided));
        let err = harbor
            .gc()
            .update_garbage_collection(&Schedule::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GcError::ScheduleNotProvided));
    }

    #[tokio::test]
    async fn undefined_schedule() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(api("/system/gc/schedule")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = client(&server)
            .gc()
            .get_garbage_collection_schedule()
            .await
            .unwrap_err();
        assert!(matches!(err, GcError::ScheduleUndefined));
    }

    #[tokio::test]
    async fn reset_sets_none_schedule() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(api("/system/gc/schedule")))
            .and(body_json(serde_json::json!({ "schedule": { "type": "None" } })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .gc()
            .reset_garbage_collection()
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn history_and_log() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(api("/system/gc")))
            .respond_with(page(
                serde_json::json!([
                    { "id": 2, "job_status": "Success" },
                    { "id": 1, "job_status": "Error" }
                ]),
                2,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(api("/system/gc/2/log")))
            .respond_with(ResponseTemplate::new(200).set_body_string("garbage collection done"))
            .mount(&server)
            .await;

        let harbor = client(&server);
        let history = harbor.gc().list_gc_history().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].job_status, "Error");
        assert_eq!(
            harbor.gc().get_gc_log(2).await.unwrap(),
            "garbage collection done"
        );
    }

    #[tokio::test]
    async fn stop_missing_gc() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(api("/system/gc/5")))
            .respond_with(harbor_error(404))
            .mount(&server)
            .await;

        let err = client(&server).gc().stop_gc(5).await.unwrap_err();
        assert!(matches!(err, GcError::NotFound));
    }
}
