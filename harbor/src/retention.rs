// Copyright (c) 2020 Rafael Alcaraz Mercado. All rights reserved.
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or distributed
// except according to those terms.
// THE SOURCE CODE IS AVAILABLE UNDER THE ABOVE CHOSEN LICENSE "AS IS", WITH NO WARRANTIES.

//! Tag retention subclient. A project links to its retention policy through
//! the `retention_id` project metadata key.

use crate::operation::Operation;
use crate::paging;
use crate::project::ProjectError;
use crate::schema::{ProjectMetadataKey, RetentionExecution, RetentionMetadata, RetentionPolicy};
use crate::transport::{Request, TransportError};
use crate::HarborClient;
use futures::TryFutureExt;
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetentionError {
    #[error("illegal format of provided ID value")]
    IllegalIdFormat,
    #[error("unauthorized")]
    Unauthorized,
    #[error("user does not have permission to the retention policy")]
    NoPermission,
    #[error("retention policy does not exist")]
    DoesNotExist,
    #[error("unexpected internal errors")]
    InternalErrors,
    #[error("no retention policy provided")]
    NotProvided,
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub(crate) fn handle_errors(err: TransportError) -> RetentionError {
    let Some((_, status)) = err.operation_status() else {
        return RetentionError::Transport(err);
    };

    match status {
        StatusCode::BAD_REQUEST => RetentionError::IllegalIdFormat,
        StatusCode::UNAUTHORIZED => RetentionError::Unauthorized,
        StatusCode::FORBIDDEN => RetentionError::NoPermission,
        StatusCode::NOT_FOUND => RetentionError::DoesNotExist,
        StatusCode::INTERNAL_SERVER_ERROR => RetentionError::InternalErrors,
        _ => RetentionError::Transport(err),
    }
}

#[derive(Serialize)]
struct RetentionExecutionRequest {
    dry_run: bool,
}

/// Operations on tag retention policies.
pub struct RetentionClient<'a> {
    client: &'a HarborClient,
}

impl<'a> RetentionClient<'a> {
    pub(crate) fn new(client: &'a HarborClient) -> RetentionClient<'a> {
        RetentionClient { client }
    }

    /// Creates a retention policy. The policy must be scoped to a project.
    pub async fn new_retention_policy(
        &self,
        policy: &RetentionPolicy,
    ) -> Result<(), RetentionError> {
        if policy.scope.is_none() {
            return Err(RetentionError::NotProvided);
        }

        let request = Request::post(Operation::CreateRetention, &["retentions"])
            .json(policy)
            .expect(StatusCode::CREATED)
            // Some Harbor versions answer 200 here.
            .tolerate(StatusCode::OK);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Returns a retention policy by its ID.
    pub async fn get_retention_policy_by_id(
        &self,
        id: i64,
    ) -> Result<RetentionPolicy, RetentionError> {
        let request = Request::get(Operation::GetRetention, &["retentions", &id.to_string()]);
        let response = self
            .client
            .execute(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload)
    }

    /// Returns the retention policy linked to a project.
    pub async fn get_retention_policy_by_project(
        &self,
        name_or_id: &str,
    ) -> Result<RetentionPolicy, RetentionError> {
        let value = match self
            .client
            .projects()
            .get_project_metadata_value(name_or_id, ProjectMetadataKey::RetentionId)
            .await
        {
            Ok(value) => value,
            Err(ProjectError::MetadataUndefined) => return Err(RetentionError::DoesNotExist),
            Err(err) => return Err(RetentionError::Project(err)),
        };

        let id = value.parse::<i64>().map_err(|_| {
            log::debug!(
                "Project {} links to retention policy {:?}",
                name_or_id,
                &value
            );
            RetentionError::DoesNotExist
        })?;
        self.get_retention_policy_by_id(id).await
    }

    /// Replaces a retention policy. The policy must carry its ID.
    pub async fn update_retention_policy(
        &self,
        policy: &RetentionPolicy,
    ) -> Result<(), RetentionError> {
        let id = match policy.id {
            Some(id) if id != 0 => id,
            _ => return Err(RetentionError::NotProvided),
        };

        let request =
            Request::put(Operation::UpdateRetention, &["retentions", &id.to_string()]).json(policy);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Disables every rule of a retention policy.
    pub async fn disable_retention_policy(
        &self,
        policy: &RetentionPolicy,
    ) -> Result<(), RetentionError> {
        let mut policy = policy.clone();
        for rule in policy.rules.iter_mut() {
            rule.disabled = true;
        }
        self.update_retention_policy(&policy).await
    }

    /// Deletes a retention policy by its ID.
    pub async fn delete_retention_policy_by_id(&self, id: i64) -> Result<(), RetentionError> {
        let request = Request::delete(Operation::DeleteRetention, &["retentions", &id.to_string()]);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Returns the rule templates and selectors retention policies can use.
    pub async fn get_retention_metadata(&self) -> Result<RetentionMetadata, RetentionError> {
        let request = Request::get(Operation::GetRetentionMetadata, &["retentions", "metadatas"]);
        let response = self
            .client
            .execute(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload)
    }

    /// Runs a retention policy now. A dry run only reports what would be deleted.
    pub async fn trigger_retention_execution(
        &self,
        id: i64,
        dry_run: bool,
    ) -> Result<(), RetentionError> {
        let request = Request::post(
            Operation::TriggerRetentionExecution,
            &["retentions", &id.to_string(), "executions"],
        )
        .json(&RetentionExecutionRequest { dry_run });
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Lists the executions of a retention policy.
    pub async fn list_retention_executions(
        &self,
        id: i64,
    ) -> Result<Vec<RetentionExecution>, RetentionError> {
        let client = self.client;
        let id = id.to_string();
        let id = id.as_str();
        paging::collect_pages(client.options().page, move |page| {
            let request = Request::get(
                Operation::ListRetentionExecutions,
                &["retentions", id, "executions"],
            )
            .page(client.options(), page);
            client.execute::<Vec<RetentionExecution>>(request)
        })
        .map_err(handle_errors)
        .await
    }
}
