// Copyright (c) 2020 Rafael Alcaraz Mercado. All rights reserved.
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or distributed
// except according to those terms.
// THE SOURCE CODE IS AVAILABLE UNDER THE ABOVE CHOSEN LICENSE "AS IS", WITH NO WARRANTIES.

//! Replication subclient: policies, their executions and the tasks of an execution.

use crate::operation::Operation;
use crate::paging;
use crate::schema::{
    ReplicationExecution, ReplicationPolicy, ReplicationTask, StartReplicationExecution,
};
use crate::transport::{Request, TransportError};
use crate::HarborClient;
use futures::TryFutureExt;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplicationError {
    #[error("illegal format of provided ID value")]
    IllegalIdFormat,
    #[error("unauthorized")]
    Unauthorized,
    #[error("user does not have permission to the replication policy")]
    NoPermission,
    #[error("replication policy not found on server side")]
    NotFound,
    #[error("replication policy name already exists")]
    NameAlreadyExists,
    #[error("unsupported media type")]
    UnsupportedMediaType,
    #[error("replication policy is in use by a running execution")]
    PolicyInUse,
    #[error("unexpected internal errors")]
    InternalErrors,
    #[error("no replication policy provided")]
    NotProvided,
    #[error("no replication execution provided")]
    ExecutionNotProvided,
    #[error("id/name pair not found on server side")]
    Mismatch,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub(crate) fn handle_errors(err: TransportError) -> ReplicationError {
    let Some((operation, status)) = err.operation_status() else {
        return ReplicationError::Transport(err);
    };

    match (operation, status) {
        (
            Operation::CreateReplicationPolicy | Operation::UpdateReplicationPolicy,
            StatusCode::CONFLICT,
        ) => ReplicationError::NameAlreadyExists,
        (Operation::DeleteReplicationPolicy, StatusCode::PRECONDITION_FAILED) => {
            ReplicationError::PolicyInUse
        }
        (_, StatusCode::BAD_REQUEST) => ReplicationError::IllegalIdFormat,
        (_, StatusCode::UNAUTHORIZED) => ReplicationError::Unauthorized,
        (_, StatusCode::FORBIDDEN) => ReplicationError::NoPermission,
        (_, StatusCode::NOT_FOUND) => ReplicationError::NotFound,
        (_, StatusCode::UNSUPPORTED_MEDIA_TYPE) => ReplicationError::UnsupportedMediaType,
        (_, StatusCode::INTERNAL_SERVER_ERROR) => ReplicationError::InternalErrors,
        _ => ReplicationError::Transport(err),
    }
}

/// Operations on replication policies and executions.
pub struct ReplicationClient<'a> {
    client: &'a HarborClient,
}

impl<'a> ReplicationClient<'a> {
    pub(crate) fn new(client: &'a HarborClient) -> ReplicationClient<'a> {
        ReplicationClient { client }
    }

    /// Creates a replication policy.
    pub async fn new_replication_policy(
        &self,
        policy: &ReplicationPolicy,
    ) -> Result<(), ReplicationError> {
        if policy.name.is_empty() {
            return Err(ReplicationError::NotProvided);
        }

        let request = Request::post(
            Operation::CreateReplicationPolicy,
            &["replication", "policies"],
        )
        .json(policy)
        .expect(StatusCode::CREATED);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Returns a replication policy by its ID.
    pub async fn get_replication_policy_by_id(
        &self,
        id: i64,
    ) -> Result<ReplicationPolicy, ReplicationError> {
        let request = Request::get(
            Operation::GetReplicationPolicy,
            &["replication", "policies", &id.to_string()],
        );
        let response = self
            .client
            .execute(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload)
    }

    /// Returns the policy with exactly the given name.
    pub async fn get_replication_policy_by_name(
        &self,
        name: &str,
    ) -> Result<ReplicationPolicy, ReplicationError> {
        if name.is_empty() {
            return Err(ReplicationError::NotProvided);
        }

        self.list_replication_policies(name)
            .await?
            .into_iter()
            .find(|policy| policy.name == name)
            .ok_or(ReplicationError::NotFound)
    }

    /// Lists the policies whose name contains `name`, all of them when empty.
    pub async fn list_replication_policies(
        &self,
        name: &str,
    ) -> Result<Vec<ReplicationPolicy>, ReplicationError> {
        let client = self.client;
        paging::collect_pages(client.options().page, move |page| {
            let request =
                Request::get(Operation::ListReplicationPolicies, &["replication", "policies"])
                    .query_non_empty("name", name)
                    .page(client.options(), page);
            client.execute::<Vec<ReplicationPolicy>>(request)
        })
        .map_err(handle_errors)
        .await
    }

    /// Replaces the policy with the given ID. The stored policy must carry the same name.
    pub async fn update_replication_policy(
        &self,
        policy: &ReplicationPolicy,
        id: i64,
    ) -> Result<(), ReplicationError> {
        if policy.name.is_empty() {
            return Err(ReplicationError::NotProvided);
        }

        let stored = self.get_replication_policy_by_id(id).await?;
        if stored.name != policy.name {
            log::debug!(
                "Replication policy {} is named {} on server side, {} was given",
                id,
                &stored.name,
                &policy.name
            );
            return Err(ReplicationError::Mismatch);
        }

        let request = Request::put(
            Operation::UpdateReplicationPolicy,
            &["replication", "policies", &id.to_string()],
        )
        .json(policy);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Deletes a replication policy. Harbor refuses while executions run.
    pub async fn delete_replication_policy_by_id(&self, id: i64) -> Result<(), ReplicationError> {
        let request = Request::delete(
            Operation::DeleteReplicationPolicy,
            &["replication", "policies", &id.to_string()],
        );
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Starts a manual execution of a policy.
    pub async fn trigger_replication_execution(
        &self,
        execution: &StartReplicationExecution,
    ) -> Result<(), ReplicationError> {
        if execution.policy_id == 0 {
            return Err(ReplicationError::ExecutionNotProvided);
        }

        let request = Request::post(Operation::StartReplication, &["replication", "executions"])
            .json(execution)
            .expect(StatusCode::CREATED);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Lists executions, optionally filtered by policy, status and trigger.
    pub async fn list_replication_executions(
        &self,
        policy_id: Option<i64>,
        status: &str,
        trigger: &str,
    ) -> Result<Vec<ReplicationExecution>, ReplicationError> {
        let client = self.client;
        paging::collect_pages(client.options().page, move |page| {
            let request = Request::get(
                Operation::ListReplicationExecutions,
                &["replication", "executions"],
            )
            .query_opt("policy_id", policy_id)
            .query_non_empty("status", status)
            .query_non_empty("trigger", trigger)
            .page(client.options(), page);
            client.execute::<Vec<ReplicationExecution>>(request)
        })
        .map_err(handle_errors)
        .await
    }

    /// Returns a replication execution by its ID.
    pub async fn get_replication_execution_by_id(
        &self,
        id: i64,
    ) -> Result<ReplicationExecution, ReplicationError> {
        let request = Request::get(
            Operation::GetReplicationExecution,
            &["replication", "executions", &id.to_string()],
        );
        let response = self
            .client
            .execute(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload)
    }

    /// Stops a running replication execution.
    pub async fn stop_replication_execution(&self, id: i64) -> Result<(), ReplicationError> {
        let request = Request::put(
            Operation::StopReplication,
            &["replication", "executions", &id.to_string()],
        );
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Lists the tasks of a replication execution.
    pub async fn list_replication_tasks(
        &self,
        execution_id: i64,
    ) -> Result<Vec<ReplicationTask>, ReplicationError> {
        let client = self.client;
        let execution_id = execution_id.to_string();
        let execution_id = execution_id.as_str();
        paging::collect_pages(client.options().page, move |page| {
            let request = Request::get(
                Operation::ListReplicationTasks,
                &["replication", "executions", execution_id, "tasks"],
            )
            .page(client.options(), page);
            client.execute::<Vec<ReplicationTask>>(request)
        })
        .map_err(handle_errors)
        .await
    }
}
