// Copyright (c) 2020 Rafael Alcaraz Mercado. All rights reserved.
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or distributed
// except according to those terms.
// THE SOURCE CODE IS AVAILABLE UNDER THE ABOVE CHOSEN LICENSE "AS IS", WITH NO WARRANTIES.

//! Quota subclient.

use crate::operation::Operation;
use crate::paging;
use crate::schema::{
    Quota, QuotaUpdateReq, ResourceList, QUOTA_REFERENCE_PROJECT, RESOURCE_STORAGE,
};
use crate::transport::{Request, TransportError};
use crate::{ClientOptions, HarborClient};
use futures::TryFutureExt;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuotaError {
    #[error("illegal format of provided ID value")]
    IllegalIdFormat,
    #[error("unauthorized")]
    Unauthorized,
    #[error("user does not have permission to the quota")]
    NoPermission,
    #[error("quota not found on server side")]
    UnknownResource,
    #[error("unexpected internal errors")]
    InternalErrors,
    #[error("quota reference not found")]
    RefNotFound,
    #[error("invalid storage limit: {0} (use -1 for unlimited)")]
    InvalidLimit(i64),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub(crate) fn handle_errors(err: TransportError) -> QuotaError {
    let Some((_, status)) = err.operation_status() else {
        return QuotaError::Transport(err);
    };

    match status {
        StatusCode::BAD_REQUEST => QuotaError::IllegalIdFormat,
        StatusCode::UNAUTHORIZED => QuotaError::Unauthorized,
        StatusCode::FORBIDDEN => QuotaError::NoPermission,
        StatusCode::NOT_FOUND => QuotaError::UnknownResource,
        StatusCode::INTERNAL_SERVER_ERROR => QuotaError::InternalErrors,
        _ => QuotaError::Transport(err),
    }
}

/// Operations on resource quotas.
pub struct QuotaClient<'a> {
    client: &'a HarborClient,
}

impl<'a> QuotaClient<'a> {
    pub(crate) fn new(client: &'a HarborClient) -> QuotaClient<'a> {
        QuotaClient { client }
    }

    /// Lists quotas, optionally restricted to a reference type (e.g. "project")
    /// and a reference ID. Empty filters are not sent.
    pub async fn list_quotas(
        &self,
        reference: &str,
        reference_id: &str,
    ) -> Result<Vec<Quota>, QuotaError> {
        self.list(reference, reference_id, self.client.options()).await
    }

    async fn list(
        &self,
        reference: &str,
        reference_id: &str,
        options: &ClientOptions,
    ) -> Result<Vec<Quota>, QuotaError> {
        let client = self.client;
        paging::collect_pages(options.page, move |page| {
            let request = Request::get(Operation::ListQuotas, &["quotas"])
                .query_non_empty("reference", reference)
                .query_non_empty("reference_id", reference_id)
                .page(options, page);
            client.execute::<Vec<Quota>>(request)
        })
        .map_err(handle_errors)
        .await
    }

    /// Returns a quota by its ID.
    pub async fn get_quota_by_id(&self, id: i64) -> Result<Quota, QuotaError> {
        let request = Request::get(Operation::GetQuota, &["quotas", &id.to_string()]);
        let response = self
            .client
            .execute(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload)
    }

    /// Returns the quota attached to a project.
    pub async fn get_quota_by_project_id(&self, project_id: i64) -> Result<Quota, QuotaError> {
        let options = self.client.options().lookup();
        let quotas = self
            .list(QUOTA_REFERENCE_PROJECT, &project_id.to_string(), &options)
            .await?;
        quotas.into_iter().next().ok_or(QuotaError::RefNotFound)
    }

    /// Sets the storage limit of a project in bytes. `-1` removes the limit.
    pub async fn update_storage_quota_by_project_id(
        &self,
        project_id: i64,
        limit: i64,
    ) -> Result<(), QuotaError> {
        if limit < -1 {
            return Err(QuotaError::InvalidLimit(limit));
        }

        let quota = self.get_quota_by_project_id(project_id).await?;
        log::debug!(
            "Setting storage quota {} of project {} to {}",
            quota.id,
            project_id,
            limit
        );

        let mut hard = ResourceList::new();
        hard.insert(RESOURCE_STORAGE.to_string(), limit);
        let request = Request::put(Operation::UpdateQuota, &["quotas", &quota.id.to_string()])
            .json(&QuotaUpdateReq { hard });
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }
}
