// Copyright (c) 2020 Rafael Alcaraz Mercado. All rights reserved.
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or distributed
// except according to those terms.
// THE SOURCE CODE IS AVAILABLE UNDER THE ABOVE CHOSEN LICENSE "AS IS", WITH NO WARRANTIES.

//! Label subclient.

use crate::operation::Operation;
use crate::paging;
use crate::schema::{Label, LabelScope};
use crate::transport::{Request, TransportError};
use crate::HarborClient;
use futures::TryFutureExt;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("bad request")]
    BadRequest,
    #[error("unauthorized")]
    Unauthorized,
    #[error("user does not have permission to the label")]
    NoPermission,
    #[error("label not found on server side")]
    NotFound,
    #[error("label already exists")]
    AlreadyExists,
    #[error("unsupported media type")]
    UnsupportedMediaType,
    #[error("unexpected internal errors")]
    InternalErrors,
    #[error("no label provided")]
    NotProvided,
    #[error("no project ID provided for a project scoped label")]
    ProjectIdNotProvided,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub(crate) fn handle_errors(err: TransportError) -> LabelError {
    let Some((operation, status)) = err.operation_status() else {
        return LabelError::Transport(err);
    };

    match (operation, status) {
        (Operation::CreateLabel | Operation::UpdateLabel, StatusCode::CONFLICT) => {
            LabelError::AlreadyExists
        }
        (_, StatusCode::BAD_REQUEST) => LabelError::BadRequest,
        (_, StatusCode::UNAUTHORIZED) => LabelError::Unauthorized,
        (_, StatusCode::FORBIDDEN) => LabelError::NoPermission,
        (_, StatusCode::NOT_FOUND) => LabelError::NotFound,
        (_, StatusCode::UNSUPPORTED_MEDIA_TYPE) => LabelError::UnsupportedMediaType,
        (_, StatusCode::INTERNAL_SERVER_ERROR) => LabelError::InternalErrors,
        _ => LabelError::Transport(err),
    }
}

/// Operations on global and project labels.
pub struct LabelClient<'a> {
    client: &'a HarborClient,
}

impl<'a> LabelClient<'a> {
    pub(crate) fn new(client: &'a HarborClient) -> LabelClient<'a> {
        LabelClient { client }
    }

    /// Creates a global or project label.
    pub async fn new_label(&self, label: &Label) -> Result<(), LabelError> {
        if label.name.is_empty() {
            return Err(LabelError::NotProvided);
        }

        let request = Request::post(Operation::CreateLabel, &["labels"])
            .json(label)
            .expect(StatusCode::CREATED);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Returns a label by its ID.
    pub async fn get_label_by_id(&self, id: i64) -> Result<Label, LabelError> {
        let request = Request::get(Operation::GetLabelById, &["labels", &id.to_string()]);
        let response = self
            .client
            .execute(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload)
    }

    /// Lists labels of a scope. Project labels are listed per project, so
    /// `project_id` is required for [`LabelScope::Project`].
    pub async fn list_labels(
        &self,
        name: &str,
        scope: LabelScope,
        project_id: Option<i64>,
    ) -> Result<Vec<Label>, LabelError> {
        let project_id = match (scope, project_id) {
            (LabelScope::Project, None | Some(0)) => return Err(LabelError::ProjectIdNotProvided),
            (LabelScope::Project, project_id) => project_id,
            (LabelScope::Global, _) => None,
        };

        let client = self.client;
        paging::collect_pages(client.options().page, move |page| {
            let request = Request::get(Operation::ListLabels, &["labels"])
                .query_non_empty("name", name)
                .query("scope", scope.as_str())
                .query_opt("project_id", project_id)
                .page(client.options(), page);
            client.execute::<Vec<Label>>(request)
        })
        .map_err(handle_errors)
        .await
    }

    /// Updates the label with the ID carried by `label`.
    pub async fn update_label(&self, label: &Label) -> Result<(), LabelError> {
        if label.id == 0 {
            return Err(LabelError::NotProvided);
        }

        let request =
            Request::put(Operation::UpdateLabel, &["labels", &label.id.to_string()]).json(label);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Deletes a label by its ID.
    pub async fn delete_label(&self, id: i64) -> Result<(), LabelError> {
        if id == 0 {
            return Err(LabelError::NotProvided);
        }

        let request = Request::delete(Operation::DeleteLabel, &["labels", &id.to_string()]);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }
}
