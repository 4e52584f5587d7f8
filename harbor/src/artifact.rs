// Copyright (c) 2020 Rafael Alcaraz Mercado. All rights reserved.
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or distributed
// except according to those terms.
// THE SOURCE CODE IS AVAILABLE UNDER THE ABOVE CHOSEN LICENSE "AS IS", WITH NO WARRANTIES.

//! Artifact subclient: artifacts of a repository, their tags and labels.
//!
//! Repository names may contain slashes (`tools/busybox`). Harbor expects them
//! escaped twice in the path, so they are escaped here once and the transport
//! escapes the segment again.

use crate::operation::Operation;
use crate::paging;
use crate::schema::{Artifact, Label, Tag};
use crate::transport::{Request, TransportError};
use crate::HarborClient;
use futures::TryFutureExt;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("bad request")]
    BadRequest,
    #[error("unauthorized")]
    Unauthorized,
    #[error("user does not have permission to the artifact")]
    NoPermission,
    #[error("artifact not found on server side")]
    NotFound,
    #[error("conflicting artifact request")]
    Conflict,
    #[error("tag already exists")]
    TagAlreadyExists,
    #[error("label already added to the artifact")]
    LabelAlreadyAdded,
    #[error("unexpected internal errors")]
    InternalErrors,
    #[error("no project, repository or reference provided")]
    NotProvided,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub(crate) fn handle_errors(err: TransportError) -> ArtifactError {
    let Some((operation, status)) = err.operation_status() else {
        return ArtifactError::Transport(err);
    };

    match (operation, status) {
        (Operation::CreateTag, StatusCode::CONFLICT) => ArtifactError::TagAlreadyExists,
        (Operation::AddLabel, StatusCode::CONFLICT) => ArtifactError::LabelAlreadyAdded,
        (_, StatusCode::BAD_REQUEST) => ArtifactError::BadRequest,
        (_, StatusCode::UNAUTHORIZED) => ArtifactError::Unauthorized,
        (_, StatusCode::FORBIDDEN) => ArtifactError::NoPermission,
        (_, StatusCode::NOT_FOUND) => ArtifactError::NotFound,
        (_, StatusCode::CONFLICT) => ArtifactError::Conflict,
        (_, StatusCode::INTERNAL_SERVER_ERROR) => ArtifactError::InternalErrors,
        _ => ArtifactError::Transport(err),
    }
}

/// Checks the project and repository are set and escapes the repository name.
fn repository_segment(project: &str, repository: &str) -> Result<String, ArtifactError> {
    if project.is_empty() || repository.is_empty() {
        return Err(ArtifactError::NotProvided);
    }
    Ok(urlencoding::encode(repository).into_owned())
}

/// Same as [`repository_segment`], also checking the artifact reference.
fn artifact_segment(
    project: &str,
    repository: &str,
    reference: &str,
) -> Result<String, ArtifactError> {
    if reference.is_empty() {
        return Err(ArtifactError::NotProvided);
    }
    repository_segment(project, repository)
}

/// Operations on artifacts.
pub struct ArtifactClient<'a> {
    client: &'a HarborClient,
}

impl<'a> ArtifactClient<'a> {
    pub(crate) fn new(client: &'a HarborClient) -> ArtifactClient<'a> {
        ArtifactClient { client }
    }

    /// Lists the artifacts of a repository.
    pub async fn list_artifacts(
        &self,
        project: &str,
        repository: &str,
    ) -> Result<Vec<Artifact>, ArtifactError> {
        let repository = repository_segment(project, repository)?;
        let repository = repository.as_str();

        let client = self.client;
        paging::collect_pages(client.options().page, move |page| {
            let request = Request::get(
                Operation::ListArtifacts,
                &["projects", project, "repositories", repository, "artifacts"],
            )
            .page(client.options(), page);
            client.execute::<Vec<Artifact>>(request)
        })
        .map_err(handle_errors)
        .await
    }

    /// Returns an artifact by tag or digest.
    pub async fn get_artifact(
        &self,
        project: &str,
        repository: &str,
        reference: &str,
    ) -> Result<Artifact, ArtifactError> {
        let repository = artifact_segment(project, repository, reference)?;

        let request = Request::get(
            Operation::GetArtifact,
            &["projects", project, "repositories", &repository, "artifacts", reference],
        );
        let response = self
            .client
            .execute(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload)
    }

    /// Deletes an artifact by tag or digest.
    pub async fn delete_artifact(
        &self,
        project: &str,
        repository: &str,
        reference: &str,
    ) -> Result<(), ArtifactError> {
        let repository = artifact_segment(project, repository, reference)?;

        let request = Request::delete(
            Operation::DeleteArtifact,
            &["projects", project, "repositories", &repository, "artifacts", reference],
        );
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Copies the artifact `from` (`project/repository:tag` or
    /// `project/repository@digest`) into the given repository.
    pub async fn copy_artifact(
        &self,
        from: &str,
        project: &str,
        repository: &str,
    ) -> Result<(), ArtifactError> {
        if from.is_empty() {
            return Err(ArtifactError::NotProvided);
        }
        let repository = repository_segment(project, repository)?;

        let request = Request::post(
            Operation::CopyArtifact,
            &["projects", project, "repositories", &repository, "artifacts"],
        )
        .query("from", from)
        .expect(StatusCode::CREATED);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Attaches an existing label to an artifact.
    pub async fn add_artifact_label(
        &self,
        project: &str,
        repository: &str,
        reference: &str,
        label: &Label,
    ) -> Result<(), ArtifactError> {
        let repository = artifact_segment(project, repository, reference)?;

        let request = Request::post(
            Operation::AddLabel,
            &[
                "projects",
                project,
                "repositories",
                &repository,
                "artifacts",
                reference,
                "labels",
            ],
        )
        .json(label);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Detaches a label from an artifact.
    pub async fn remove_artifact_label(
        &self,
        project: &str,
        repository: &str,
        reference: &str,
        label_id: i64,
    ) -> Result<(), ArtifactError> {
        let repository = artifact_segment(project, repository, reference)?;

        let request = Request::delete(
            Operation::RemoveLabel,
            &[
                "projects",
                project,
                "repositories",
                &repository,
                "artifacts",
                reference,
                "labels",
                &label_id.to_string(),
            ],
        );
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Adds a tag to an artifact.
    pub async fn create_tag(
        &self,
        project: &str,
        repository: &str,
        reference: &str,
        tag: &Tag,
    ) -> Result<(), ArtifactError> {
        if tag.name.is_empty() {
            return Err(ArtifactError::NotProvided);
        }
        let repository = artifact_segment(project, repository, reference)?;

        let request = Request::post(
            Operation::CreateTag,
            &[
                "projects",
                project,
                "repositories",
                &repository,
                "artifacts",
                reference,
                "tags",
            ],
        )
        .json(tag)
        .expect(StatusCode::CREATED);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Lists the tags of an artifact.
    pub async fn list_tags(
        &self,
        project: &str,
        repository: &str,
        reference: &str,
    ) -> Result<Vec<Tag>, ArtifactError> {
        let repository = artifact_segment(project, repository, reference)?;
        let repository = repository.as_str();

        let client = self.client;
        paging::collect_pages(client.options().page, move |page| {
            let request = Request::get(
                Operation::ListTags,
                &[
                    "projects",
                    project,
                    "repositories",
                    repository,
                    "artifacts",
                    reference,
                    "tags",
                ],
            )
            .page(client.options(), page);
            client.execute::<Vec<Tag>>(request)
        })
        .map_err(handle_errors)
        .await
    }

    /// Removes a tag from an artifact.
    pub async fn delete_tag(
        &self,
        project: &str,
        repository: &str,
        reference: &str,
        name: &str,
    ) -> Result<(), ArtifactError> {
        if name.is_empty() {
            return Err(ArtifactError::NotProvided);
        }
        let repository = artifact_segment(project, repository, reference)?;

        let request = Request::delete(
            Operation::DeleteTag,
            &[
                "projects",
                project,
                "repositories",
                &repository,
                "artifacts",
                reference,
                "tags",
                name,
            ],
        );
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Returns the vulnerability report of an artifact, keyed by report mime type.
    pub async fn get_vulnerabilities_addition(
        &self,
        project: &str,
        repository: &str,
        reference: &str,
    ) -> Result<serde_json::Value, ArtifactError> {
        let repository = artifact_segment(project, repository, reference)?;

        let request = Request::get(
            Operation::GetVulnerabilitiesAddition,
            &[
                "projects",
                project,
                "repositories",
                &repository,
                "artifacts",
                reference,
                "additions",
                "vulnerabilities",
            ],
        );
        let response = self
            .client
            .execute(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload)
    }
}
