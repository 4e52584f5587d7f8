// Copyright (c) 2020 Rafael Alcaraz Mercado. All rights reserved.
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or distributed
// except according to those terms.
// THE SOURCE CODE IS AVAILABLE UNDER THE ABOVE CHOSEN LICENSE "AS IS", WITH NO WARRANTIES.

//! Project subclient: projects, their metadata and their members.

use crate::operation::Operation;
use crate::paging;
use crate::quota::QuotaError;
use crate::schema::{
    MemberRole, Project, ProjectMember, ProjectMemberEntity, ProjectMetadataKey,
    ProjectMetadataMap, ProjectReq, RoleRequest,
};
use crate::transport::{Request, TransportError};
use crate::HarborClient;
use futures::TryFutureExt;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("illegal format of provided ID value")]
    IllegalIdFormat,
    #[error("unauthorized")]
    Unauthorized,
    #[error("user does not have permission to the project")]
    NoPermission,
    #[error("resource unknown")]
    UnknownResource,
    #[error("unexpected internal errors")]
    InternalErrors,
    #[error("project ID does not exist")]
    IdNotExists,
    #[error("project name already exists")]
    NameAlreadyExists,
    #[error("project not found on server side")]
    NotFound,
    #[error("id/name pair not found on server side")]
    Mismatch,
    #[error("no project provided")]
    NotProvided,
    #[error("project contains policies, repositories or helm charts and cannot be deleted")]
    NotEmpty,
    #[error("metadata key already exists")]
    MetadataAlreadyExists,
    #[error("metadata key is not defined for the project")]
    MetadataUndefined,
    #[error("member already exists in the project")]
    MemberAlreadyExists,
    #[error(transparent)]
    Quota(#[from] QuotaError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub(crate) fn handle_errors(err: TransportError) -> ProjectError {
    let Some((operation, status)) = err.operation_status() else {
        return ProjectError::Transport(err);
    };

    match (operation, status) {
        (Operation::CreateProject, StatusCode::CONFLICT) => ProjectError::NameAlreadyExists,
        (Operation::GetProject, StatusCode::NOT_FOUND) => ProjectError::NotFound,
        (Operation::DeleteProject, StatusCode::NOT_FOUND) => ProjectError::IdNotExists,
        (Operation::DeleteProject, StatusCode::PRECONDITION_FAILED) => ProjectError::NotEmpty,
        (Operation::AddProjectMetadatas, StatusCode::CONFLICT) => {
            ProjectError::MetadataAlreadyExists
        }
        (Operation::CreateProjectMember, StatusCode::CONFLICT) => {
            ProjectError::MemberAlreadyExists
        }
        (_, StatusCode::BAD_REQUEST) => ProjectError::IllegalIdFormat,
        (_, StatusCode::UNAUTHORIZED) => ProjectError::Unauthorized,
        (_, StatusCode::FORBIDDEN) => ProjectError::NoPermission,
        (_, StatusCode::NOT_FOUND) => ProjectError::UnknownResource,
        (_, StatusCode::INTERNAL_SERVER_ERROR) => ProjectError::InternalErrors,
        _ => ProjectError::Transport(err),
    }
}

/// Operations on projects.
pub struct ProjectClient<'a> {
    client: &'a HarborClient,
}

impl<'a> ProjectClient<'a> {
    pub(crate) fn new(client: &'a HarborClient) -> ProjectClient<'a> {
        ProjectClient { client }
    }

    /// Creates a project and returns it as stored by Harbor.
    pub async fn new_project(&self, req: &ProjectReq) -> Result<Project, ProjectError> {
        if req.project_name.is_empty() {
            return Err(ProjectError::NotProvided);
        }
        check_storage_limit(req.storage_limit)?;

        let request = Request::post(Operation::CreateProject, &["projects"])
            .json(req)
            .expect(StatusCode::CREATED);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;

        self.get_project_by_name(&req.project_name).await
    }

    /// Returns a project by name or by ID. An all-digit value is taken as an ID.
    pub async fn get_project(&self, name_or_id: &str) -> Result<Project, ProjectError> {
        if name_or_id.is_empty() {
            return Err(ProjectError::NotProvided);
        }

        let request = Request::get(Operation::GetProject, &["projects", name_or_id])
            .resource_name(name_or_id);
        self.fetch_project(request).await
    }

    /// Returns a project by name, all-digit names included.
    pub async fn get_project_by_name(&self, name: &str) -> Result<Project, ProjectError> {
        if name.is_empty() {
            return Err(ProjectError::NotProvided);
        }

        let request = Request::get(Operation::GetProject, &["projects", name]).by_name();
        self.fetch_project(request).await
    }

    async fn fetch_project(&self, request: Request) -> Result<Project, ProjectError> {
        let response = self
            .client
            .execute(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload)
    }

    /// Lists the projects whose name contains `name_filter`, all of them when empty.
    pub async fn list_projects(&self, name_filter: &str) -> Result<Vec<Project>, ProjectError> {
        let client = self.client;
        paging::collect_pages(client.options().page, move |page| {
            let request = Request::get(Operation::ListProjects, &["projects"])
                .query_non_empty("name", name_filter)
                .page(client.options(), page);
            client.execute::<Vec<Project>>(request)
        })
        .map_err(handle_errors)
        .await
    }

    /// Checks whether a project with the given name exists.
    pub async fn project_exists(&self, name: &str) -> Result<bool, ProjectError> {
        if name.is_empty() {
            return Err(ProjectError::NotProvided);
        }

        let request =
            Request::head(Operation::HeadProject, &["projects"]).query("project_name", name);
        match self.client.execute_empty(request).await {
            Ok(_) => Ok(true),
            Err(err) if err.status() == Some(StatusCode::NOT_FOUND) => Ok(false),
            Err(err) => Err(handle_errors(err)),
        }
    }

    /// Updates a project. The project is looked up by name first and its ID must
    /// match. A storage limit, when given, is applied to the project's quota.
    pub async fn update_project(
        &self,
        project: &Project,
        storage_limit: Option<i64>,
    ) -> Result<(), ProjectError> {
        check_storage_limit(storage_limit)?;
        let id = self.check_identity(project).await?;

        let req = ProjectReq {
            project_name: project.name.clone(),
            metadata: project.metadata.clone(),
            cve_allowlist: project.cve_allowlist.clone(),
            storage_limit,
            ..Default::default()
        };
        let request =
            Request::put(Operation::UpdateProject, &["projects", &id.to_string()]).json(&req);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;

        if let Some(limit) = storage_limit {
            self.client
                .quotas()
                .update_storage_quota_by_project_id(id, limit)
                .await?;
        }
        Ok(())
    }

    /// Deletes a project after checking its name and ID still belong together.
    pub async fn delete_project(&self, project: &Project) -> Result<(), ProjectError> {
        let id = self.check_identity(project).await?;

        let request = Request::delete(Operation::DeleteProject, &["projects", &id.to_string()]);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    async fn check_identity(&self, project: &Project) -> Result<i64, ProjectError> {
        if project.name.is_empty() {
            return Err(ProjectError::NotProvided);
        }

        let stored = self.get_project_by_name(&project.name).await?;
        if stored.project_id != project.project_id {
            log::debug!(
                "Project {} has ID {} on server side, {} was given",
                &project.name,
                stored.project_id,
                project.project_id
            );
            return Err(ProjectError::Mismatch);
        }
        Ok(stored.project_id)
    }

    /// Adds a metadata key to a project.
    pub async fn add_project_metadata(
        &self,
        name_or_id: &str,
        key: ProjectMetadataKey,
        value: &str,
    ) -> Result<(), ProjectError> {
        if name_or_id.is_empty() {
            return Err(ProjectError::NotProvided);
        }

        let request = Request::post(
            Operation::AddProjectMetadatas,
            &["projects", name_or_id, "metadatas"],
        )
        .resource_name(name_or_id)
        .json(&metadata(key, value))
        // Documented as 200, Harbor answers 201.
        .tolerate(StatusCode::CREATED);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Returns the value of a single metadata key of a project.
    pub async fn get_project_metadata_value(
        &self,
        name_or_id: &str,
        key: ProjectMetadataKey,
    ) -> Result<String, ProjectError> {
        if name_or_id.is_empty() {
            return Err(ProjectError::NotProvided);
        }

        let request = Request::get(
            Operation::GetProjectMetadata,
            &["projects", name_or_id, "metadatas", key.as_str()],
        )
        .resource_name(name_or_id);
        let response = self
            .client
            .execute::<Option<ProjectMetadataMap>>(request)
            .map_err(handle_errors)
            .await?;

        response
            .payload
            .and_then(|mut metadata| metadata.remove(key.as_str()))
            .ok_or(ProjectError::MetadataUndefined)
    }

    /// Returns every metadata key set on a project.
    pub async fn list_project_metadata(
        &self,
        name_or_id: &str,
    ) -> Result<ProjectMetadataMap, ProjectError> {
        if name_or_id.is_empty() {
            return Err(ProjectError::NotProvided);
        }

        let request = Request::get(
            Operation::ListProjectMetadatas,
            &["projects", name_or_id, "metadatas"],
        )
        .resource_name(name_or_id);
        let response = self
            .client
            .execute::<Option<ProjectMetadataMap>>(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload.unwrap_or_default())
    }

    /// Changes the value of a metadata key of a project.
    pub async fn update_project_metadata(
        &self,
        name_or_id: &str,
        key: ProjectMetadataKey,
        value: &str,
    ) -> Result<(), ProjectError> {
        if name_or_id.is_empty() {
            return Err(ProjectError::NotProvided);
        }

        let request = Request::put(
            Operation::UpdateProjectMetadata,
            &["projects", name_or_id, "metadatas", key.as_str()],
        )
        .resource_name(name_or_id)
        .json(&metadata(key, value));
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Removes a metadata key from a project.
    pub async fn delete_project_metadata_value(
        &self,
        name_or_id: &str,
        key: ProjectMetadataKey,
    ) -> Result<(), ProjectError> {
        if name_or_id.is_empty() {
            return Err(ProjectError::NotProvided);
        }

        let request = Request::delete(
            Operation::DeleteProjectMetadata,
            &["projects", name_or_id, "metadatas", key.as_str()],
        )
        .resource_name(name_or_id);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Adds a user or a group to a project.
    pub async fn add_project_member(
        &self,
        name_or_id: &str,
        member: &ProjectMember,
    ) -> Result<(), ProjectError> {
        if name_or_id.is_empty() {
            return Err(ProjectError::NotProvided);
        }

        let request = Request::post(
            Operation::CreateProjectMember,
            &["projects", name_or_id, "members"],
        )
        .resource_name(name_or_id)
        .json(member)
        .expect(StatusCode::CREATED);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Lists the members of a project, filtered by entity name when one is given.
    pub async fn list_project_members(
        &self,
        name_or_id: &str,
        entity_name: &str,
    ) -> Result<Vec<ProjectMemberEntity>, ProjectError> {
        if name_or_id.is_empty() {
            return Err(ProjectError::NotProvided);
        }

        let client = self.client;
        paging::collect_pages(client.options().page, move |page| {
            let request = Request::get(
                Operation::ListProjectMembers,
                &["projects", name_or_id, "members"],
            )
            .resource_name(name_or_id)
            .query_non_empty("entityname", entity_name)
            .page(client.options(), page);
            client.execute::<Vec<ProjectMemberEntity>>(request)
        })
        .map_err(handle_errors)
        .await
    }

    /// Changes the role of a project member.
    pub async fn update_project_member_role(
        &self,
        name_or_id: &str,
        member_id: i64,
        role: MemberRole,
    ) -> Result<(), ProjectError> {
        if name_or_id.is_empty() || member_id == 0 {
            return Err(ProjectError::NotProvided);
        }

        let request = Request::put(
            Operation::UpdateProjectMember,
            &["projects", name_or_id, "members", &member_id.to_string()],
        )
        .resource_name(name_or_id)
        .json(&RoleRequest { role_id: role.id() });
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Removes a member from a project.
    pub async fn delete_project_member(
        &self,
        name_or_id: &str,
        member_id: i64,
    ) -> Result<(), ProjectError> {
        if name_or_id.is_empty() || member_id == 0 {
            return Err(ProjectError::NotProvided);
        }

        let request = Request::delete(
            Operation::DeleteProjectMember,
            &["projects", name_or_id, "members", &member_id.to_string()],
        )
        .resource_name(name_or_id);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }
}

/// Storage limits are in bytes, `-1` meaning unlimited.
fn check_storage_limit(storage_limit: Option<i64>) -> Result<(), ProjectError> {
    match storage_limit {
        Some(limit) if limit < -1 => Err(QuotaError::InvalidLimit(limit).into()),
        _ => Ok(()),
    }
}

fn metadata(key: ProjectMetadataKey, value: &str) -> ProjectMetadataMap {
    let mut metadata = ProjectMetadataMap::new();
    metadata.insert(key.to_string(), value.to_string());
    metadata
}
