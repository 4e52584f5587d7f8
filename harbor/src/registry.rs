// Copyright (c) 2020 Rafael Alcaraz Mercado. All rights reserved.
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or distributed
// except according to those terms.
// THE SOURCE CODE IS AVAILABLE UNDER THE ABOVE CHOSEN LICENSE "AS IS", WITH NO WARRANTIES.

//! Registry endpoint subclient. Registries are the remote ends of replication
//! policies and proxy cache projects.

use crate::operation::Operation;
use crate::paging;
use crate::schema::{Registry, RegistryInfo, RegistryPing, RegistryUpdate};
use crate::transport::{Request, TransportError};
use crate::{ClientOptions, HarborClient};
use futures::TryFutureExt;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("illegal format of provided ID value")]
    IllegalIdFormat,
    #[error("unauthorized")]
    Unauthorized,
    #[error("user does not have permission to the registry")]
    NoPermission,
    #[error("registry not found on server side")]
    NotFound,
    #[error("registry ID does not exist")]
    IdNotExists,
    #[error("registry name already exists")]
    NameAlreadyExists,
    #[error("registry is in use by a replication policy or a project")]
    InUse,
    #[error("unexpected internal errors")]
    InternalErrors,
    #[error("no registry provided")]
    NotProvided,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub(crate) fn handle_errors(err: TransportError) -> RegistryError {
    let Some((operation, status)) = err.operation_status() else {
        return RegistryError::Transport(err);
    };

    match (operation, status) {
        (Operation::CreateRegistry | Operation::UpdateRegistry, StatusCode::CONFLICT) => {
            RegistryError::NameAlreadyExists
        }
        (
            Operation::GetRegistry
            | Operation::UpdateRegistry
            | Operation::DeleteRegistry
            | Operation::GetRegistryInfo,
            StatusCode::NOT_FOUND,
        ) => RegistryError::IdNotExists,
        (Operation::DeleteRegistry, StatusCode::PRECONDITION_FAILED) => RegistryError::InUse,
        (_, StatusCode::BAD_REQUEST) => RegistryError::IllegalIdFormat,
        (_, StatusCode::UNAUTHORIZED) => RegistryError::Unauthorized,
        (_, StatusCode::FORBIDDEN) => RegistryError::NoPermission,
        (_, StatusCode::NOT_FOUND) => RegistryError::NotFound,
        (_, StatusCode::INTERNAL_SERVER_ERROR) => RegistryError::InternalErrors,
        _ => RegistryError::Transport(err),
    }
}

/// Operations on registry endpoints.
pub struct RegistryClient<'a> {
    client: &'a HarborClient,
}

impl<'a> RegistryClient<'a> {
    pub(crate) fn new(client: &'a HarborClient) -> RegistryClient<'a> {
        RegistryClient { client }
    }

    /// Registers a remote registry endpoint.
    pub async fn new_registry(&self, registry: &Registry) -> Result<(), RegistryError> {
        if registry.name.is_empty() {
            return Err(RegistryError::NotProvided);
        }

        let request = Request::post(Operation::CreateRegistry, &["registries"])
            .json(registry)
            .expect(StatusCode::CREATED);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Returns a registry by its ID.
    pub async fn get_registry_by_id(&self, id: i64) -> Result<Registry, RegistryError> {
        let request = Request::get(Operation::GetRegistry, &["registries", &id.to_string()]);
        let response = self
            .client
            .execute(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload)
    }

    /// Returns the registry with exactly the given name.
    pub async fn get_registry_by_name(&self, name: &str) -> Result<Registry, RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::NotProvided);
        }

        let options = self.client.options().lookup();
        let registries = self.list(format!("name={}", name), &options).await?;
        registries
            .into_iter()
            .find(|registry| registry.name == name)
            .ok_or(RegistryError::NotFound)
    }

    /// Lists the registries whose name contains `term`, all of them when empty.
    pub async fn list_registries(&self, term: &str) -> Result<Vec<Registry>, RegistryError> {
        let options = self.client.options();
        if term.is_empty() {
            self.list(String::new(), options).await
        } else {
            self.list(format!("name=~{}", term), options).await
        }
    }

    async fn list(
        &self,
        query: String,
        options: &ClientOptions,
    ) -> Result<Vec<Registry>, RegistryError> {
        let client = self.client;
        let query = query.as_str();
        paging::collect_pages(options.page, move |page| {
            let request = Request::get(Operation::ListRegistries, &["registries"])
                .query_non_empty("q", query)
                .page(options, page);
            client.execute::<Vec<Registry>>(request)
        })
        .map_err(handle_errors)
        .await
    }

    /// Updates the registry with the given ID, which has to exist.
    pub async fn update_registry(
        &self,
        update: &RegistryUpdate,
        id: i64,
    ) -> Result<(), RegistryError> {
        self.get_registry_by_id(id).await?;

        let request = Request::put(Operation::UpdateRegistry, &["registries", &id.to_string()])
            .json(update);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Deletes a registry. Harbor refuses while replication policies use it.
    pub async fn delete_registry_by_id(&self, id: i64) -> Result<(), RegistryError> {
        let request = Request::delete(Operation::DeleteRegistry, &["registries", &id.to_string()]);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }

    /// Returns the filters and triggers the registry supports.
    pub async fn get_registry_info(&self, id: i64) -> Result<RegistryInfo, RegistryError> {
        let request = Request::get(
            Operation::GetRegistryInfo,
            &["registries", &id.to_string(), "info"],
        );
        let response = self
            .client
            .execute(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload)
    }

    /// Lists the registry types Harbor can replicate with.
    pub async fn list_registry_adapters(&self) -> Result<Vec<String>, RegistryError> {
        let request = Request::get(
            Operation::ListRegistryProviderTypes,
            &["replication", "adapters"],
        );
        let response = self
            .client
            .execute::<Option<Vec<String>>>(request)
            .map_err(handle_errors)
            .await?;
        Ok(response.payload.unwrap_or_default())
    }

    /// Checks that Harbor can reach a registry with the given settings.
    pub async fn ping_registry(&self, ping: &RegistryPing) -> Result<(), RegistryError> {
        let request = Request::post(Operation::PingRegistry, &["registries", "ping"]).json(ping);
        self.client
            .execute_empty(request)
            .map_err(handle_errors)
            .await?;
        Ok(())
    }
}
