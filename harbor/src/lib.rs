// Copyright (c) 2020 Rafael Alcaraz Mercado. All rights reserved.
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or distributed
// except according to those terms.
// THE SOURCE CODE IS AVAILABLE UNDER THE ABOVE CHOSEN LICENSE "AS IS", WITH NO WARRANTIES.

//! harbor crate defines serde compatible structs of the Harbor container registry
//! REST API (both the v2.0 API and the legacy endpoints Harbor still serves next
//! to it) and provides per-resource subclients to interact with the API.
//!
//! Every subclient call is a single request/response exchange with the Harbor
//! server. Failures coming back from the server are translated into small,
//! resource specific error enums so callers can match on them.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let harbor = harbor::HarborClient::new_with_basic_auth(
//!     "https://harbor.example.com",
//!     "admin",
//!     "Harbor12345",
//! )?;
//! let projects = harbor.projects().list_projects("").await?;
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod auditlog;
pub mod config;
pub mod configure;
pub mod gc;
pub mod label;
pub mod operation;
mod paging;
pub mod project;
pub mod quota;
pub mod registry;
pub mod replication;
pub mod retention;
pub mod robot;
pub mod schema;
pub mod system;
pub mod transport;

use recap::Recap;
use serde::de::DeserializeOwned;

pub use config::{ClientOptions, Credentials};
pub use operation::Operation;
pub use transport::{ApiErrors, Request, Response, Transport, TransportError};

/// Struct with typely safe definition of a repository inside a Harbor project.
#[derive(Debug, serde::Deserialize, Recap, PartialEq)]
#[recap(regex = r#"^(?P<project>[^/]+)/(?P<repository>[^:@]+)$"#)]
pub struct RepositoryPath {
    pub project: String,
    pub repository: String,
}

/// Struct with typely safe definition of an artifact inside a Harbor project,
/// addressed either by tag (`project/repository:tag`) or by digest
/// (`project/repository@sha256:...`).
#[derive(Debug, serde::Deserialize, Recap, PartialEq)]
#[recap(regex = r#"^(?P<project>[^/]+)/(?P<repository>[^:@]+)(:|@)(?P<reference>.+)$"#)]
pub struct ArtifactReference {
    pub project: String,
    pub repository: String,
    pub reference: String,
}

impl ArtifactReference {
    /// Returns whether the reference is a content digest rather than a tag.
    pub fn is_digest(&self) -> bool {
        self.reference.starts_with("sha256:")
    }
}

impl std::fmt::Display for ArtifactReference {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let separator = if self.is_digest() { '@' } else { ':' };
        write!(
            f,
            "{}/{}{}{}",
            &self.project, &self.repository, separator, &self.reference
        )
    }
}

/// Harbor API endpoint client. Resource specific operations are reached through
/// the subclient accessors (`projects()`, `registries()`, ...), which all share
/// this client's transport and options.
#[derive(Debug, Clone)]
pub struct HarborClient {
    transport: Transport,
    options: ClientOptions,
}

impl HarborClient {
    /// Creates a new Harbor client.
    /// If HARBOR_USER and HARBOR_PASSWORD environment variables are set,
    /// this will cache the values internally for user authentication
    /// when calling the REST API. Otherwise requests are sent anonymously.
    pub fn new(url: &str) -> Result<HarborClient, TransportError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(TransportError::Client)?;
        HarborClient::new_with_client(url, http, Credentials::from_env())
    }

    /// Creates a new Harbor client with basic authentication to the REST API.
    pub fn new_with_basic_auth(
        url: &str,
        user: &str,
        password: &str,
    ) -> Result<HarborClient, TransportError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(TransportError::Client)?;
        HarborClient::new_with_client(url, http, Credentials::basic(user, password))
    }

    /// Creates a new Harbor client with the supplied client for HTTP requests.
    pub fn new_with_client(
        url: &str,
        http: reqwest::Client,
        credentials: Credentials,
    ) -> Result<HarborClient, TransportError> {
        Ok(HarborClient {
            transport: Transport::new(url, http, credentials)?,
            options: ClientOptions::default(),
        })
    }

    /// Replaces the paging, filtering and timeout options shared by all subclients.
    pub fn with_options(mut self, options: ClientOptions) -> HarborClient {
        self.options = options;
        self
    }

    /// Returns the options shared by all subclients.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Returns whether this Harbor client has authentication enabled.
    pub fn has_auth(&self) -> bool {
        self.transport.has_auth()
    }

    pub fn projects(&self) -> project::ProjectClient<'_> {
        project::ProjectClient::new(self)
    }

    pub fn registries(&self) -> registry::RegistryClient<'_> {
        registry::RegistryClient::new(self)
    }

    pub fn replication(&self) -> replication::ReplicationClient<'_> {
        replication::ReplicationClient::new(self)
    }

    pub fn retention(&self) -> retention::RetentionClient<'_> {
        retention::RetentionClient::new(self)
    }

    pub fn robots(&self) -> robot::RobotClient<'_> {
        robot::RobotClient::new(self)
    }

    pub fn quotas(&self) -> quota::QuotaClient<'_> {
        quota::QuotaClient::new(self)
    }

    pub fn gc(&self) -> gc::GcClient<'_> {
        gc::GcClient::new(self)
    }

    pub fn artifacts(&self) -> artifact::ArtifactClient<'_> {
        artifact::ArtifactClient::new(self)
    }

    pub fn system(&self) -> system::SystemClient<'_> {
        system::SystemClient::new(self)
    }

    pub fn labels(&self) -> label::LabelClient<'_> {
        label::LabelClient::new(self)
    }

    pub fn audit_logs(&self) -> auditlog::AuditLogClient<'_> {
        auditlog::AuditLogClient::new(self)
    }

    pub fn configure(&self) -> configure::ConfigureClient<'_> {
        configure::ConfigureClient::new(self)
    }

    /// Sends a request with the shared timeout applied and decodes the JSON payload.
    pub(crate) async fn execute<T>(&self, request: Request) -> Result<Response<T>, TransportError>
    where
        T: DeserializeOwned,
    {
        self.transport
            .send(request.timeout(self.options.timeout))
            .await
    }

    /// Sends a request with the shared timeout applied, ignoring the response body.
    pub(crate) async fn execute_empty(
        &self,
        request: Request,
    ) -> Result<Response<()>, TransportError> {
        self.transport
            .send_empty(request.timeout(self.options.timeout))
            .await
    }

    /// Sends a request with the shared timeout applied and returns the body text.
    pub(crate) async fn execute_text(
        &self,
        request: Request,
    ) -> Result<Response<String>, TransportError> {
        self.transport
            .send_text(request.timeout(self.options.timeout))
            .await
    }
}
