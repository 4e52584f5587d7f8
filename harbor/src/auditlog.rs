// Copyright (c) 2020 Rafael Alcaraz Mercado. All rights reserved.
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or distributed
// except according to those terms.
// THE SOURCE CODE IS AVAILABLE UNDER THE ABOVE CHOSEN LICENSE "AS IS", WITH NO WARRANTIES.

//! Audit log subclient.

use crate::operation::Operation;
use crate::paging;
use crate::schema::AuditLog;
use crate::transport::{Request, TransportError};
use crate::HarborClient;
use futures::TryFutureExt;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditLogError {
    #[error("bad request")]
    BadRequest,
    #[error("unauthorized")]
    Unauthorized,
    #[error("user does not have permission to the audit logs")]
    NoPermission,
    #[error("unexpected internal errors")]
    InternalErrors,
    #[error("no project provided")]
    NotProvided,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub(crate) fn handle_errors(err: TransportError) -> AuditLogError {
    let Some((_, status)) = err.operation_status() else {
        return AuditLogError::Transport(err);
    };

    match status {
        StatusCode::BAD_REQUEST => AuditLogError::BadRequest,
        StatusCode::UNAUTHORIZED => AuditLogError::Unauthorized,
        StatusCode::FORBIDDEN => AuditLogError::NoPermission,
        StatusCode::INTERNAL_SERVER_ERROR => AuditLogError::InternalErrors,
        _ => AuditLogError::Transport(err),
    }
}

pub struct AuditLogClient<'a> {
    client: &'a HarborClient,
}

impl<'a> AuditLogClient<'a> {
    pub(crate) fn new(client: &'a HarborClient) -> AuditLogClient<'a> {
        AuditLogClient { client }
    }

    /// Lists the audit logs of the projects the user is a member of, filtered
    /// by the `q` and `sort` client options.
    pub async fn list_audit_logs(&self) -> Result<Vec<AuditLog>, AuditLogError> {
        let client = self.client;
        paging::collect_pages(client.options().page, move |page| {
            let request = Request::get(Operation::ListAuditLogs, &["audit-logs"])
                .page(client.options(), page);
            client.execute::<Vec<AuditLog>>(request)
        })
        .map_err(handle_errors)
        .await
    }

    /// Lists the audit logs of a single project, filtered like [`Self::list_audit_logs`].
    pub async fn list_project_logs(
        &self,
        project_name: &str,
    ) -> Result<Vec<AuditLog>, AuditLogError> {
        if project_name.is_empty() {
            return Err(AuditLogError::NotProvided);
        }

        let client = self.client;
        paging::collect_pages(client.options().page, move |page| {
            let request = Request::get(Operation::GetLogs, &["projects", project_name, "logs"])
                .page(client.options(), page);
            client.execute::<Vec<AuditLog>>(request)
        })
        .map_err(handle_errors)
        .await
    }
}
