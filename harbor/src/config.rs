// Copyright (c) 2020 Rafael Alcaraz Mercado. All rights reserved.
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or distributed
// except according to those terms.
// THE SOURCE CODE IS AVAILABLE UNDER THE ABOVE CHOSEN LICENSE "AS IS", WITH NO WARRANTIES.

//! Client configuration: credentials and the options shared by all subclients.

use std::time::Duration;

/// Environment variable holding the Harbor user name.
pub const HARBOR_USER: &str = "HARBOR_USER";
/// Environment variable holding the Harbor user password (or CLI secret).
pub const HARBOR_PASSWORD: &str = "HARBOR_PASSWORD";

/// Credentials attached to every request.
#[derive(Clone, PartialEq)]
pub enum Credentials {
    Anonymous,
    Basic { username: String, password: String },
}

impl Credentials {
    pub fn basic(username: &str, password: &str) -> Credentials {
        Credentials::Basic {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// Reads basic auth credentials from HARBOR_USER and HARBOR_PASSWORD.
    /// Falls back to anonymous access unless both are set.
    pub fn from_env() -> Credentials {
        match (std::env::var(HARBOR_USER), std::env::var(HARBOR_PASSWORD)) {
            (Ok(username), Ok(password)) => Credentials::Basic { username, password },
            _ => Credentials::Anonymous,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Credentials::Anonymous => write!(f, "Anonymous"),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

/// Paging, filtering and timeout options applied to every subclient call.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientOptions {
    /// First page requested by list operations.
    pub page: i64,
    /// Number of items requested per page.
    pub page_size: i64,
    /// Harbor query expression (`q`), e.g. `name=~nginx,creation_time=[2020~2021]`.
    pub query: String,
    /// Sort expression, e.g. `-creation_time`.
    pub sort: String,
    /// Per request timeout.
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        ClientOptions {
            page: 1,
            page_size: 10,
            query: String::new(),
            sort: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientOptions {
    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Options for internal exact-match lookups: every page from the first one,
    /// without the caller's query and sort. Page size and timeout are kept.
    pub(crate) fn lookup(&self) -> ClientOptions {
        ClientOptions {
            page: 1,
            query: String::new(),
            sort: String::new(),
            ..self.clone()
        }
    }
}
