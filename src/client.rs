//! Server client over a pluggable blocking transport.
//!
//! The client only frames requests and decodes responses; moving bytes is
//! the job of a [`Transport`] supplied by the host application.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};
use crate::query::payload::{QueryResult, QueryType};

/// HTTP method of an API request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

impl Method {
    /// Upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Framed request handed to the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    /// Request method.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Header name/value pairs in insertion order.
    pub headers: Vec<(String, String)>,
    /// JSON body.
    pub body: Option<String>,
}

impl ApiRequest {
    /// Value of the first header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response returned by the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl ApiResponse {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking request executor.
pub trait Transport {
    /// Sends `request` and returns the server's response.
    fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

/// Client bound to one server database.
#[derive(Debug)]
pub struct DbClient<T> {
    transport: T,
    base_url: String,
    owner: String,
    database: String,
    token: Option<String>,
}

impl<T: Transport> DbClient<T> {
    /// Creates a client for `owner/database` at `base_url`.
    pub fn new(transport: T, base_url: &str, owner: &str, database: &str) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            database: database.to_string(),
            token: None,
        }
    }

    /// Uses an existing API token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Current API token.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Runs read-only queries.
    pub fn exec(&self, queries: &[QueryType]) -> Result<Vec<QueryResult>> {
        self.run("exec", queries)
    }

    /// Runs queries that may modify the database.
    pub fn exec_mut(&self, queries: &[QueryType]) -> Result<Vec<QueryResult>> {
        self.run("exec_mut", queries)
    }

    /// Runs `queries` through `exec_mut` if any of them mutates, else `exec`.
    pub fn execute(&self, queries: &[QueryType]) -> Result<Vec<QueryResult>> {
        if queries.iter().any(QueryType::is_mutable) {
            self.exec_mut(queries)
        } else {
            self.exec(queries)
        }
    }

    /// Exchanges credentials for an API token and keeps it.
    pub fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let body = serde_json::to_string(&LoginBody { username, password })?;
        let url = format!("{}/api/v1/user/login", self.base_url);
        let response = self.send(Method::Post, url, Some(body))?;
        let token: String = serde_json::from_str(&response.body)?;
        debug!(user = username, "client.login");
        self.token = Some(token);
        Ok(())
    }

    /// Invalidates the token on the server and forgets it.
    pub fn logout(&mut self) -> Result<()> {
        if self.token.is_none() {
            return Ok(());
        }
        let url = format!("{}/api/v1/user/logout", self.base_url);
        self.send(Method::Post, url, None)?;
        self.token = None;
        debug!("client.logout");
        Ok(())
    }

    fn run(&self, endpoint: &str, queries: &[QueryType]) -> Result<Vec<QueryResult>> {
        let url = format!(
            "{}/api/v1/db/{}/{}/{}",
            self.base_url, self.owner, self.database, endpoint
        );
        let body = serde_json::to_string(queries)?;
        debug!(endpoint, queries = queries.len(), "client.exec.request");
        let response = self.send(Method::Post, url, Some(body))?;
        let results: Vec<QueryResult> = serde_json::from_str(&response.body)?;
        debug!(endpoint, results = results.len(), "client.exec.response");
        Ok(results)
    }

    fn send(&self, method: Method, url: String, body: Option<String>) -> Result<ApiResponse> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(token) = &self.token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        let response = self.transport.send(ApiRequest {
            method,
            url,
            headers,
            body,
        })?;
        if response.is_success() {
            return Ok(response);
        }
        warn!(status = response.status, "client.request.failed");
        Err(ClientError::Server {
            status: response.status,
            message: response.body.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Canned {
        status: u16,
        body: &'static str,
        seen: RefCell<Vec<ApiRequest>>,
    }

    impl Transport for Canned {
        fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
            self.seen.borrow_mut().push(request);
            Ok(ApiResponse {
                status: self.status,
                body: self.body.to_string(),
            })
        }
    }

    fn canned(status: u16, body: &'static str) -> Canned {
        Canned {
            status,
            body,
            seen: RefCell::new(Vec::new()),
        }
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = DbClient::new(canned(200, "[]"), "http://host/", "o", "d");
        client.exec(&[]).unwrap();
        let seen = client.transport().seen.borrow();
        assert_eq!(seen[0].url, "http://host/api/v1/db/o/d/exec");
        assert_eq!(seen[0].method, Method::Post);
    }

    #[test]
    fn login_stores_token() {
        let mut client = DbClient::new(canned(200, "\"tok\""), "http://host", "o", "d");
        client.login("ada", "pw").unwrap();
        assert_eq!(client.token(), Some("tok"));
        let seen = client.transport().seen.borrow();
        assert_eq!(seen[0].url, "http://host/api/v1/user/login");
        assert_eq!(
            seen[0].body.as_deref(),
            Some(r#"{"username":"ada","password":"pw"}"#)
        );
    }

    #[test]
    fn logout_without_token_skips_request() {
        let mut client = DbClient::new(canned(200, ""), "http://host", "o", "d");
        client.logout().unwrap();
        assert!(client.transport().seen.borrow().is_empty());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let request = ApiRequest {
            method: Method::Get,
            url: String::new(),
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: None,
        };
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("authorization"), None);
    }
}
