
use std::fmt;

use serde::Serialize;
use ureq::http::StatusCode;
use ureq::{Agent, RequestBuilder};

use crate::config::ClientConfig;
use crate::error::Result;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.push((key.to_owned(), value.to_string()));
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn reason(&self) -> &'static str {
        StatusCode::from_u16(self.status)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("")
    }
}

pub trait Transport {
    fn send(&self, request: Request) -> Result<Response>;
}

#[derive(Clone)]
pub struct HttpTransport {
    agent: Agent,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout)
            .build()
            .into();

        Self {
            agent,
            base_url: config.base_url(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn with_params<B>(builder: RequestBuilder<B>, params: &[(String, String)]) -> RequestBuilder<B> {
    params.iter().fold(builder, |builder, (key, value)| builder.query(key, value))
}

impl Transport for HttpTransport {
    fn send(&self, request: Request) -> Result<Response> {
        let url = format!("{}{}", self.base_url, request.path);
        log::debug!(
            "{} {} ({} params, {} body bytes)",
            request.method,
            request.path,
            request.params.len(),
            request.body.as_ref().map_or(0, Vec::len),
        );

        let result = match request.method {
            Method::Get => with_params(self.agent.get(&url), &request.params).call(),
            Method::Delete => with_params(self.agent.delete(&url), &request.params).call(),
            Method::Post | Method::Put => {
                let builder = match request.method {
                    Method::Put => self.agent.put(&url),
                    _ => self.agent.post(&url),
                };
                let builder = with_params(builder, &request.params);
                match &request.body {
                    Some(body) => builder
                        .header("Content-Type", "application/json")
                        .send(body.as_slice()),
                    None => builder.send_empty(),
                }
            },
        };

        let mut response = result?;
        let status = response.status().as_u16();
        let body = response.body_mut().with_config().limit(u64::MAX).read_to_vec()?;
        log::debug!("{} {} -> {} ({} bytes)", request.method, request.path, status, body.len());

        Ok(Response { status, body })
    }
}
