
use std::error::Error as StdError;
use std::fmt::{self, Display, Debug};
use std::process::ExitStatus;

use serde_json::{Map, Value};

pub trait ErrorDescription {
    fn description(&self) -> impl Display;
    fn code(&self) -> Option<u16> {
        None
    }
    fn error_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        None
    }
}

impl<T> ErrorDescription for T
where
    T: Display,
{
    fn description(&self) -> impl Display {
        self
    }
}

pub struct GenericError<T>(pub T) where T: ErrorDescription;

impl<T> GenericError<T>
where
    T: ErrorDescription,
{
    pub const fn new(err: T) -> Self {
        Self(err)
    }

    pub fn into_inner(self) -> T {
        self.0
    }

    pub fn as_inner(&self) -> &T {
        &self.0
    }

    pub fn error_name(&self) -> &'static str {
        self.0.error_name()
    }

    pub fn code(&self) -> Option<u16> {
        self.0.code()
    }
}

impl<T> Debug for GenericError<T>
where
    T: ErrorDescription,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(code) = self.0.code() {
            write!(f, "GenericError({}): {} ({})", self.error_name(), self.0.description(), code)
        } else {
            write!(f, "GenericError({}): {}", self.error_name(), self.0.description())
        }
    }
}

impl<T> Display for GenericError<T>
where
    T: ErrorDescription,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.description())
    }
}

impl<T> StdError for GenericError<T>
where
    T: ErrorDescription,
{
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl<T> From<T> for GenericError<T>
where
    T: ErrorDescription,
{
    fn from(err: T) -> Self {
        Self::new(err)
    }
}

#[derive(Clone, PartialEq)]
pub struct ProtocolFailure {
    status: u16,
    body: Map<String, Value>,
}

impl ProtocolFailure {
    pub fn from_response(status: u16, reason: &str, raw: &[u8]) -> Self {
        let mut body = match serde_json::from_slice::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                let mut map = Map::new();
                map.insert("detail".to_owned(), other);
                map
            },
            Err(_) => {
                let mut map = Map::new();
                let text = String::from_utf8_lossy(raw).into_owned();
                map.insert("detail".to_owned(), Value::String(text));
                map
            },
        };
        body.insert("code".to_owned(), Value::String(status.to_string()));
        body.insert("message".to_owned(), Value::String(reason.to_owned()));

        Self { status, body }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn into_body(self) -> Map<String, Value> {
        self.body
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }
}

impl ErrorDescription for ProtocolFailure {
    #[allow(refining_impl_trait)]
    fn description(&self) -> String {
        let message = self.body.get("message").and_then(Value::as_str).unwrap_or_default();
        match self.body.get("detail") {
            Some(Value::String(detail)) => format!("engine returned {} {}: {}", self.status, message, detail),
            Some(detail) => format!("engine returned {} {}: {}", self.status, message, detail),
            None => format!("engine returned {} {}", self.status, message),
        }
    }

    fn code(&self) -> Option<u16> {
        Some(self.status)
    }
}

pub type ProtocolError = GenericError<ProtocolFailure>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("transport error: {0}")]
    Transport(#[from] ureq::Error),

    #[error("failed to decode engine response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("playback command exited with {0}")]
    PlaybackExit(ExitStatus),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn protocol(&self) -> Option<&ProtocolFailure> {
        match self {
            Self::Protocol(err) => Some(err.as_inner()),
            _ => None,
        }
    }
}
