use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The kind of operation a request performed against the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    Read,
    Write,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Read => "read",
            RequestType::Write => "write",
        }
    }
}

impl Display for RequestType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown request type: {0}")]
pub struct UnknownRequestType(pub String);

impl FromStr for RequestType {
    type Err = UnknownRequestType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(RequestType::Read),
            "write" => Ok(RequestType::Write),
            other => Err(UnknownRequestType(other.to_string())),
        }
    }
}

/// A single request observed during a load test run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    /// When the request was issued
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub request_type: RequestType,
    pub key: String,
    /// Round trip time of the request, in milliseconds
    pub latency_ms: f64,
    pub success: bool,
    /// Whether a read observed an older version than one already seen for the key
    ///
    /// Always `false` for writes.
    pub is_stale: bool,
    pub version: u32,
}

impl RequestRecord {
    pub fn is_read(&self) -> bool {
        self.request_type == RequestType::Read
    }

    pub fn is_write(&self) -> bool {
        self.request_type == RequestType::Write
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_type_text_form() {
        assert_eq!("read".parse::<RequestType>(), Ok(RequestType::Read));
        assert_eq!("write".parse::<RequestType>(), Ok(RequestType::Write));
        assert_eq!(RequestType::Write.to_string(), "write");
    }

    #[test]
    fn request_type_rejects_unknown() {
        let err = "Read".parse::<RequestType>().unwrap_err();
        assert_eq!(err, UnknownRequestType("Read".to_string()));
    }
}
