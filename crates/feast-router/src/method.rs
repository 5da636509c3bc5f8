//! HTTP methods, run modes and handler verbs
//!
//! Small value types shared by the registry, the matcher and the catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// HTTP methods a route can be registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Every method the registry keeps a table for
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// The verb-suffixed handler preferred for this method
    ///
    /// ```
    /// use feast_router::{HandlerVerb, HttpMethod};
    ///
    /// assert_eq!(HttpMethod::Post.handler_verb(), HandlerVerb::Post);
    /// assert_eq!(HttpMethod::Get.handler_verb(), HandlerVerb::Get);
    /// ```
    pub fn handler_verb(&self) -> HandlerVerb {
        match self {
            HttpMethod::Get => HandlerVerb::Get,
            HttpMethod::Post => HandlerVerb::Post,
            HttpMethod::Put => HandlerVerb::Put,
            HttpMethod::Patch => HandlerVerb::Patch,
            HttpMethod::Delete => HandlerVerb::Delete,
        }
    }
}

impl Default for HttpMethod {
    fn default() -> Self {
        HttpMethod::Get
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(format!("unsupported HTTP method: {}", other)),
        }
    }
}

/// Whether the process is serving web requests or running a CLI command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunAs {
    #[default]
    Web,
    Cli,
}

/// Suffix of a handler method on a controller
///
/// `Action` is the verb-agnostic fallback (`serviceAction`); the others are
/// verb-specific overrides (`serviceGet`, `servicePost`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandlerVerb {
    Action,
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HandlerVerb {
    pub fn suffix(&self) -> &'static str {
        match self {
            HandlerVerb::Action => "Action",
            HandlerVerb::Get => "Get",
            HandlerVerb::Post => "Post",
            HandlerVerb::Put => "Put",
            HandlerVerb::Patch => "Patch",
            HandlerVerb::Delete => "Delete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method_case_insensitive() {
        assert_eq!("post".parse::<HttpMethod>(), Ok(HttpMethod::Post));
        assert_eq!("DELETE".parse::<HttpMethod>(), Ok(HttpMethod::Delete));
        assert!("OPTIONS".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for method in HttpMethod::ALL {
            assert_eq!(method.to_string().parse::<HttpMethod>(), Ok(method));
        }
    }
}
