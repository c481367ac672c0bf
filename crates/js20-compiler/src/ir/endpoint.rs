//! Computed endpoints: the API operations a client function is generated for.

use std::fmt;
use std::str::FromStr;

use crate::diagnostic::CompilerError;
use super::schema::SchemaNode;

/// HTTP methods a client function can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Verb prefix of the generated function name.
    pub fn function_prefix(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "create",
            HttpMethod::Put => "update",
            HttpMethod::Delete => "delete",
        }
    }

    /// Parses a method name. Lowercase names are accepted.
    pub fn parse(method: &str, path: &str) -> Result<Self, CompilerError> {
        method.parse().map_err(|_| CompilerError::UnknownMethod {
            method: method.to_string(),
            path: path.to_string(),
        })
    }
}

impl FromStr for HttpMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(()),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One API operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedEndpoint {
    pub method: HttpMethod,
    pub path: String,
    pub requires_auth: bool,
    pub input_schema: Option<SchemaNode>,
    pub output_schema: Option<SchemaNode>,
    /// Overrides the derived function name verbatim.
    pub function_name: Option<String>,
}

impl ComputedEndpoint {
    /// Creates an endpoint after checking the path is well formed.
    pub fn new(method: HttpMethod, path: impl Into<String>, requires_auth: bool) -> Result<Self, CompilerError> {
        let path = path.into();
        validate_path(&path)?;
        Ok(Self {
            method,
            path,
            requires_auth,
            input_schema: None,
            output_schema: None,
            function_name: None,
        })
    }

    pub fn with_input(mut self, schema: SchemaNode) -> Self {
        self.input_schema = Some(schema);
        self
    }

    pub fn with_output(mut self, schema: SchemaNode) -> Self {
        self.output_schema = Some(schema);
        self
    }

    pub fn with_function_name(mut self, name: impl Into<String>) -> Self {
        self.function_name = Some(name.into());
        self
    }

    /// Literal (non-parameter) path segments, in order.
    pub fn literal_segments(&self) -> impl Iterator<Item = &str> {
        self.path
            .split('/')
            .filter(|segment| !segment.is_empty() && !segment.starts_with(':'))
    }

    /// Names of the `:param` segments, in order.
    pub fn path_params(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter_map(|segment| segment.strip_prefix(':'))
    }
}

/// Checks that a path starts with `/`, has no trailing slash unless it is
/// exactly `/`, and has no empty or unnamed segments.
pub fn validate_path(path: &str) -> Result<(), CompilerError> {
    let malformed = |reason: &str| CompilerError::MalformedPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    if !path.starts_with('/') {
        return Err(malformed("must start with '/'"));
    }
    if path == "/" {
        return Ok(());
    }
    if path.ends_with('/') {
        return Err(malformed("must not end with '/'"));
    }

    for segment in path[1..].split('/') {
        if segment.is_empty() {
            return Err(malformed("contains an empty segment"));
        }
        if segment == ":" {
            return Err(malformed("contains a parameter without a name"));
        }
    }

    Ok(())
}
