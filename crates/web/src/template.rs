//! Plain text templates with `$name` and `${name}` placeholders.
//!
//! [`Template::safe_substitute`] replaces the placeholders it has a value for
//! and leaves every other one in the output as written. `$$` is an escaped
//! dollar sign and renders as `$`.
//!
//! ```
//! use tonkey_web::template::{Context, Template};
//!
//! let template = Template::new("Hello ${name}! You owe $$${amount}.");
//! let context = Context::from([("name", "World")]);
//! assert_eq!(template.safe_substitute(&context), "Hello World! You owe $${amount}.");
//! ```
//!
//! [`TemplateResponse`] reads a template file, renders it and wraps the result
//! in a [`Response`] whose body is exactly one chunk.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use mime::Mime;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::handler::HandlerError;
use crate::responder::Responder;
use crate::response::{Body, Charset, Response};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\$(?:(?P<escaped>\$)|(?P<named>[_a-zA-Z][_a-zA-Z0-9]*)|\{(?P<braced>[_a-zA-Z][_a-zA-Z0-9]*)\}|(?P<invalid>))",
    )
    .expect("placeholder pattern should compile")
});

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("can't read template {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no value for placeholder '{name}'")]
    MissingPlaceholder { name: String },

    #[error("invalid placeholder at byte {position}")]
    InvalidPlaceholder { position: usize },

    #[error("invalid template context: {reason}")]
    InvalidContext { reason: String },
}

impl TemplateError {
    pub fn io<P: AsRef<Path>>(path: P, source: io::Error) -> Self {
        Self::Io { path: path.as_ref().to_path_buf(), source }
    }

    pub fn missing_placeholder<S: ToString>(name: S) -> Self {
        Self::MissingPlaceholder { name: name.to_string() }
    }

    pub fn invalid_context<S: ToString>(reason: S) -> Self {
        Self::InvalidContext { reason: reason.to_string() }
    }
}

/// Values for template placeholders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    values: HashMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a context from the fields of a serializable map or struct.
    ///
    /// String values are used as they are, every other value in its JSON form.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, TemplateError> {
        match serde_json::to_value(value).map_err(TemplateError::invalid_context)? {
            Value::Object(map) => Ok(map
                .into_iter()
                .map(|(name, value)| match value {
                    Value::String(text) => (name, text),
                    other => (name, other.to_string()),
                })
                .collect()),
            other => Err(TemplateError::invalid_context(format!("expect a map or a struct, found {other}"))),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Context {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self { values: iter.into_iter().map(|(name, value)| (name.into(), value.into())).collect() }
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Context {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into() }
    }

    /// Reads the whole file; nothing is cached between calls.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| TemplateError::io(path, e))?;
        Ok(Self { source })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replaces known placeholders, keeps unknown ones verbatim.
    pub fn safe_substitute(&self, context: &Context) -> String {
        PLACEHOLDER
            .replace_all(&self.source, |caps: &Captures<'_>| match placeholder_name(caps) {
                Some(name) => context.get(name).unwrap_or(&caps[0]).to_string(),
                // escaped `$$`, or a lone `$` that starts no placeholder
                None => "$".to_string(),
            })
            .into_owned()
    }

    /// Like [`safe_substitute`](Self::safe_substitute), but fails on the first
    /// placeholder without a value and on a `$` that starts no placeholder.
    pub fn substitute(&self, context: &Context) -> Result<String, TemplateError> {
        for caps in PLACEHOLDER.captures_iter(&self.source) {
            if let Some(invalid) = caps.name("invalid") {
                return Err(TemplateError::InvalidPlaceholder { position: invalid.start() - 1 });
            }
            if let Some(name) = placeholder_name(&caps) {
                if !context.contains(name) {
                    return Err(TemplateError::missing_placeholder(name));
                }
            }
        }

        Ok(self.safe_substitute(context))
    }
}

fn placeholder_name<'t>(caps: &Captures<'t>) -> Option<&'t str> {
    caps.name("named").or_else(|| caps.name("braced")).map(|m| m.as_str())
}

/// A response rendered from a template file.
///
/// The file is read and rendered by [`render`](Self::render), with safe
/// substitution; the resulting response yields the whole document as a
/// single chunk.
#[derive(Debug, Clone)]
pub struct TemplateResponse {
    path: PathBuf,
    context: Context,
    status: u16,
    content_type: Mime,
    charset: Charset,
}

impl TemplateResponse {
    pub fn new(path: impl Into<PathBuf>, context: Context) -> Self {
        Self { path: path.into(), context, status: 200, content_type: mime::TEXT_HTML, charset: Charset::default() }
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn content_type(mut self, content_type: Mime) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    pub fn render(self) -> Result<Response, TemplateError> {
        let template = Template::from_path(&self.path)?;
        let rendered = template.safe_substitute(&self.context);
        debug!(path = %self.path.display(), size = rendered.len(), "template rendered");

        Ok(Response::builder()
            .body(Body::once(rendered))
            .status(self.status)
            .content_type(self.content_type)
            .charset(self.charset)
            .build())
    }
}

impl Responder for TemplateResponse {
    fn respond(self) -> Result<Response, HandlerError> {
        self.render().map_err(Into::into)
    }
}
