//! The response envelope returned by handlers.
//!
//! A [`Response`] carries a [`Body`], a status code together with its status
//! line, a content type, a [`Charset`] and the header collection. Right after
//! construction the headers hold exactly one `content-type` header built from
//! the content type and the charset; changing either field afterwards does not
//! touch the headers.
//!
//! ```
//! use tonkey_web::response::Response;
//!
//! let response = Response::new("Hi Ann");
//! assert_eq!(response.status(), "200 OK");
//! assert_eq!(response.headers()["content-type"], "text/html; charset=utf-8");
//!
//! let bytes: Vec<u8> = response.into_chunks().flat_map(|chunk| chunk.unwrap().to_vec()).collect();
//! assert_eq!(bytes, b"Hi Ann");
//! ```

mod body;
mod charset;

pub use body::Body;
pub use body::Chunk;
pub use body::Chunks;
pub use charset::Charset;

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, StatusCode};
use mime::Mime;
use thiserror::Error;
use tracing::error;

/// Reason phrase used for status codes without a canonical one
pub const UNKNOWN_REASON: &str = "UNKNOWN";

#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("unknown charset: {name}")]
    UnknownCharset { name: String },

    #[error("character {character:?} at position {position} can't be encoded with {charset}")]
    Unencodable { character: char, position: usize, charset: Charset },
}

impl ResponseError {
    pub fn unknown_charset<S: ToString>(name: S) -> Self {
        Self::UnknownCharset { name: name.to_string() }
    }

    pub fn unencodable(character: char, position: usize, charset: Charset) -> Self {
        Self::Unencodable { character, position, charset }
    }
}

#[derive(Debug)]
pub struct Response {
    body: Body,
    status_code: u16,
    status: String,
    content_type: Mime,
    charset: Charset,
    headers: HeaderMap,
}

impl Response {
    /// A `200 OK`, `text/html; charset=utf-8` response.
    pub fn new(body: impl Into<Body>) -> Self {
        Self::builder().body(body).build()
    }

    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::new()
    }

    /// The status line, `"<code> <reason>"`.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Sets the status code and recomputes the status line.
    ///
    /// Codes without a canonical reason phrase get [`UNKNOWN_REASON`].
    pub fn set_status(&mut self, status_code: u16) {
        self.status_code = status_code;
        self.status = status_line(status_code);
    }

    pub fn content_type(&self) -> &Mime {
        &self.content_type
    }

    /// Changes the content type field only; the `content-type` header keeps its value.
    pub fn set_content_type(&mut self, content_type: Mime) {
        self.content_type = content_type;
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Changes the charset used for encoding text chunks; the `content-type`
    /// header keeps its value.
    pub fn set_charset(&mut self, charset: Charset) {
        self.charset = charset;
    }

    /// The `content-type` value for the current content type and charset.
    pub fn content_type_value(&self) -> String {
        content_type_value(&self.content_type, self.charset)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// The headers as name/value pairs, the form the gateway announces them in.
    pub fn header_items(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str().to_string(), String::from_utf8_lossy(value.as_bytes()).into_owned()))
            .collect()
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Consumes the response into its encoded byte stream.
    pub fn into_chunks(self) -> Chunks {
        self.body.into_chunks(self.charset)
    }
}

impl IntoIterator for Response {
    type Item = Result<bytes::Bytes, ResponseError>;
    type IntoIter = Chunks;

    fn into_iter(self) -> Self::IntoIter {
        self.into_chunks()
    }
}

#[derive(Debug)]
pub struct ResponseBuilder {
    body: Body,
    status_code: u16,
    content_type: Mime,
    charset: Charset,
}

impl ResponseBuilder {
    fn new() -> Self {
        Self { body: Body::empty(), status_code: 200, content_type: mime::TEXT_HTML, charset: Charset::default() }
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(mut self, status_code: u16) -> Self {
        self.status_code = status_code;
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

    /// Builds the response and seeds the `content-type` header.
    pub fn build(self) -> Response {
        let mut headers = HeaderMap::with_capacity(8);
        let value = content_type_value(&self.content_type, self.charset);
        match HeaderValue::try_from(value) {
            Ok(value) => {
                headers.insert(CONTENT_TYPE, value);
            }
            Err(e) => error!(cause = %e, content_type = %self.content_type, "content type is not a valid header value"),
        }

        Response {
            body: self.body,
            status_code: self.status_code,
            status: status_line(self.status_code),
            content_type: self.content_type,
            charset: self.charset,
            headers,
        }
    }
}

fn status_line(status_code: u16) -> String {
    let reason = StatusCode::from_u16(status_code).ok().and_then(|status| status.canonical_reason()).unwrap_or(UNKNOWN_REASON);
    format!("{status_code} {reason}")
}

fn content_type_value(content_type: &Mime, charset: Charset) -> String {
    let mut value = content_type.essence_str().to_string();
    for (name, param) in content_type.params().filter(|(name, _)| *name != mime::CHARSET) {
        value.push_str("; ");
        value.push_str(name.as_str());
        value.push('=');
        push_param_value(&mut value, param.as_str());
    }
    value.push_str("; charset=");
    value.push_str(charset.as_str());
    value
}

/// Writes a parameter value, as a quoted string unless it is a plain token.
fn push_param_value(dst: &mut String, param: &str) {
    if !param.is_empty() && param.bytes().all(is_token_byte) {
        dst.push_str(param);
        return;
    }

    dst.push('"');
    for c in param.chars() {
        if c == '"' || c == '\\' {
            dst.push('\\');
        }
        dst.push(c);
    }
    dst.push('"');
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

#[cfg(test)]
mod tests {
    use super::{Charset, Response};
    use bytes::Bytes;
    use http::header::CONTENT_TYPE;

    #[test]
    fn test_default_response() {
        let response = Response::new("hello");

        assert_eq!(response.status(), "200 OK");
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.content_type(), &mime::TEXT_HTML);
        assert_eq!(response.charset(), Charset::Utf8);
        assert_eq!(response.headers().get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
    }

    #[test]
    fn test_standard_status_lines() {
        let cases = [
            (200, "200 OK"),
            (201, "201 Created"),
            (301, "301 Moved Permanently"),
            (404, "404 Not Found"),
            (418, "418 I'm a teapot"),
            (500, "500 Internal Server Error"),
            (503, "503 Service Unavailable"),
        ];

        for (code, line) in cases {
            let response = Response::builder().status(code).build();
            assert_eq!(response.status(), line);
        }
    }

    #[test]
    fn test_unknown_status_line() {
        let mut response = Response::builder().status(599).build();
        assert_eq!(response.status(), "599 UNKNOWN");

        response.set_status(42);
        assert_eq!(response.status(), "42 UNKNOWN");
        assert_eq!(response.status_code(), 42);

        response.set_status(204);
        assert_eq!(response.status(), "204 No Content");
    }

    #[test]
    fn test_content_type_header_follows_construction() {
        let response = Response::builder().content_type(mime::TEXT_PLAIN).charset(Charset::Latin1).build();

        assert_eq!(response.headers().get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain; charset=iso-8859-1");
    }

    #[test]
    fn test_content_type_params_keep_charset_last() {
        let content_type = "text/plain; format=flowed; charset=ascii".parse().unwrap();
        let response = Response::builder().content_type(content_type).build();

        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain; format=flowed; charset=utf-8");
    }

    #[test]
    fn test_content_type_params_are_requoted() {
        let content_type = r#"text/plain; title="a b;c=d""#.parse().unwrap();
        let response = Response::builder().content_type(content_type).build();
        assert_eq!(response.headers()[CONTENT_TYPE], r#"text/plain; title="a b;c=d"; charset=utf-8"#);

        let content_type = r#"text/plain; dir="C:\temp"; format=flowed"#.parse().unwrap();
        let response = Response::builder().content_type(content_type).build();
        assert_eq!(response.content_type_value(), r#"text/plain; dir="C:\\temp"; format=flowed; charset=utf-8"#);
    }

    #[test]
    fn test_later_mutation_does_not_touch_headers() {
        let mut response = Response::new("x");
        response.set_content_type(mime::APPLICATION_JSON);
        response.set_charset(Charset::Ascii);

        assert_eq!(response.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
        assert_eq!(response.content_type_value(), "application/json; charset=us-ascii");
    }

    #[test]
    fn test_header_items() {
        let mut response = Response::new("x");
        response.headers_mut().insert("x-request-id", "42".parse().unwrap());

        let items = response.header_items();
        assert_eq!(items.len(), 2);
        assert!(items.contains(&("content-type".to_string(), "text/html; charset=utf-8".to_string())));
        assert!(items.contains(&("x-request-id".to_string(), "42".to_string())));
    }

    #[test]
    fn test_charset_applies_to_text_chunks() {
        let response = Response::builder().body("é").charset(Charset::Latin1).build();
        let chunks: Vec<Bytes> = response.into_iter().map(Result::unwrap).collect();
        assert_eq!(chunks, vec![Bytes::from_static(&[0xe9])]);
    }
}
