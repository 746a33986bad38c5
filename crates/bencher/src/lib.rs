//! Shared fixtures for the benchmarks.

#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    input: &'static str,
}

impl TestCase {
    pub const fn new(name: &'static str, input: &'static str) -> Self {
        Self { name, input }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn input(&self) -> &'static str {
        self.input
    }

    pub fn len(&self) -> usize {
        self.input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }
}

pub const SMALL_REQUEST: TestCase = TestCase::new("small_request", "GET /greet/Ann?lang=en HTTP/1.1\r\nHost: 127.0.0.1:8080\r\nAccept: */*\r\n\r\n");

pub const LARGE_REQUEST: TestCase = TestCase::new(
    "large_request",
    "GET /search?q=rust+web+glue&page=2&sort=desc&filter=a&filter=b HTTP/1.1\r\n\
     Host: 127.0.0.1:8080\r\n\
     User-Agent: Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0\r\n\
     Accept: text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8\r\n\
     Accept-Language: en-US,en;q=0.5\r\n\
     Accept-Encoding: gzip, deflate, br, zstd\r\n\
     Referer: http://127.0.0.1:8080/search?q=rust\r\n\
     Cookie: session=4f1c2a9e8b7d6c5e; theme=dark; consent=yes\r\n\
     Connection: keep-alive\r\n\
     Upgrade-Insecure-Requests: 1\r\n\
     Cache-Control: max-age=0\r\n\r\n",
);

/// Request paths used by the routing benchmark, from first route to no route
pub const PATHS: [&str; 5] = ["/", "/users/42", "/users/42/posts/7", "/static/css/site.css", "/missing/path"];
