use crate::network::Connection;
use crate::network::error::Error;
use core::fmt::Write;
use heapless::{String, Vec};

/// Maximum headers per request or response.
pub const MAX_HEADERS: usize = 16;
/// Maximum header name length in bytes.
pub const MAX_HEADER_NAME_LEN: usize = 64;
/// Maximum header value length in bytes.
pub const MAX_HEADER_VALUE_LEN: usize = 256;

// One serialized request and one response each fit in a bounded scratch
// buffer scoped to a single exchange.
const REQUEST_CAPACITY: usize = 2048;
const RESPONSE_CAPACITY: usize = 2048;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

/// One request or response header.
#[derive(Debug, Clone)]
pub struct Header {
    pub name: String<MAX_HEADER_NAME_LEN>,
    pub value: String<MAX_HEADER_VALUE_LEN>,
}

impl Header {
    /// Build a header, failing if either part exceeds its bound.
    pub fn new(name: &str, value: &str) -> Result<Self, Error> {
        Ok(Self {
            name: String::try_from(name).map_err(|_| Error::BufferOverflow)?,
            value: String::try_from(value).map_err(|_| Error::BufferOverflow)?,
        })
    }
}

/// An outgoing request. Immutable once handed to [`Client::request`].
pub struct Request<'a> {
    pub method: Method,
    pub path: &'a str,
    pub headers: Vec<Header, MAX_HEADERS>,
    pub body: Option<&'a [u8]>,
}

/// A parsed response: status code, header block and body.
///
/// Owns bounded copies of the header and body bytes; nothing borrows from the
/// transport once this is returned.
#[derive(Debug)]
pub struct Response {
    pub status_code: u16,
    pub headers: Vec<Header, MAX_HEADERS>,
    pub body: Vec<u8, RESPONSE_CAPACITY>,
}

impl Response {
    /// Whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// HTTP/1.1 client over one established connection.
///
/// The connection is reused across requests (the caller is expected to ask
/// the server for keep-alive); only one exchange runs at a time.
pub struct Client<C: Connection> {
    connection: C,
}

impl<C: Connection> Client<C> {
    pub fn new(connection: C) -> Self {
        Self { connection }
    }

    /// Send `request` and block until the response is parsed.
    pub fn request(&mut self, request: &Request) -> Result<Response, Error> {
        let wire = serialize(request)?;

        self.connection.write(&wire).map_err(|_| Error::WriteError)?;
        self.connection.flush().map_err(|_| Error::WriteError)?;

        // Read until the header block terminator is seen; whatever body bytes
        // arrive with it are kept.
        let mut response_buf = [0u8; RESPONSE_CAPACITY];
        let mut total_read = 0;
        loop {
            match self.connection.read(&mut response_buf[total_read..]) {
                Ok(0) if total_read > 0 => break,
                Ok(0) => return Err(Error::ConnectionClosed),
                Ok(n) => {
                    total_read += n;
                    if total_read >= response_buf.len()
                        || find_slice(&response_buf[..total_read], b"\r\n\r\n").is_some()
                    {
                        break;
                    }
                }
                Err(_) => return Err(Error::ReadError),
            }
        }

        let response_data = &response_buf[..total_read];
        let header_end = find_slice(response_data, b"\r\n\r\n").ok_or(Error::ProtocolError)?;
        let header_str =
            core::str::from_utf8(&response_data[..header_end]).map_err(|_| Error::ProtocolError)?;

        let mut lines = header_str.lines();
        let status_code = parse_status_line(lines.next().ok_or(Error::ProtocolError)?)?;

        let mut headers: Vec<Header, MAX_HEADERS> = Vec::new();
        let mut content_length: Option<usize> = None;
        for line in lines {
            if line.is_empty() {
                continue;
            }
            let (name, value) = line.split_once(':').ok_or(Error::ProtocolError)?;
            let (name, value) = (name.trim(), value.trim());
            if name.eq_ignore_ascii_case("Content-Length") {
                content_length = value.parse::<usize>().ok();
            }
            headers
                .push(Header::new(name, value)?)
                .map_err(|_| Error::BufferOverflow)?;
        }

        let mut body: Vec<u8, RESPONSE_CAPACITY> =
            Vec::from_slice(&response_data[header_end + 4..]).map_err(|_| Error::BufferOverflow)?;
        if let Some(expected) = content_length {
            if expected > body.capacity() {
                return Err(Error::BufferOverflow);
            }
            self.read_remaining_body(&mut body, expected)?;
            body.truncate(expected);
        }

        Ok(Response {
            status_code,
            headers,
            body,
        })
    }

    fn read_remaining_body(
        &mut self,
        body: &mut Vec<u8, RESPONSE_CAPACITY>,
        expected: usize,
    ) -> Result<(), Error> {
        let mut chunk = [0u8; 256];
        while body.len() < expected {
            let wanted = (expected - body.len()).min(chunk.len());
            match self.connection.read(&mut chunk[..wanted]) {
                Ok(0) => return Err(Error::ConnectionClosed),
                Ok(n) => body
                    .extend_from_slice(&chunk[..n])
                    .map_err(|_| Error::BufferOverflow)?,
                Err(_) => return Err(Error::ReadError),
            }
        }
        Ok(())
    }
}

fn serialize(request: &Request) -> Result<Vec<u8, REQUEST_CAPACITY>, Error> {
    let mut wire: Vec<u8, REQUEST_CAPACITY> = Vec::new();

    push(&mut wire, request.method.as_str().as_bytes())?;
    push(&mut wire, b" ")?;
    push(&mut wire, request.path.as_bytes())?;
    push(&mut wire, b" HTTP/1.1\r\n")?;

    for header in &request.headers {
        push(&mut wire, header.name.as_bytes())?;
        push(&mut wire, b": ")?;
        push(&mut wire, header.value.as_bytes())?;
        push(&mut wire, b"\r\n")?;
    }

    match request.body {
        Some(body) => {
            let mut length: String<10> = String::new();
            write!(length, "{}", body.len()).map_err(|_| Error::BufferOverflow)?;
            push(&mut wire, b"Content-Length: ")?;
            push(&mut wire, length.as_bytes())?;
            push(&mut wire, b"\r\n\r\n")?;
            push(&mut wire, body)?;
        }
        None => push(&mut wire, b"\r\n")?,
    }

    Ok(wire)
}

fn push(wire: &mut Vec<u8, REQUEST_CAPACITY>, bytes: &[u8]) -> Result<(), Error> {
    wire.extend_from_slice(bytes).map_err(|_| Error::BufferOverflow)
}

fn parse_status_line(line: &str) -> Result<u16, Error> {
    // "HTTP/1.1 200 OK" - the reason phrase is ignored.
    let mut parts = line.splitn(3, ' ');
    parts.next();
    parts
        .next()
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or(Error::ProtocolError)
}

/// Finds the first occurrence of a slice in another slice and returns its starting position.
fn find_slice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
