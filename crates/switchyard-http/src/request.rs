//! Request model: a read-only view over one inbound exchange.
//!
//! All fields are derived from the [`Exchange`] when the [`Request`] is built
//! and never change afterwards:
//!
//! - **path**: `/` when absent, always starting with `/`
//! - **method**: upper-cased
//! - **headers**: transport header names normalized to `Title-Case`
//!   (`USER_AGENT` and `user-agent` both become `User-Agent`), last value wins,
//!   with structured `Content-Type` / `Content-Length` merged in
//! - **query**: form-decoded, blank values kept, repeated keys collected
//! - **body**: exactly the declared `Content-Length` bytes, or empty

use std::collections::{BTreeMap, HashMap};
use std::io::Read;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{RequestError, RequestResult};
use crate::exchange::Exchange;

/// Upper bound on the buffer reserved up front for a declared body.
const MAX_BODY_PREALLOC: usize = 64 * 1024;

/// Value of a query (or form) parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// The key appeared once.
    Single(String),
    /// The key appeared more than once; values in occurrence order.
    Multiple(Vec<String>),
}

impl QueryValue {
    /// The value when the key appeared exactly once.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multiple(_) => None,
        }
    }

    /// The first value in occurrence order.
    #[must_use]
    pub fn first(&self) -> &str {
        match self {
            Self::Single(value) => value,
            Self::Multiple(values) => values.first().map_or("", String::as_str),
        }
    }

    /// All values in occurrence order.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Single(value) => vec![value.as_str()],
            Self::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            Self::Single(first) => {
                let first = std::mem::take(first);
                *self = Self::Multiple(vec![first, value]);
            }
            Self::Multiple(values) => values.push(value),
        }
    }
}

/// Decoded `application/x-www-form-urlencoded` parameters, in first-seen key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    entries: Vec<(String, QueryValue)>,
    index: HashMap<String, usize>,
}

impl Query {
    /// Decode a raw query string (`&`-separated, `+` and `%XX` decoded).
    ///
    /// A key without `=` is kept with an empty value.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut query = Self::default();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            let value = value.into_owned();
            match query.index.get(&*key) {
                Some(&slot) => query.entries[slot].1.push(value),
                None => {
                    let key = key.into_owned();
                    query.index.insert(key.clone(), query.entries.len());
                    query.entries.push((key, QueryValue::Single(value)));
                }
            }
        }
        query
    }

    /// Look up a parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    /// The value of a parameter that appeared exactly once.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(QueryValue::as_str)
    }

    /// The first value of a parameter, however often it appeared.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).map(QueryValue::first)
    }

    /// Whether the parameter is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate parameters in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalize a transport header name: `_` becomes `-` and each word is
/// title-cased, so `USER_AGENT`, `user-agent` and `User-Agent` agree.
#[must_use]
pub fn normalize_header_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_alpha = false;
    for c in raw.chars() {
        let c = if c == '_' { '-' } else { c };
        if c.is_ascii_alphabetic() {
            if prev_alpha {
                out.push(c.to_ascii_lowercase());
            } else {
                out.push(c.to_ascii_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// An immutable view of one inbound HTTP request.
#[derive(Debug, Clone)]
pub struct Request {
    path: String,
    method: String,
    headers: BTreeMap<String, String>,
    query: Query,
    body: Bytes,
}

impl Request {
    /// Build a request from the input side of an exchange.
    ///
    /// Reads the body at most once and never past the declared length. A
    /// missing, zero or non-numeric `Content-Length` yields an empty body
    /// without touching the body source.
    pub fn from_exchange<E: Exchange + ?Sized>(exchange: &mut E) -> RequestResult<Self> {
        let path = match exchange.path() {
            "" => "/".to_owned(),
            p if p.starts_with('/') => p.to_owned(),
            p => format!("/{p}"),
        };
        let method = match exchange.method() {
            "" => "GET".to_owned(),
            m => m.to_ascii_uppercase(),
        };
        let headers = collect_headers(exchange);
        let query = Query::parse(exchange.query_string());
        let body = read_body(exchange)?;

        Ok(Self {
            path,
            method,
            headers,
            query,
            body,
        })
    }

    /// Request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Upper-cased request method.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Headers keyed by normalized name.
    #[must_use]
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Look up a header; `name` is normalized first.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&normalize_header_name(name))
            .map(String::as_str)
    }

    /// Decoded query parameters.
    #[must_use]
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Raw body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The body as UTF-8 text.
    pub fn text(&self) -> RequestResult<&str> {
        std::str::from_utf8(&self.body).map_err(|_| RequestError::NotUtf8)
    }

    /// Decode the body as JSON. An empty body yields an empty object.
    pub fn json(&self) -> RequestResult<serde_json::Value> {
        if self.body.is_empty() {
            return Ok(serde_json::Value::Object(serde_json::Map::new()));
        }
        Ok(serde_json::from_str(self.text()?)?)
    }

    /// Decode the body as JSON into `T`. An empty body decodes from `{}`.
    pub fn json_as<T: DeserializeOwned>(&self) -> RequestResult<T> {
        if self.body.is_empty() {
            return Ok(serde_json::from_str("{}")?);
        }
        Ok(serde_json::from_str(self.text()?)?)
    }

    /// Decode a form-encoded body with the same rules as the query string.
    pub fn form(&self) -> RequestResult<Query> {
        Ok(Query::parse(self.text()?))
    }
}

fn collect_headers<E: Exchange + ?Sized>(exchange: &E) -> BTreeMap<String, String> {
    let mut headers: BTreeMap<String, String> = exchange
        .headers()
        .iter()
        .map(|(name, value)| (normalize_header_name(name), value.clone()))
        .collect();
    if let Some(content_type) = exchange.content_type() {
        headers.insert("Content-Type".to_owned(), content_type.to_owned());
    }
    if let Some(content_length) = exchange.content_length() {
        headers.insert("Content-Length".to_owned(), content_length.to_owned());
    }
    headers
}

fn read_body<E: Exchange + ?Sized>(exchange: &mut E) -> RequestResult<Bytes> {
    let declared = exchange
        .content_length()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .unwrap_or(0);
    if declared == 0 {
        return Ok(Bytes::new());
    }

    let capacity = usize::try_from(declared).unwrap_or(usize::MAX);
    let mut buf = Vec::with_capacity(capacity.min(MAX_BODY_PREALLOC));
    Read::take(exchange.body_reader(), declared).read_to_end(&mut buf)?;
    Ok(Bytes::from(buf))
}
