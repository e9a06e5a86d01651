//! Pagination planning for search results
//!
//! A search query maps to an unbounded sequence of result-page addresses. The
//! number of pages that actually exist is only learned after the first page
//! is parsed, so URL construction never depends on it: callers simply stop
//! consuming [`PageUrls`] once they have taken enough addresses.

use std::fmt;

use ::url::form_urlencoded;

/// A search phrase that has already been percent-encoded for a query string
///
/// The planner only accepts this type, so a phrase can never be encoded twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedQuery(String);

impl EncodedQuery {
    /// Encodes a human-entered phrase (`application/x-www-form-urlencoded`)
    ///
    /// # Example
    ///
    /// ```
    /// use vacancy_finder::url::EncodedQuery;
    ///
    /// let query = EncodedQuery::encode("rust developer");
    /// assert_eq!(query.as_str(), "rust+developer");
    /// ```
    pub fn encode(raw: &str) -> Self {
        Self(form_urlencoded::byte_serialize(raw.as_bytes()).collect())
    }

    /// Wraps a value the caller has already encoded
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Returns the encoded text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncodedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds result-page addresses for one search endpoint
///
/// Produced addresses have the shape
/// `{base}?{query_param}={query}&{page_param}={page}&{fixed params...}`.
/// Pages are zero-indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePlanner {
    base_url: String,
    query_param: String,
    page_param: String,
    fixed_params: Vec<(String, String)>,
}

impl PagePlanner {
    /// Creates a planner using `text` and `page` as parameter names
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            query_param: "text".to_string(),
            page_param: "page".to_string(),
            fixed_params: Vec::new(),
        }
    }

    /// Overrides the name of the search phrase parameter
    pub fn with_query_param(mut self, name: impl Into<String>) -> Self {
        self.query_param = name.into();
        self
    }

    /// Overrides the name of the page index parameter
    pub fn with_page_param(mut self, name: impl Into<String>) -> Self {
        self.page_param = name.into();
        self
    }

    /// Appends a parameter sent with every page request
    ///
    /// The value is encoded here; names are used verbatim.
    pub fn with_param(mut self, name: impl Into<String>, value: &str) -> Self {
        let value = form_urlencoded::byte_serialize(value.as_bytes()).collect();
        self.fixed_params.push((name.into(), value));
        self
    }

    /// Returns the search endpoint without query string
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the address of result page `page` for `query`
    ///
    /// Pure and deterministic: equal inputs always give equal output, and
    /// distinct page indices give distinct addresses.
    pub fn url_for_page(&self, query: &EncodedQuery, page: usize) -> String {
        let mut url = format!(
            "{}?{}={}&{}={}",
            self.base_url, self.query_param, query, self.page_param, page
        );

        for (name, value) in &self.fixed_params {
            url.push('&');
            url.push_str(name);
            url.push('=');
            url.push_str(value);
        }

        url
    }

    /// Returns the lazy sequence of every result-page address for `query`
    pub fn page_urls(&self, query: &EncodedQuery) -> PageUrls {
        PageUrls {
            planner: self.clone(),
            query: query.clone(),
            next_page: Some(0),
        }
    }
}

/// Lazily produced result-page addresses, starting at page 0
///
/// The sequence is unbounded; bound it with `take`. Cloning yields an
/// independent iterator from the same position, and
/// [`PagePlanner::page_urls`] always restarts from page 0.
#[derive(Debug, Clone)]
pub struct PageUrls {
    planner: PagePlanner,
    query: EncodedQuery,
    next_page: Option<usize>,
}

impl PageUrls {
    /// Index of the page the next call to `next` will produce
    pub fn next_page(&self) -> Option<usize> {
        self.next_page
    }
}

impl Iterator for PageUrls {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let page = self.next_page?;
        self.next_page = page.checked_add(1);
        Some(self.planner.url_for_page(&self.query, page))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next_page {
            Some(_) => (usize::MAX, None),
            None => (0, Some(0)),
        }
    }
}
