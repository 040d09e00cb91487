//! Paginated collection retrieval.
//!
//! Graph collections arrive as pages shaped like
//! `{"value": [...], "@odata.nextLink": "https://..."}`. The fetcher follows
//! continuation links strictly one after another (a page's address is only
//! known once the previous page has arrived) and returns every item in
//! arrival order. There are no retries and no partial results: a failure on
//! any page fails the whole fetch.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::context::InvocationContext;
use crate::error::GraphError;

const ITEMS_FIELD: &str = "value";
const NEXT_LINK_FIELD: &str = "@odata.nextLink";

/// One server response of a paginated collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Value>,
    /// Absent on the terminal page.
    pub next_link: Option<String>,
}

impl Page {
    /// Split a page body into items and continuation link.
    ///
    /// `url` is only used for error context.
    pub fn parse(url: &str, body: Value) -> Result<Self, GraphError> {
        let Value::Object(mut fields) = body else {
            return Err(GraphError::malformed(url, "expected a JSON object page"));
        };
        let items = match fields.remove(ITEMS_FIELD) {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(GraphError::malformed(url, format!("'{}' is not an array", ITEMS_FIELD))),
            None => return Err(GraphError::malformed(url, format!("missing '{}' field", ITEMS_FIELD))),
        };
        let next_link = match fields.remove(NEXT_LINK_FIELD) {
            Some(Value::String(link)) if !link.is_empty() => Some(link),
            Some(Value::String(_)) | Some(Value::Null) | None => None,
            Some(_) => return Err(GraphError::malformed(url, format!("'{}' is not a string", NEXT_LINK_FIELD))),
        };
        Ok(Self { items, next_link })
    }

    pub fn is_terminal(&self) -> bool {
        self.next_link.is_none()
    }
}

/// Retrieve the entire collection starting at `url`.
///
/// # Errors
/// - Any transport, HTTP or malformed-page failure on any page.
/// - [`GraphError::PageLimitExceeded`] when the collection needs more pages
///   than the context's `max_pages` ceiling.
/// - [`GraphError::Cancelled`] when the invocation is cancelled mid-fetch.
pub async fn fetch_all_items(ctx: &InvocationContext, url: &str) -> Result<Vec<Value>, GraphError> {
    let mut items = Vec::new();
    let mut next_url = Some(url.to_string());
    let mut pages_fetched = 0usize;

    while let Some(current_url) = next_url.take() {
        if pages_fetched == ctx.max_pages() {
            warn!(
                %url,
                max_pages = ctx.max_pages(),
                items_discarded = items.len(),
                "page ceiling reached with continuation link pending"
            );
            return Err(GraphError::PageLimitExceeded {
                limit: ctx.max_pages(),
                url: url.to_string(),
            });
        }

        let body = ctx.get_json(&current_url).await?;
        let page = Page::parse(&current_url, body)?;
        pages_fetched += 1;
        debug!(
            page = pages_fetched,
            item_count = page.items.len(),
            has_next = !page.is_terminal(),
            "collection page fetched"
        );

        items.extend(page.items);
        next_url = page.next_link;
    }

    info!(%url, pages = pages_fetched, item_count = items.len(), "collection fetch completed");
    Ok(items)
}

/// Typed variant of [`fetch_all_items`]; an item that does not deserialize
/// into `T` is a malformed response.
pub async fn fetch_all_items_as<T: DeserializeOwned>(ctx: &InvocationContext, url: &str) -> Result<Vec<T>, GraphError> {
    fetch_all_items(ctx, url)
        .await?
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(|error| GraphError::malformed(url, error.to_string())))
        .collect()
}
