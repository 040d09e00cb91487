use graphctl_util::encode_path_segment;
use percent_encoding::percent_decode_str;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::context::InvocationContext;
use crate::error::GraphError;

/// Resolve a SharePoint site web URL to its Graph site id
/// (`host,siteCollectionId,webId`).
///
/// Lookup and HTTP failures propagate unchanged.
pub async fn site_id_by_url(ctx: &InvocationContext, web_url: &str) -> Result<String, GraphError> {
    let url = ctx.graph_url(&site_lookup_path(web_url)?);
    let body = ctx.get_json(&url).await?;

    let id = body
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| GraphError::malformed(&url, "site response has no 'id'"))?;
    debug!(%web_url, site_id = %id, "site resolved by web URL");
    Ok(id.to_string())
}

/// `/v1.0/sites/{host}:{path}?$select=id`, or `/v1.0/sites/{host}?$select=id`
/// for the root site.
fn site_lookup_path(web_url: &str) -> Result<String, GraphError> {
    let parsed = Url::parse(web_url).map_err(|error| GraphError::InvalidUrl {
        value: web_url.to_string(),
        reason: error.to_string(),
    })?;
    let host = parsed.host_str().ok_or_else(|| GraphError::InvalidUrl {
        value: web_url.to_string(),
        reason: "the URL has no host".to_string(),
    })?;

    let segments: Vec<String> = parsed
        .path_segments()
        .map(|segments| {
            segments
                .filter(|segment| !segment.is_empty())
                .map(reencode_segment)
                .collect()
        })
        .unwrap_or_default();

    if segments.is_empty() {
        return Ok(format!("/v1.0/sites/{}?$select=id", host));
    }
    Ok(format!("/v1.0/sites/{}:/{}?$select=id", host, segments.join("/")))
}

/// Segments from `Url` arrive percent-encoded; decode before encoding so
/// the result is encoded exactly once.
fn reencode_segment(segment: &str) -> String {
    encode_path_segment(&percent_decode_str(segment).decode_utf8_lossy())
}
