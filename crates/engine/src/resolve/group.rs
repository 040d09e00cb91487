use graphctl_types::ArgumentBag;
use graphctl_util::encode_odata_literal;
use tracing::debug;

use crate::context::InvocationContext;
use crate::error::GraphError;
use crate::odata::Page;

/// A group given either directly by id or by display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupRef {
    Id(String),
    Name(String),
}

impl GroupRef {
    /// Read a group reference from a pair of mutually exclusive options.
    /// The id option wins when a validator let both through.
    pub fn from_args(args: &ArgumentBag, id_option: &str, name_option: &str) -> Option<Self> {
        args.get_str(id_option)
            .map(|id| Self::Id(id.to_string()))
            .or_else(|| args.get_str(name_option).map(|name| Self::Name(name.to_string())))
    }

    pub async fn resolve(&self, ctx: &InvocationContext) -> Result<String, GraphError> {
        match self {
            Self::Id(id) => Ok(id.clone()),
            Self::Name(name) => group_id_by_display_name(ctx, name).await,
        }
    }
}

/// Look up the id of the group whose display name equals `name`.
///
/// # Errors
/// - [`GraphError::NotFound`] when no group has that name.
/// - [`GraphError::Ambiguous`] when several do; the message lists their ids.
/// - Any failure of the lookup request itself.
pub async fn group_id_by_display_name(ctx: &InvocationContext, name: &str) -> Result<String, GraphError> {
    let url = ctx.graph_url(&format!(
        "/v1.0/groups?$filter=displayName eq '{}'&$select=id",
        encode_odata_literal(name)
    ));
    let page = Page::parse(&url, ctx.get_json(&url).await?)?;

    match super::ids(&page.items).as_slice() {
        [] => Err(GraphError::not_found(format!("The specified group '{}' does not exist.", name))),
        [id] => {
            debug!(group = %name, %id, "group resolved by display name");
            Ok((*id).to_string())
        }
        many => Err(GraphError::ambiguous(format!(
            "Multiple groups with name '{}' found: {}.",
            name,
            many.join(",")
        ))),
    }
}
