use async_trait::async_trait;
use graphctl_engine::{
    Command, CommandAction, CommandBuilder, GraphError, GroupRef, InvocationContext, SchemaError, fetch_all_items,
    site_id_by_url, telemetry, validators,
};
use graphctl_types::{ArgumentBag, OptionDeclaration};
use graphctl_util::encode_path_segment;

use crate::commands::log_items;
use crate::names;

const OWNER_OPTIONS: &[&str] = &["userId", "userName", "groupId", "groupName", "webUrl"];

/// Whose notebooks to list. Validation guarantees at most one owner option
/// was supplied; none means the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
enum NotebookOwner {
    Me,
    User(String),
    Group(GroupRef),
    Site { web_url: String },
}

impl NotebookOwner {
    fn from_args(args: &ArgumentBag) -> Self {
        if let Some(user) = args.get_str("userId").or_else(|| args.get_str("userName")) {
            return Self::User(user.to_string());
        }
        if let Some(group) = GroupRef::from_args(args, "groupId", "groupName") {
            return Self::Group(group);
        }
        match args.get_str("webUrl") {
            Some(web_url) => Self::Site {
                web_url: web_url.to_string(),
            },
            None => Self::Me,
        }
    }

    /// API-relative notebooks path, resolving names first where needed.
    async fn notebooks_path(&self, ctx: &InvocationContext) -> Result<String, GraphError> {
        let owner = match self {
            Self::Me => "me".to_string(),
            Self::User(user) => format!("users/{}", encode_path_segment(user)),
            Self::Group(group) => format!("groups/{}", group.resolve(ctx).await?),
            Self::Site { web_url } => format!("sites/{}", site_id_by_url(ctx, web_url).await?),
        };
        Ok(format!("/v1.0/{}/onenote/notebooks", owner))
    }
}

struct NotebookList;

#[async_trait]
impl CommandAction for NotebookList {
    async fn run(&self, ctx: &InvocationContext, args: &ArgumentBag) -> Result<(), GraphError> {
        let owner = NotebookOwner::from_args(args);
        let url = ctx.graph_url(&owner.notebooks_path(ctx).await?);
        let notebooks = fetch_all_items(ctx, &url).await?;
        log_items(ctx, notebooks, true);
        Ok(())
    }
}

/// `onenote notebook list`: notebooks of the current user, another user, a
/// group, or a SharePoint site.
pub fn command() -> Result<Command, SchemaError> {
    CommandBuilder::graph(names::onenote::NOTEBOOK_LIST, "Retrieve a list of notebooks")
        .register_options([
            OptionDeclaration::optional("userId").with_description("Id of the user. Specify either userId or userName"),
            OptionDeclaration::optional("userName")
                .with_description("Name of the user. Specify either userId or userName"),
            OptionDeclaration::optional("groupId")
                .with_description("Id of the group. Specify either groupId or groupName"),
            OptionDeclaration::optional("groupName")
                .with_description("Display name of the group. Specify either groupId or groupName"),
            OptionDeclaration::optional("webUrl")
                .with_short('u')
                .with_description("URL of the SharePoint site"),
        ])
        .register_validator(validators::guid("userId"))
        .register_validator(validators::guid("groupId"))
        .register_validator(validators::mutually_exclusive("userId", "userName"))
        .register_validator(validators::mutually_exclusive("groupId", "groupName"))
        .register_validator(validators::at_most_one_of(OWNER_OPTIONS))
        .register_telemetry(telemetry::presence(OWNER_OPTIONS))
        .default_properties(["createdDateTime", "displayName", "id"])
        .build(NotebookList)
}
