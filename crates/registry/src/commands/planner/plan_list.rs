use async_trait::async_trait;
use graphctl_engine::{
    Command, CommandAction, CommandBuilder, GraphError, GroupRef, InvocationContext, SchemaError, fetch_all_items,
    telemetry, validators,
};
use graphctl_types::{ArgumentBag, CommandError, OptionDeclaration};

use crate::commands::log_items;
use crate::names;

pub(crate) const OWNER_GROUP_ID: &str = "ownerGroupId";
pub(crate) const OWNER_GROUP_NAME: &str = "ownerGroupName";

/// Read the owner group of a planner command, failing when neither owner
/// option is present.
pub(crate) fn owner_group(args: &ArgumentBag) -> Result<GroupRef, CommandError> {
    GroupRef::from_args(args, OWNER_GROUP_ID, OWNER_GROUP_NAME).ok_or_else(|| {
        CommandError::validation(format!("Specify either {} or {}", OWNER_GROUP_ID, OWNER_GROUP_NAME))
    })
}

fn plans_path(group_id: &str) -> String {
    format!("/v1.0/groups/{}/planner/plans", group_id)
}

struct PlanList;

#[async_trait]
impl CommandAction for PlanList {
    async fn run(&self, ctx: &InvocationContext, args: &ArgumentBag) -> Result<(), GraphError> {
        let group_id = owner_group(args)?.resolve(ctx).await?;
        let plans = fetch_all_items(ctx, &ctx.graph_url(&plans_path(&group_id))).await?;
        log_items(ctx, plans, false);
        Ok(())
    }
}

/// `planner plan list`: plans owned by a Microsoft 365 group.
pub fn command() -> Result<Command, SchemaError> {
    CommandBuilder::graph(names::planner::PLAN_LIST, "Returns a list of plans associated with a specified group")
        .register_options([
            OptionDeclaration::optional(OWNER_GROUP_ID)
                .with_description("ID of the Group that owns the plan. Specify either ownerGroupId or ownerGroupName"),
            OptionDeclaration::optional(OWNER_GROUP_NAME).with_description(
                "Name of the Group that owns the plan. Specify either ownerGroupId or ownerGroupName",
            ),
        ])
        .register_validator(validators::exactly_one_of(OWNER_GROUP_ID, OWNER_GROUP_NAME))
        .register_validator(validators::guid(OWNER_GROUP_ID))
        .register_telemetry(telemetry::presence(&[OWNER_GROUP_ID, OWNER_GROUP_NAME]))
        .default_properties(["id", "title", "createdDateTime", "owner"])
        .build(PlanList)
}
