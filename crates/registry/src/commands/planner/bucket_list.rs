use async_trait::async_trait;
use graphctl_engine::{
    Command, CommandAction, CommandBuilder, GraphError, InvocationContext, SchemaError, fetch_all_items,
    plan_id_by_title, telemetry, validators,
};
use graphctl_types::{ArgumentBag, CommandError, OptionDeclaration, ValidationOutcome};
use graphctl_util::encode_path_segment;

use super::plan_list::{OWNER_GROUP_ID, OWNER_GROUP_NAME, owner_group};
use crate::commands::log_items;
use crate::names;

const PLAN_ID: &str = "planId";
const PLAN_NAME: &str = "planName";

/// The plan whose buckets to list.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BucketPlan {
    Id(String),
    /// Title lookup scoped to the owner group given by the owner options.
    Title(String),
}

impl BucketPlan {
    fn from_args(args: &ArgumentBag) -> Result<Self, CommandError> {
        if let Some(id) = args.get_str(PLAN_ID) {
            return Ok(Self::Id(id.to_string()));
        }
        args.get_str(PLAN_NAME)
            .map(|title| Self::Title(title.to_string()))
            .ok_or_else(|| CommandError::validation(format!("Specify either {} or {}", PLAN_ID, PLAN_NAME)))
    }

    async fn resolve(&self, ctx: &InvocationContext, args: &ArgumentBag) -> Result<String, GraphError> {
        match self {
            Self::Id(id) => Ok(id.clone()),
            Self::Title(title) => {
                let group_id = owner_group(args)?.resolve(ctx).await?;
                plan_id_by_title(ctx, &group_id, title).await
            }
        }
    }
}

/// Owner options only make sense together with `planName`, and then exactly
/// one of them is needed.
fn owner_matches_plan_reference(args: &ArgumentBag) -> ValidationOutcome {
    let owner_count = [OWNER_GROUP_ID, OWNER_GROUP_NAME]
        .iter()
        .filter(|option| args.is_set(option))
        .count();

    if args.is_set(PLAN_ID) && owner_count > 0 {
        return ValidationOutcome::reject(format!(
            "Don't specify {} or {} when using {}",
            OWNER_GROUP_ID, OWNER_GROUP_NAME, PLAN_ID
        ));
    }
    if args.is_set(PLAN_NAME) && owner_count != 1 {
        return ValidationOutcome::reject(format!(
            "Specify either {} or {} when using {}",
            OWNER_GROUP_ID, OWNER_GROUP_NAME, PLAN_NAME
        ));
    }
    ValidationOutcome::Accepted
}

struct BucketList;

#[async_trait]
impl CommandAction for BucketList {
    async fn run(&self, ctx: &InvocationContext, args: &ArgumentBag) -> Result<(), GraphError> {
        let plan_id = BucketPlan::from_args(args)?.resolve(ctx, args).await?;
        let url = ctx.graph_url(&format!("/v1.0/planner/plans/{}/buckets", encode_path_segment(&plan_id)));
        let buckets = fetch_all_items(ctx, &url).await?;
        log_items(ctx, buckets, false);
        Ok(())
    }
}

/// `planner bucket list`: buckets of a plan given by id, or by title within
/// its owner group.
pub fn command() -> Result<Command, SchemaError> {
    CommandBuilder::graph(names::planner::BUCKET_LIST, "Lists the Microsoft Planner buckets in a plan")
        .register_options([
            OptionDeclaration::optional(PLAN_ID).with_description("ID of the plan. Specify either planId or planName"),
            OptionDeclaration::optional(PLAN_NAME)
                .with_description("Name of the plan. Specify either planId or planName"),
            OptionDeclaration::optional(OWNER_GROUP_ID)
                .with_description("ID of the group to which the plan belongs. Use together with planName"),
            OptionDeclaration::optional(OWNER_GROUP_NAME)
                .with_description("Name of the group to which the plan belongs. Use together with planName"),
        ])
        .register_validator(validators::exactly_one_of(PLAN_ID, PLAN_NAME))
        .register_validator(validators::mutually_exclusive(OWNER_GROUP_ID, OWNER_GROUP_NAME))
        .register_validator(validators::guid(OWNER_GROUP_ID))
        .register_check(owner_matches_plan_reference)
        .register_telemetry(telemetry::presence(&[PLAN_ID, PLAN_NAME, OWNER_GROUP_ID, OWNER_GROUP_NAME]))
        .default_properties(["id", "name", "planId", "orderHint"])
        .build(BucketList)
}
