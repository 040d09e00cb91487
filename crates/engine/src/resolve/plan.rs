use serde::Deserialize;
use tracing::debug;

use crate::context::InvocationContext;
use crate::error::GraphError;
use crate::odata::fetch_all_items_as;

#[derive(Debug, Deserialize)]
struct PlanSummary {
    id: String,
    #[serde(default)]
    title: Option<String>,
}

/// Find the plan titled exactly `title` among the plans owned by `group_id`.
///
/// Titles are not unique within a group, so several matches are ambiguous.
pub async fn plan_id_by_title(ctx: &InvocationContext, group_id: &str, title: &str) -> Result<String, GraphError> {
    let url = ctx.graph_url(&format!("/v1.0/groups/{}/planner/plans", group_id));
    let plans: Vec<PlanSummary> = fetch_all_items_as(ctx, &url).await?;

    let mut matching: Vec<String> = plans
        .into_iter()
        .filter(|plan| plan.title.as_deref() == Some(title))
        .map(|plan| plan.id)
        .collect();

    match matching.len() {
        0 => Err(GraphError::not_found(format!("The specified plan '{}' does not exist.", title))),
        1 => {
            let id = matching.remove(0);
            debug!(plan = %title, %id, "plan resolved by title");
            Ok(id)
        }
        _ => Err(GraphError::ambiguous(format!(
            "Multiple plans with title '{}' found: {}.",
            title,
            matching.join(",")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingLogger, RecordingTransport};
    use serde_json::json;
    use std::sync::Arc;

    const GROUP_ID: &str = "233e43d0-dc6a-482e-9b4e-0de7a7bce9b4";
    const PLANS: &str = "https://graph.microsoft.com/v1.0/groups/233e43d0-dc6a-482e-9b4e-0de7a7bce9b4/planner/plans";

    fn context(transport: &Arc<RecordingTransport>) -> InvocationContext {
        InvocationContext::new(transport.clone(), Arc::new(RecordingLogger::default()), "https://graph.microsoft.com")
    }

    #[tokio::test]
    async fn matches_titles_across_pages() {
        let next = format!("{}?$skiptoken=abc", PLANS);
        let transport = Arc::new(
            RecordingTransport::new()
                .respond_json(PLANS, json!({"value": [{"id": "p1", "title": "Launch"}], "@odata.nextLink": next}))
                .respond_json(&next, json!({"value": [{"id": "p2", "title": "Roadmap"}]})),
        );

        let id = plan_id_by_title(&context(&transport), GROUP_ID, "Roadmap").await.expect("plan id");

        assert_eq!(id, "p2");
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn title_match_is_exact() {
        let transport = Arc::new(
            RecordingTransport::new().respond_json(PLANS, json!({"value": [{"id": "p1", "title": "roadmap"}]})),
        );

        let error = plan_id_by_title(&context(&transport), GROUP_ID, "Roadmap").await.expect_err("no plan");

        assert_eq!(error.to_string(), "The specified plan 'Roadmap' does not exist.");
    }

    #[tokio::test]
    async fn duplicate_titles_are_ambiguous() {
        let transport = Arc::new(RecordingTransport::new().respond_json(
            PLANS,
            json!({"value": [{"id": "p1", "title": "Roadmap"}, {"id": "p2", "title": "Roadmap"}]}),
        ));

        let error = plan_id_by_title(&context(&transport), GROUP_ID, "Roadmap").await.expect_err("ambiguous");

        assert!(matches!(error, GraphError::Ambiguous { .. }));
        assert_eq!(error.to_string(), "Multiple plans with title 'Roadmap' found: p1,p2.");
    }

    #[tokio::test]
    async fn plans_without_an_id_are_malformed() {
        let transport = Arc::new(RecordingTransport::new().respond_json(PLANS, json!({"value": [{"title": "Roadmap"}]})));

        let error = plan_id_by_title(&context(&transport), GROUP_ID, "Roadmap").await.expect_err("malformed");

        assert!(matches!(error, GraphError::MalformedResponse { .. }), "{:?}", error);
    }
}
