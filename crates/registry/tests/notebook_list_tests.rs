use std::sync::Arc;

use graphctl_engine::InvocationContext;
use graphctl_engine::testing::{RecordingLogger, RecordingTransport, offline_context};
use graphctl_registry::CommandRegistry;
use graphctl_registry::names::onenote::NOTEBOOK_LIST;
use graphctl_types::{ArgumentBag, ErrorKind};
use serde_json::{Value, json};

const USER_ID: &str = "2609af39-7775-4f94-a3dc-0dd67657e900";
const GROUP_ID: &str = "233e43d0-dc6a-482e-9b4e-0de7a7bce9b4";
const SITE_ID: &str = "contoso.sharepoint.com,8f9f2b1e-1d7a-4f3e-9a3b-2f6a1b0c9d8e,0d1f2e3c-4b5a-6978-8a9b-0c1d2e3f4a5b";

fn notebook() -> Value {
    json!({
        "id": "1-a8f0e7b9-4d51-4c68-a2f1-7c6b3de5f6a0",
        "displayName": "My Notebook",
        "createdDateTime": "2022-01-04T15:00:00Z"
    })
}

async fn run(transport: RecordingTransport, args: ArgumentBag) -> (Arc<RecordingTransport>, Arc<RecordingLogger>) {
    let transport = Arc::new(transport);
    let logger = Arc::new(RecordingLogger::default());
    let ctx = InvocationContext::new(transport.clone(), logger.clone(), "https://graph.microsoft.com");
    let registry = CommandRegistry::load().expect("commands");
    registry
        .get(NOTEBOOK_LIST)
        .expect("notebook list")
        .execute(&ctx, &args)
        .await
        .expect("notebooks listed");
    (transport, logger)
}

#[tokio::test]
async fn defaults_to_the_signed_in_user() {
    let url = "https://graph.microsoft.com/v1.0/me/onenote/notebooks";
    let (transport, logger) = run(
        RecordingTransport::new().respond_json(url, json!({"value": [notebook()]})),
        ArgumentBag::new(),
    )
    .await;

    assert_eq!(transport.requests(), vec![url.to_string()]);
    assert_eq!(logger.entries(), vec![json!([notebook()])]);
}

#[tokio::test]
async fn empty_results_are_still_logged() {
    let url = "https://graph.microsoft.com/v1.0/me/onenote/notebooks";
    let (_, logger) = run(RecordingTransport::new().respond_json(url, json!({"value": []})), ArgumentBag::new()).await;

    assert_eq!(logger.entries(), vec![json!([])]);
}

#[tokio::test]
async fn lists_notebooks_of_a_user_by_id_or_name() {
    let by_id = format!("https://graph.microsoft.com/v1.0/users/{}/onenote/notebooks", USER_ID);
    let (transport, _) = run(
        RecordingTransport::new().respond_json(&by_id, json!({"value": [notebook()]})),
        ArgumentBag::new().with("userId", USER_ID),
    )
    .await;
    assert_eq!(transport.requests(), vec![by_id]);

    let by_name = "https://graph.microsoft.com/v1.0/users/john@contoso.com/onenote/notebooks";
    let (transport, _) = run(
        RecordingTransport::new().respond_json(by_name, json!({"value": [notebook()]})),
        ArgumentBag::new().with("userName", "john@contoso.com"),
    )
    .await;
    assert_eq!(transport.requests(), vec![by_name.to_string()]);
}

#[tokio::test]
async fn group_names_are_resolved_first() {
    let lookup = "https://graph.microsoft.com/v1.0/groups?$filter=displayName eq 'Finance'&$select=id";
    let notebooks = format!("https://graph.microsoft.com/v1.0/groups/{}/onenote/notebooks", GROUP_ID);
    let (transport, logger) = run(
        RecordingTransport::new()
            .respond_json(lookup, json!({"value": [{"id": GROUP_ID}]}))
            .respond_json(&notebooks, json!({"value": [notebook()]})),
        ArgumentBag::new().with("groupName", "Finance"),
    )
    .await;

    assert_eq!(transport.requests(), vec![lookup.to_string(), notebooks]);
    assert_eq!(logger.log_count(), 1);
}

#[tokio::test]
async fn site_urls_are_resolved_first() {
    let lookup = "https://graph.microsoft.com/v1.0/sites/contoso.sharepoint.com:/sites/team?$select=id";
    let notebooks = format!("https://graph.microsoft.com/v1.0/sites/{}/onenote/notebooks", SITE_ID);
    let (transport, _) = run(
        RecordingTransport::new()
            .respond_json(lookup, json!({"id": SITE_ID}))
            .respond_json(&notebooks, json!({"value": [notebook()]})),
        ArgumentBag::new().with("webUrl", "https://contoso.sharepoint.com/sites/team"),
    )
    .await;

    assert_eq!(transport.requests(), vec![lookup.to_string(), notebooks]);
}

#[tokio::test]
async fn validation_messages_follow_check_order() {
    let registry = CommandRegistry::load().expect("commands");
    let command = registry.get(NOTEBOOK_LIST).expect("notebook list");

    let cases = [
        (ArgumentBag::new().with("userId", "abc"), "abc is not a valid GUID"),
        (ArgumentBag::new().with("groupId", "xyz"), "xyz is not a valid GUID"),
        (
            ArgumentBag::new().with("userId", USER_ID).with("userName", "john@contoso.com"),
            "Specify either userId or userName, but not both",
        ),
        (
            ArgumentBag::new().with("groupId", GROUP_ID).with("groupName", "Finance"),
            "Specify either groupId or groupName, but not both",
        ),
        (
            ArgumentBag::new().with("userId", USER_ID).with("groupId", GROUP_ID),
            "Specify only one of userId, userName, groupId, groupName or webUrl",
        ),
    ];

    let ctx = offline_context();
    for (args, expected) in cases {
        let outcome = command.validate(&ctx, &args).await.expect("validated");
        assert_eq!(outcome.reason(), Some(expected), "{:?}", args);
    }
}

#[tokio::test]
async fn rejected_invocations_make_no_requests() {
    let transport = Arc::new(RecordingTransport::new());
    let ctx = InvocationContext::new(transport.clone(), Arc::new(RecordingLogger::default()), "https://graph.microsoft.com");
    let registry = CommandRegistry::load().expect("commands");
    let args = ArgumentBag::new().with("groupId", GROUP_ID).with("webUrl", "https://contoso.sharepoint.com");

    let error = registry
        .get(NOTEBOOK_LIST)
        .expect("notebook list")
        .execute(&ctx, &args)
        .await
        .expect_err("rejected");

    assert_eq!(error.kind(), ErrorKind::Validation);
    assert_eq!(transport.call_count(), 0);
}
