use notes_sdk::{
    notes_sdk_test::{MockCall, MockNotesService, MockResult},
    GeneratedSummary, PersistenceService, ServiceError, SummarizationService, SummaryRequest,
};

fn request(title: &str) -> SummaryRequest {
    SummaryRequest {
        meeting_title: title.to_string(),
        meeting_notes: "notes".to_string(),
        custom_instructions: String::new(),
    }
}

#[tokio::test]
async fn mock_service_tracks_calls_and_returns_results_in_order() {
    let service = MockNotesService::new();
    service
        .enqueue_create(MockResult::ok(()))
        .enqueue_create(MockResult::error(ServiceError::Invariant(
            "create error".to_string(),
        )))
        .enqueue_fetch(
            GeneratedSummary {
                summary: "# Weekly".to_string(),
            }
            .into(),
        );

    service
        .create_summary(request("Weekly"))
        .await
        .expect("first create should succeed");
    let err = service
        .create_summary(request("Again"))
        .await
        .expect_err("second create should fail");
    match err {
        ServiceError::Invariant(message) => assert_eq!(message, "create error"),
        other => panic!("unexpected error variant: {other:?}"),
    }
    let summary = service.fetch_summary().await.expect("fetch should succeed");
    assert_eq!(summary.summary, "# Weekly");

    assert_eq!(
        service.tracked_calls(),
        vec![
            MockCall::CreateSummary(request("Weekly")),
            MockCall::CreateSummary(request("Again")),
            MockCall::FetchSummary,
        ]
    );

    service.reset();
    assert!(service.tracked_calls().is_empty());
}

#[tokio::test]
async fn mock_service_fails_when_nothing_is_enqueued() {
    let service = MockNotesService::new();

    let err = service
        .list_history()
        .await
        .expect_err("list without results should fail");

    match err {
        ServiceError::Invariant(message) => {
            assert_eq!(message, "no mocked list_history results available");
        }
        other => panic!("unexpected error variant: {other:?}"),
    }
    assert_eq!(service.tracked_calls(), vec![MockCall::ListHistory]);
}

#[tokio::test]
async fn deferred_results_resolve_when_sent() {
    let service = MockNotesService::new();
    let (sender, deferred) = MockResult::deferred();
    service.enqueue_delete(deferred);

    let pending = service.delete_summary("7".to_string());
    sender.send(Ok(())).expect("receiver alive");
    pending.await.expect("delete resolves");

    let (sender, deferred) = MockResult::<()>::deferred();
    service.enqueue_delete(deferred);
    drop(sender);
    let err = service
        .delete_summary("8".to_string())
        .await
        .expect_err("dropped sender fails the call");
    assert!(matches!(err, ServiceError::Invariant(_)));

    assert_eq!(
        service.tracked_calls(),
        vec![
            MockCall::DeleteSummary("7".to_string()),
            MockCall::DeleteSummary("8".to_string()),
        ]
    );
}
