use notes_sdk::{
    notes_sdk_test::{MockCall, MockNotesService, MockResult},
    GeneratedSummary, ServiceError,
};
use notes_session::{EditorMode, SessionError, SummaryEditor};
use std::sync::Arc;

fn generated(text: &str) -> MockResult<GeneratedSummary> {
    GeneratedSummary {
        summary: text.to_string(),
    }
    .into()
}

fn failure() -> ServiceError {
    ServiceError::Decode("backend unavailable".to_string())
}

fn open_editor(service: &Arc<MockNotesService>, body: &str) -> SummaryEditor {
    let editor = SummaryEditor::new(service.clone(), service.clone());
    editor.materialize("Standup", body).unwrap();
    editor
}

#[test]
fn materialized_summary_starts_in_viewing() {
    let service = Arc::new(MockNotesService::new());
    let editor = open_editor(&service, "# Standup\n- Shipped X");

    let summary = editor.summary().expect("summary is open");
    assert_eq!(summary.body_text, "# Standup\n- Shipped X");
    assert_eq!(summary.mode, EditorMode::Viewing);
}

#[test]
fn enter_edit_seeds_draft_from_body() {
    let service = Arc::new(MockNotesService::new());
    let editor = open_editor(&service, "# Original");

    editor.enter_edit().expect("edit enabled");

    assert_eq!(
        editor.mode(),
        Some(EditorMode::Editing {
            draft: "# Original".to_string()
        })
    );
    assert!(matches!(
        editor.enter_edit(),
        Err(SessionError::Disabled("edit", _))
    ));
}

#[test]
fn cancel_edit_leaves_body_untouched() {
    let service = Arc::new(MockNotesService::new());
    let editor = open_editor(&service, "# Original");

    editor.enter_edit().unwrap();
    editor.set_draft("something else entirely").unwrap();
    editor.cancel_edit().expect("cancel enabled");

    assert_eq!(editor.body_text().as_deref(), Some("# Original"));
    assert_eq!(editor.mode(), Some(EditorMode::Viewing));
    assert!(editor.cancel_edit().is_err());
}

#[test]
fn draft_cannot_change_outside_edit_mode() {
    let service = Arc::new(MockNotesService::new());
    let editor = open_editor(&service, "# Original");

    let err = editor.set_draft("sneaky").expect_err("not editing");

    assert!(matches!(err, SessionError::Disabled("update draft", _)));
    assert_eq!(editor.body_text().as_deref(), Some("# Original"));
}

#[tokio::test]
async fn save_persists_draft_and_returns_to_viewing() {
    let service = Arc::new(MockNotesService::new());
    service
        .enqueue_update(MockResult::ok(()))
        .enqueue_fetch(generated("# Edited"));
    let editor = open_editor(&service, "# Original");
    editor.enter_edit().unwrap();
    editor.set_draft("# Edited").unwrap();

    let body = editor.save().await.expect("save succeeds");

    assert_eq!(body, "# Edited");
    assert_eq!(editor.body_text().as_deref(), Some("# Edited"));
    assert_eq!(editor.mode(), Some(EditorMode::Viewing));
    assert!(!editor.is_saving());
    assert_eq!(
        service.tracked_calls(),
        vec![
            MockCall::UpdateSummary("# Edited".to_string()),
            MockCall::FetchSummary,
        ]
    );
}

#[tokio::test]
async fn save_adopts_the_canonical_text() {
    let service = Arc::new(MockNotesService::new());
    service
        .enqueue_update(MockResult::ok(()))
        .enqueue_fetch(generated("# Edited\n"));
    let editor = open_editor(&service, "# Original");
    editor.enter_edit().unwrap();
    editor.set_draft("# Edited").unwrap();

    editor.save().await.expect("save succeeds");

    assert_eq!(editor.body_text().as_deref(), Some("# Edited\n"));
}

#[tokio::test]
async fn save_keeps_saved_text_when_refetch_fails() {
    let service = Arc::new(MockNotesService::new());
    service
        .enqueue_update(MockResult::ok(()))
        .enqueue_fetch(MockResult::error(failure()));
    let editor = open_editor(&service, "# Original");
    editor.enter_edit().unwrap();
    editor.set_draft("# Edited").unwrap();

    let body = editor.save().await.expect("update was confirmed");

    assert_eq!(body, "# Edited");
    assert_eq!(editor.body_text().as_deref(), Some("# Edited"));
    assert_eq!(editor.mode(), Some(EditorMode::Viewing));
}

#[tokio::test]
async fn failed_save_stays_in_edit_mode_with_draft() {
    let service = Arc::new(MockNotesService::new());
    service.enqueue_update(MockResult::error(failure()));
    let editor = open_editor(&service, "# Original");
    editor.enter_edit().unwrap();
    editor.set_draft("# Half written").unwrap();

    let err = editor.save().await.expect_err("save fails");

    assert!(matches!(err, SessionError::Service(_)));
    assert_eq!(
        editor.mode(),
        Some(EditorMode::Editing {
            draft: "# Half written".to_string()
        })
    );
    assert_eq!(editor.body_text().as_deref(), Some("# Original"));
    assert!(!editor.is_saving());
    assert_eq!(
        service.tracked_calls(),
        vec![MockCall::UpdateSummary("# Half written".to_string())]
    );
}

#[tokio::test]
async fn save_is_disabled_while_viewing() {
    let service = Arc::new(MockNotesService::new());
    let editor = open_editor(&service, "# Original");

    let err = editor.save().await.expect_err("not editing");

    assert!(matches!(err, SessionError::Disabled("save", _)));
    assert!(service.tracked_calls().is_empty());
}

#[tokio::test]
async fn edit_controls_are_locked_while_saving() {
    let service = Arc::new(MockNotesService::new());
    let (sender, deferred) = MockResult::deferred();
    service
        .enqueue_update(deferred)
        .enqueue_fetch(generated("# Edited"));
    let editor = open_editor(&service, "# Original");
    editor.enter_edit().unwrap();
    editor.set_draft("# Edited").unwrap();

    let save = editor.save();
    futures::pin_mut!(save);
    assert!(futures::poll!(&mut save).is_pending());
    assert!(editor.is_saving());
    assert!(editor.cancel_edit().is_err());
    assert!(editor.set_draft("late keystroke").is_err());
    assert!(editor.close().is_err());

    sender.send(Ok(())).expect("receiver alive");
    save.await.expect("save succeeds");
    assert_eq!(editor.body_text().as_deref(), Some("# Edited"));
}

#[test]
fn close_only_from_viewing() {
    let service = Arc::new(MockNotesService::new());
    let editor = open_editor(&service, "# Original");

    editor.enter_edit().unwrap();
    assert!(matches!(
        editor.close(),
        Err(SessionError::Disabled("close", _))
    ));

    editor.cancel_edit().unwrap();
    let closed = editor.close().expect("close from viewing");
    assert_eq!(closed.body_text, "# Original");
    assert_eq!(editor.summary(), None);
}

#[tokio::test]
async fn no_new_summary_is_opened_while_saving() {
    let service = Arc::new(MockNotesService::new());
    let (sender, deferred) = MockResult::deferred();
    service
        .enqueue_update(deferred)
        .enqueue_fetch(generated("# Edited"));
    let editor = open_editor(&service, "# Original");
    editor.enter_edit().unwrap();
    editor.set_draft("# Edited").unwrap();

    let save = editor.save();
    futures::pin_mut!(save);
    assert!(futures::poll!(&mut save).is_pending());
    assert!(matches!(
        editor.materialize("Retro", "# Retro"),
        Err(SessionError::Disabled("open summary", _))
    ));
    assert!(editor.is_saving());

    sender.send(Ok(())).expect("receiver alive");
    save.await.expect("save succeeds");
    let summary = editor.summary().expect("summary is open");
    assert_eq!(summary.title, "Standup");
    assert_eq!(summary.body_text, "# Edited");
}

#[tokio::test]
async fn dropped_save_keeps_the_draft_and_unlocks_editing() {
    let service = Arc::new(MockNotesService::new());
    let (_sender, deferred) = MockResult::deferred();
    service.enqueue_update(deferred);
    let editor = open_editor(&service, "# Original");
    editor.enter_edit().unwrap();
    editor.set_draft("# Edited").unwrap();

    {
        let save = editor.save();
        futures::pin_mut!(save);
        assert!(futures::poll!(&mut save).is_pending());
    }

    assert!(!editor.is_saving());
    assert_eq!(
        editor.mode(),
        Some(EditorMode::Editing {
            draft: "# Edited".to_string()
        })
    );
    editor.set_draft("# Edited again").expect("editing is unlocked");
}
