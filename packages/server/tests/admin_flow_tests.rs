//! Integration tests for the admin add-project conversation.

mod common;

use common::{fixtures, lazy_deps, TestHarness, ADMIN_TELEGRAM_ID};
use test_context::test_context;
use verify_core::bot::{handle_event, messages, BotEvent};
use verify_core::domains::admin::actions::{
    cancel_add_project, confirm_add_project, start_add_project, submit_project_name,
    CallbackOutcome, NameOutcome,
};
use verify_core::domains::admin::{AdminAction, AdminCallback, AdminStep, ADD_PROJECT};
use verify_core::domains::projects::Project;
use verify_core::kernel::{MockChatMessenger, SentMessage};

fn is_hex(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_hexdigit())
}

async fn named_action(ctx: &TestHarness, chat_id: i64, name: &str) -> AdminAction {
    start_add_project(chat_id, ctx.deps()).await.unwrap();
    match submit_project_name(chat_id, name, ctx.deps()).await.unwrap() {
        NameOutcome::AwaitingConfirmation(action) => action,
        other => panic!("expected confirmation step, got {:?}", other),
    }
}

async fn count_projects_named(ctx: &TestHarness, name: &str) -> usize {
    Project::find_all(&ctx.db_pool)
        .await
        .unwrap()
        .into_iter()
        .filter(|p| p.name == name)
        .count()
}

#[tokio::test]
async fn test_unknown_callback_is_answered() {
    let messenger = MockChatMessenger::new();
    let deps = lazy_deps(&messenger);

    handle_event(
        BotEvent::Callback {
            query_id: "q-unknown".to_string(),
            chat_id: ADMIN_TELEGRAM_ID,
            from_id: ADMIN_TELEGRAM_ID,
            data: "something_else:1".to_string(),
        },
        &deps,
    )
    .await
    .unwrap();

    assert_eq!(
        messenger.sent(),
        vec![SentMessage::CallbackAnswer {
            callback_id: "q-unknown".to_string(),
            text: messages::SESSION_EXPIRED.to_string(),
        }]
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_confirm_creates_one_project(ctx: &TestHarness) {
    let chat_id = fixtures::unique_chat_id();
    let name = format!("Confirmed {}", chat_id);
    let action = named_action(ctx, chat_id, &format!("  {}  ", name)).await;
    assert_eq!(action.step, AdminStep::AwaitingConfirmation);
    assert_eq!(action.project_name(), Some(name.as_str()));

    let project = match confirm_add_project(chat_id, action.id, ctx.deps()).await.unwrap() {
        CallbackOutcome::Created(project) => project,
        other => panic!("expected a project, got {:?}", other),
    };
    assert_eq!(project.name, name);
    assert!(project.is_active);
    assert_eq!(project.api_key.len(), 48);
    assert!(is_hex(&project.api_key));
    assert_eq!(project.invite_code.len(), 8);
    assert!(is_hex(&project.invite_code));

    let stored = AdminAction::find_by_id(action.id, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(stored.step, AdminStep::Completed);
    assert!(stored.expires_at < chrono::Utc::now());

    // A second press changes nothing
    let again = confirm_add_project(chat_id, action.id, ctx.deps()).await.unwrap();
    assert!(matches!(again, CallbackOutcome::Stale));
    assert_eq!(count_projects_named(ctx, &name).await, 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_cancel_creates_nothing(ctx: &TestHarness) {
    let chat_id = fixtures::unique_chat_id();
    let name = format!("Cancelled {}", chat_id);
    let action = named_action(ctx, chat_id, &name).await;

    let outcome = cancel_add_project(chat_id, action.id, ctx.deps()).await.unwrap();
    assert!(matches!(outcome, CallbackOutcome::Cancelled));

    let outcome = confirm_add_project(chat_id, action.id, ctx.deps()).await.unwrap();
    assert!(matches!(outcome, CallbackOutcome::Stale));
    assert_eq!(count_projects_named(ctx, &name).await, 0);

    let stored = AdminAction::find_by_id(action.id, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(stored.step, AdminStep::Cancelled);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_invalid_names_keep_waiting(ctx: &TestHarness) {
    let chat_id = fixtures::unique_chat_id();
    let action = start_add_project(chat_id, ctx.deps()).await.unwrap();

    for text in ["   ", "/start", "/add_project"] {
        let outcome = submit_project_name(chat_id, text, ctx.deps()).await.unwrap();
        assert!(matches!(outcome, NameOutcome::Rejected), "{:?}", text);
    }

    let latest = AdminAction::find_latest(chat_id, ADD_PROJECT, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, action.id);
    assert_eq!(latest.step, AdminStep::AwaitingName);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_text_without_action(ctx: &TestHarness) {
    let chat_id = fixtures::unique_chat_id();
    let outcome = submit_project_name(chat_id, "Orphan", ctx.deps()).await.unwrap();
    assert!(matches!(outcome, NameOutcome::NoActiveAction));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_superseded_action_is_stale(ctx: &TestHarness) {
    let chat_id = fixtures::unique_chat_id();
    let name = format!("Superseded {}", chat_id);
    let old = named_action(ctx, chat_id, &name).await;

    // A new /add_project makes the old prompt's buttons stale
    start_add_project(chat_id, ctx.deps()).await.unwrap();

    let outcome = confirm_add_project(chat_id, old.id, ctx.deps()).await.unwrap();
    assert!(matches!(outcome, CallbackOutcome::Stale));
    assert_eq!(count_projects_named(ctx, &name).await, 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_expired_action_is_stale(ctx: &TestHarness) {
    let chat_id = fixtures::unique_chat_id();
    let name = format!("Expired {}", chat_id);
    let action = named_action(ctx, chat_id, &name).await;

    sqlx::query("UPDATE admin_actions SET expires_at = NOW() - INTERVAL '1 minute' WHERE id = $1")
        .bind(action.id)
        .execute(&ctx.db_pool)
        .await
        .unwrap();

    let outcome = confirm_add_project(chat_id, action.id, ctx.deps()).await.unwrap();
    assert!(matches!(outcome, CallbackOutcome::Stale));
    let outcome = cancel_add_project(chat_id, action.id, ctx.deps()).await.unwrap();
    assert!(matches!(outcome, CallbackOutcome::Stale));
    assert_eq!(count_projects_named(ctx, &name).await, 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_callback_from_other_chat_is_stale(ctx: &TestHarness) {
    let chat_id = fixtures::unique_chat_id();
    let action = named_action(ctx, chat_id, "Foreign").await;

    let other_chat = fixtures::unique_chat_id();
    let outcome = confirm_add_project(other_chat, action.id, ctx.deps()).await.unwrap();
    assert!(matches!(outcome, CallbackOutcome::Stale));

    let stored = AdminAction::find_by_id(action.id, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(stored.step, AdminStep::AwaitingConfirmation);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_concurrent_confirms_create_once(ctx: &TestHarness) {
    let chat_id = fixtures::unique_chat_id();
    let name = format!("Double tap {}", chat_id);
    let action = named_action(ctx, chat_id, &name).await;

    let (a, b) = tokio::join!(
        confirm_add_project(chat_id, action.id, ctx.deps()),
        confirm_add_project(chat_id, action.id, ctx.deps()),
    );
    let created = [a.unwrap(), b.unwrap()]
        .iter()
        .filter(|o| matches!(o, CallbackOutcome::Created(_)))
        .count();
    assert_eq!(created, 1);
    assert_eq!(count_projects_named(ctx, &name).await, 1);
}

// ============================================================================
// Through the bot dispatcher
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_non_admin_is_refused(ctx: &TestHarness) {
    let chat_id = fixtures::unique_chat_id();
    handle_event(
        BotEvent::AddProject {
            chat_id,
            from_id: chat_id,
        },
        ctx.deps(),
    )
    .await
    .unwrap();

    assert_eq!(
        ctx.messenger.last_to(chat_id),
        Some(SentMessage::Text {
            chat_id,
            text: messages::PERMISSION_DENIED.to_string()
        })
    );
    assert!(AdminAction::find_latest(chat_id, ADD_PROJECT, &ctx.db_pool)
        .await
        .unwrap()
        .is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_bot_conversation_end_to_end(ctx: &TestHarness) {
    let chat_id = fixtures::unique_chat_id();
    let from_id = ADMIN_TELEGRAM_ID;
    let name = format!("Bot made {}", chat_id);

    handle_event(BotEvent::AddProject { chat_id, from_id }, ctx.deps())
        .await
        .unwrap();
    assert_eq!(
        ctx.messenger.last_to(chat_id).unwrap().text(),
        messages::ASK_PROJECT_NAME
    );

    handle_event(
        BotEvent::Text {
            chat_id,
            from_id,
            text: name.clone(),
        },
        ctx.deps(),
    )
    .await
    .unwrap();

    let choices = match ctx.messenger.last_to(chat_id) {
        Some(SentMessage::Choices { text, choices, .. }) => {
            assert_eq!(text, messages::confirm_project_name(&name));
            choices
        }
        other => panic!("expected confirmation buttons, got {:?}", other),
    };
    assert_eq!(choices.len(), 2);
    assert!(matches!(
        AdminCallback::parse(&choices[0].data),
        Some(AdminCallback::Confirm(_))
    ));
    assert!(matches!(
        AdminCallback::parse(&choices[1].data),
        Some(AdminCallback::Cancel(_))
    ));

    handle_event(
        BotEvent::Callback {
            query_id: "q-1".to_string(),
            chat_id,
            from_id,
            data: choices[0].data.clone(),
        },
        ctx.deps(),
    )
    .await
    .unwrap();

    let sent = ctx.messenger.sent();
    assert!(sent.contains(&SentMessage::CallbackAnswer {
        callback_id: "q-1".to_string(),
        text: messages::CREATED_TOAST.to_string(),
    }));
    let report = ctx.messenger.last_to(chat_id).unwrap();
    assert!(report.text().starts_with("Project created."));
    assert!(report.text().contains(&name));
    assert!(report.text().contains("API-KEY: "));
    assert_eq!(count_projects_named(ctx, &name).await, 1);

    // Pressing confirm again only answers the toast
    handle_event(
        BotEvent::Callback {
            query_id: "q-2".to_string(),
            chat_id,
            from_id,
            data: choices[0].data.clone(),
        },
        ctx.deps(),
    )
    .await
    .unwrap();
    assert!(ctx.messenger.sent().contains(&SentMessage::CallbackAnswer {
        callback_id: "q-2".to_string(),
        text: messages::SESSION_EXPIRED.to_string(),
    }));
    assert_eq!(count_projects_named(ctx, &name).await, 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_bot_linking_replies(ctx: &TestHarness) {
    let project = fixtures::create_test_project(ctx.deps(), "Bot link").await.unwrap();
    let chat_id = fixtures::unique_chat_id();

    handle_event(
        BotEvent::Start {
            chat_id,
            payload: Some(project.invite_code.clone()),
        },
        ctx.deps(),
    )
    .await
    .unwrap();
    assert!(matches!(
        ctx.messenger.last_to(chat_id),
        Some(SentMessage::ContactRequest { .. })
    ));

    // Someone else's contact card is refused
    handle_event(
        BotEvent::Contact {
            chat_id,
            from_id: chat_id,
            contact_user_id: Some(chat_id + 1),
            phone: "998907778899".to_string(),
            username: String::new(),
        },
        ctx.deps(),
    )
    .await
    .unwrap();
    assert_eq!(
        ctx.messenger.last_to(chat_id).unwrap().text(),
        messages::NOT_OWN_CONTACT
    );

    handle_event(
        BotEvent::Contact {
            chat_id,
            from_id: chat_id,
            contact_user_id: Some(chat_id),
            phone: "998907778899".to_string(),
            username: "bob".to_string(),
        },
        ctx.deps(),
    )
    .await
    .unwrap();
    assert_eq!(
        ctx.messenger.last_to(chat_id).unwrap().text(),
        messages::phone_linked("998907778899")
    );
}
