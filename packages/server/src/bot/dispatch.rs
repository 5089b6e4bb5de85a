//! Route bot events to domain actions and answer in the chat.

use anyhow::Result;
use tracing::{debug, error};

use super::events::BotEvent;
use super::messages;
use crate::common::VerifyError;
use crate::domains::admin::actions::{
    cancel_add_project, confirm_add_project, start_add_project, submit_project_name,
    CallbackOutcome, NameOutcome,
};
use crate::domains::admin::AdminCallback;
use crate::domains::linking::actions::{begin_session, resolve_session};
use crate::kernel::{ChatChoice, ServerDeps};

/// Handle one event. Domain failures become chat replies; only messenger
/// failures are returned.
pub async fn handle_event(event: BotEvent, deps: &ServerDeps) -> Result<()> {
    match event {
        BotEvent::Start { chat_id, payload } => on_start(chat_id, payload, deps).await,
        BotEvent::AddProject { chat_id, from_id } => on_add_project(chat_id, from_id, deps).await,
        BotEvent::Contact {
            chat_id,
            from_id,
            contact_user_id,
            phone,
            username,
        } => {
            if contact_user_id != Some(from_id) {
                debug!(chat_id, from_id, "Ignoring contact that is not the sender's own");
                return deps.messenger.send_text(chat_id, messages::NOT_OWN_CONTACT).await;
            }
            on_contact(chat_id, &phone, &username, deps).await
        }
        BotEvent::Text {
            chat_id,
            from_id,
            text,
        } => on_text(chat_id, from_id, &text, deps).await,
        BotEvent::Callback {
            query_id,
            chat_id,
            from_id,
            data,
        } => on_callback(&query_id, chat_id, from_id, &data, deps).await,
    }
}

async fn on_start(chat_id: i64, payload: Option<String>, deps: &ServerDeps) -> Result<()> {
    let Some(invite_code) = payload else {
        return deps.messenger.send_text(chat_id, messages::START_USAGE).await;
    };

    match begin_session(chat_id, &invite_code, deps).await {
        Ok(_) => {
            deps.messenger
                .request_contact(chat_id, messages::SHARE_PHONE, messages::SHARE_PHONE_BUTTON)
                .await
        }
        Err(VerifyError::ProjectNotFound) => {
            deps.messenger.send_text(chat_id, messages::PROJECT_NOT_FOUND).await
        }
        Err(e) => reply_failure(chat_id, e, deps).await,
    }
}

async fn on_add_project(chat_id: i64, from_id: i64, deps: &ServerDeps) -> Result<()> {
    if !deps.is_admin(from_id) {
        return deps.messenger.send_text(chat_id, messages::PERMISSION_DENIED).await;
    }

    match start_add_project(chat_id, deps).await {
        Ok(_) => deps.messenger.send_text(chat_id, messages::ASK_PROJECT_NAME).await,
        Err(e) => reply_failure(chat_id, e, deps).await,
    }
}

async fn on_contact(chat_id: i64, phone: &str, username: &str, deps: &ServerDeps) -> Result<()> {
    let reply = match resolve_session(chat_id, phone, username, deps).await {
        Ok(identity) => messages::phone_linked(&identity.phone),
        Err(VerifyError::Validation(_)) => messages::PHONE_UNREADABLE.to_string(),
        Err(VerifyError::SessionNotFound) => messages::SESSION_NOT_FOUND.to_string(),
        Err(VerifyError::ProjectInactive) => messages::PROJECT_INACTIVE.to_string(),
        Err(e) => return reply_failure(chat_id, e, deps).await,
    };
    deps.messenger.send_text(chat_id, &reply).await
}

async fn on_text(chat_id: i64, from_id: i64, text: &str, deps: &ServerDeps) -> Result<()> {
    if deps.is_admin(from_id) {
        match submit_project_name(chat_id, text, deps).await {
            Ok(NameOutcome::AwaitingConfirmation(action)) => {
                let name = action.project_name().unwrap_or_default();
                let choices = [
                    ChatChoice::new(
                        messages::CONFIRM_BUTTON,
                        AdminCallback::Confirm(action.id).to_string(),
                    ),
                    ChatChoice::new(
                        messages::CANCEL_BUTTON,
                        AdminCallback::Cancel(action.id).to_string(),
                    ),
                ];
                return deps
                    .messenger
                    .send_choices(chat_id, &messages::confirm_project_name(name), &choices)
                    .await;
            }
            Ok(NameOutcome::Rejected) => {
                return deps.messenger.send_text(chat_id, messages::NAME_AS_PLAIN_TEXT).await;
            }
            Ok(NameOutcome::NoActiveAction) => {}
            Err(e) => return reply_failure(chat_id, e, deps).await,
        }
    }

    deps.messenger.send_text(chat_id, messages::DEFAULT_PROMPT).await
}

async fn on_callback(
    query_id: &str,
    chat_id: i64,
    from_id: i64,
    data: &str,
    deps: &ServerDeps,
) -> Result<()> {
    if !deps.is_admin(from_id) {
        return deps.messenger.answer_callback(query_id, messages::PERMISSION_DENIED).await;
    }

    let Some(callback) = AdminCallback::parse(data) else {
        debug!(chat_id, data, "Unknown callback data");
        return deps.messenger.answer_callback(query_id, messages::SESSION_EXPIRED).await;
    };

    let outcome = match callback {
        AdminCallback::Confirm(action_id) => confirm_add_project(chat_id, action_id, deps).await,
        AdminCallback::Cancel(action_id) => cancel_add_project(chat_id, action_id, deps).await,
    };

    match outcome {
        Ok(CallbackOutcome::Created(project)) => {
            deps.messenger.answer_callback(query_id, messages::CREATED_TOAST).await?;
            deps.messenger
                .send_text(chat_id, &messages::project_created(&project))
                .await
        }
        Ok(CallbackOutcome::Cancelled) => {
            deps.messenger.answer_callback(query_id, messages::CANCELLED_TOAST).await?;
            deps.messenger.send_text(chat_id, messages::CREATION_CANCELLED).await
        }
        Ok(CallbackOutcome::Stale) => {
            deps.messenger.answer_callback(query_id, messages::SESSION_EXPIRED).await
        }
        Err(e) => {
            error!(chat_id, error = %e, "Admin callback failed");
            deps.messenger.answer_callback(query_id, messages::GENERIC_ERROR).await
        }
    }
}

async fn reply_failure(chat_id: i64, e: VerifyError, deps: &ServerDeps) -> Result<()> {
    error!(chat_id, error = %e, "Bot event failed");
    deps.messenger.send_text(chat_id, messages::GENERIC_ERROR).await
}
