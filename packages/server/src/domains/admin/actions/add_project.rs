//! Add-project conversation actions
//!
//! `/add_project` -> name -> confirm | cancel. Each step is a conditional
//! write on the persisted [`AdminAction`], so a stale button or a replayed
//! message cannot move a conversation that has already moved on.

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};

use crate::common::{AdminActionId, VerifyResult};
use crate::domains::admin::machines::{validate_project_name, ADD_PROJECT};
use crate::domains::admin::models::{AdminAction, AdminStep};
use crate::domains::projects::keys::{generate_api_key, generate_invite_code};
use crate::domains::projects::models::Project;
use crate::kernel::ServerDeps;

/// Result of feeding a text message to the admin conversation
#[derive(Debug)]
pub enum NameOutcome {
    /// No live action is waiting for a name
    NoActiveAction,
    /// Text was not an acceptable name; still waiting for one
    Rejected,
    /// Name stored, confirmation pending
    AwaitingConfirmation(AdminAction),
}

/// Result of a confirm or cancel button press
#[derive(Debug)]
pub enum CallbackOutcome {
    Created(Project),
    Cancelled,
    /// Not the authoritative action, expired, or already finished
    Stale,
}

/// Open a new add-project conversation. Any older one for the chat stops
/// being authoritative.
pub async fn start_add_project(chat_id: i64, deps: &ServerDeps) -> VerifyResult<AdminAction> {
    let action = AdminAction::create(
        chat_id,
        ADD_PROJECT,
        AdminStep::AwaitingName,
        json!({}),
        Utc::now() + deps.policy.admin_action_ttl,
        &deps.db_pool,
    )
    .await?;

    info!(chat_id, action_id = %action.id, "Add-project conversation started");
    Ok(action)
}

/// Treat `text` as the project name for the chat's live conversation.
pub async fn submit_project_name(
    chat_id: i64,
    text: &str,
    deps: &ServerDeps,
) -> VerifyResult<NameOutcome> {
    let now = Utc::now();
    let action = match AdminAction::find_latest(chat_id, ADD_PROJECT, &deps.db_pool).await? {
        Some(action) if action.is_live(now) && action.step == AdminStep::AwaitingName => action,
        _ => return Ok(NameOutcome::NoActiveAction),
    };

    let Some(name) = validate_project_name(text) else {
        debug!(chat_id, action_id = %action.id, "Rejected project name");
        return Ok(NameOutcome::Rejected);
    };

    let advanced = AdminAction::advance(
        action.id,
        AdminStep::AwaitingName,
        AdminStep::AwaitingConfirmation,
        json!({ "name": name }),
        now + deps.policy.admin_action_ttl,
        now,
        &deps.db_pool,
    )
    .await?;

    Ok(match advanced {
        Some(action) => {
            info!(chat_id, action_id = %action.id, "Project name received, awaiting confirmation");
            NameOutcome::AwaitingConfirmation(action)
        }
        None => NameOutcome::NoActiveAction,
    })
}

/// Finish the conversation and create the project, atomically.
pub async fn confirm_add_project(
    chat_id: i64,
    action_id: AdminActionId,
    deps: &ServerDeps,
) -> VerifyResult<CallbackOutcome> {
    let mut tx = deps.db_pool.begin().await?;

    let finished = AdminAction::finish(
        action_id,
        chat_id,
        ADD_PROJECT,
        AdminStep::Completed,
        Utc::now(),
        &mut *tx,
    )
    .await?;

    let Some(action) = finished else {
        tx.rollback().await?;
        debug!(chat_id, action_id = %action_id, "Stale add-project confirmation");
        return Ok(CallbackOutcome::Stale);
    };

    let name = action.project_name().unwrap_or("Untitled");
    let project = Project::create(name, &generate_api_key(), &generate_invite_code(), &mut *tx).await?;
    tx.commit().await?;

    info!(
        chat_id,
        action_id = %action.id,
        project_id = %project.id,
        "Project created from admin chat"
    );
    Ok(CallbackOutcome::Created(project))
}

/// Abandon the conversation. No project is created.
pub async fn cancel_add_project(
    chat_id: i64,
    action_id: AdminActionId,
    deps: &ServerDeps,
) -> VerifyResult<CallbackOutcome> {
    let finished = AdminAction::finish(
        action_id,
        chat_id,
        ADD_PROJECT,
        AdminStep::Cancelled,
        Utc::now(),
        &deps.db_pool,
    )
    .await?;

    Ok(match finished {
        Some(action) => {
            info!(chat_id, action_id = %action.id, "Add-project conversation cancelled");
            CallbackOutcome::Cancelled
        }
        None => CallbackOutcome::Stale,
    })
}
