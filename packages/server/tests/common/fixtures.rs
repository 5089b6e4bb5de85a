//! Test fixtures for creating test data.
//!
//! These fixtures go through the same actions the bot and the API use.

use anyhow::Result;
use std::sync::atomic::{AtomicI64, Ordering};
use verify_core::domains::linking::actions::{begin_session, resolve_session};
use verify_core::domains::linking::LinkedIdentity;
use verify_core::domains::projects::actions::create_project;
use verify_core::domains::projects::Project;
use verify_core::kernel::ServerDeps;

static NEXT_CHAT: AtomicI64 = AtomicI64::new(0);

/// A chat id no other test in this run uses.
///
/// Start sessions are keyed by chat alone, so tests sharing the database must
/// never share a chat.
pub fn unique_chat_id() -> i64 {
    let base = 1_000_000_000 + i64::from(rand::random::<u32>() % 1_000_000) * 1_000;
    base + NEXT_CHAT.fetch_add(1, Ordering::SeqCst)
}

/// Create an active project with a unique name
pub async fn create_test_project(deps: &ServerDeps, name: &str) -> Result<Project> {
    let name = format!("{} {}", name, uuid::Uuid::new_v4().simple());
    Ok(create_project(&name, &deps.db_pool).await?)
}

/// Run the deep link + contact handshake for a chat
pub async fn link_phone(
    deps: &ServerDeps,
    project: &Project,
    chat_id: i64,
    phone: &str,
) -> Result<LinkedIdentity> {
    begin_session(chat_id, &project.invite_code, deps).await?;
    Ok(resolve_session(chat_id, phone, "tester", deps).await?)
}
