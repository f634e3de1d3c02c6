use tracing::info;

use kotoba_types::models::{Role, User};

use crate::context::Context;
use crate::error::DiaryError;
use crate::identity::Identity;

/// Create `users/{id}` on first sign-in. An existing profile wins: later
/// name or role inputs are ignored and the stored profile is returned.
pub async fn ensure_profile(
    ctx: &Context,
    identity: &Identity,
    name: &str,
    role: Option<Role>,
) -> Result<User, DiaryError> {
    let name = name.trim();
    let role = match role {
        Some(role) if !name.is_empty() => role,
        _ => return Err(DiaryError::Invalid("name and role are required".into())),
    };

    let id = identity.user_id.clone();
    let email = identity.email.clone();
    let name = name.to_string();
    let created = ctx
        .with_store(move |store| store.insert_user_if_absent(&id, &email, &name, role.as_str()))
        .await?;

    if created {
        info!("Created {} profile for {}", role, identity.user_id);
    }

    load_user(ctx, &identity.user_id).await
}

/// Read a profile; a missing profile or role is `NotFound`.
pub async fn load_user(ctx: &Context, user_id: &str) -> Result<User, DiaryError> {
    let id = user_id.to_string();
    let row = ctx
        .with_store(move |store| store.get_user(&id))
        .await?
        .ok_or_else(|| DiaryError::not_found(format!("profile for {}", user_id)))?;

    let role = row
        .role
        .ok_or_else(|| DiaryError::not_found(format!("role for {}", user_id)))?;
    let role = role.parse::<Role>().map_err(DiaryError::UnknownRole)?;

    Ok(User {
        id: row.id,
        email: row.email.unwrap_or_default(),
        name: row.name.unwrap_or_default(),
        role,
    })
}

/// Display name for greetings, `fallback` when the profile has none.
pub async fn display_name(ctx: &Context, user_id: &str, fallback: &str) -> Result<String, DiaryError> {
    let id = user_id.to_string();
    let name = ctx
        .with_store(move |store| store.get_user(&id))
        .await?
        .and_then(|row| row.name)
        .filter(|name| !name.is_empty());

    Ok(name.unwrap_or_else(|| fallback.to_string()))
}
