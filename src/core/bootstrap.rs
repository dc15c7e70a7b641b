use uuid::Uuid;

use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::{PublishStatus, UserRole};
use crate::repositories;

/// Creates the configured admin account, or brings an existing one back to admin with the
/// configured password.
pub(crate) async fn ensure_admin(state: &AppState) -> anyhow::Result<()> {
    let admin = state.settings().admin();
    if admin.first_admin_email.is_empty() || admin.first_admin_password.is_empty() {
        tracing::info!("FIRST_ADMIN_EMAIL/FIRST_ADMIN_PASSWORD not set; skipping admin bootstrap");
        return Ok(());
    }

    let email = &admin.first_admin_email;
    let existing = repositories::users::find_by_email(state.db(), email).await?;

    let Some(user) = existing else {
        let hashed_password = security::hash_password(&admin.first_admin_password)?;
        repositories::users::create(
            state.db(),
            repositories::users::CreateUser {
                id: &Uuid::new_v4().to_string(),
                name: "Administrator",
                email,
                hashed_password,
                role: UserRole::Admin,
                publish: PublishStatus::Yes,
                created_at: primitive_now_utc(),
            },
        )
        .await?;

        tracing::info!(email = %email, action = "admin_bootstrap", "Created default admin");
        return Ok(());
    };

    let verified = security::verify_password(&admin.first_admin_password, &user.hashed_password)
        .unwrap_or(false);

    if verified && user.role == UserRole::Admin {
        tracing::info!("Default admin already up to date");
        return Ok(());
    }

    let hashed_password = if verified {
        None
    } else {
        Some(security::hash_password(&admin.first_admin_password)?)
    };

    repositories::users::update(
        state.db(),
        &user.id,
        repositories::users::UpdateUser {
            hashed_password,
            role: Some(UserRole::Admin),
            ..Default::default()
        },
    )
    .await?;

    tracing::info!(email = %email, action = "admin_bootstrap", "Updated default admin");
    Ok(())
}
