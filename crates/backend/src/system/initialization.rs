use anyhow::Result;
use sea_orm::DatabaseConnection;

use crate::shared::config::BootstrapConfig;
use crate::system::users::{repository, service};

/// Ensure an admin account exists (create one if the user table is empty)
pub async fn ensure_admin_user_exists(
    conn: &DatabaseConnection,
    bootstrap: &BootstrapConfig,
) -> Result<()> {
    let count = repository::count_users(conn).await?;
    if count > 0 {
        tracing::info!("{} user account(s) present", count);
        return Ok(());
    }

    tracing::info!("No users found. Creating default admin user...");

    let admin_id =
        service::create_initial_admin(conn, &bootstrap.admin_email, &bootstrap.admin_password)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create default admin: {}", e))?;

    tracing::warn!("Default admin user created: {} (id {})", bootstrap.admin_email, admin_id);
    tracing::warn!("Change the bootstrap password after first login");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::open_in_memory;

    #[tokio::test]
    async fn test_admin_seeded_once() {
        let conn = open_in_memory().await.unwrap();
        let bootstrap = BootstrapConfig::default();

        ensure_admin_user_exists(&conn, &bootstrap).await.unwrap();
        ensure_admin_user_exists(&conn, &bootstrap).await.unwrap();

        let users = repository::list_all(&conn).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "admin@localhost");
        assert_eq!(users[0].role, "ADMIN");
    }
}
