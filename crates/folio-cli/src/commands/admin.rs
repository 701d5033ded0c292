use anyhow::Result;
use folio_storage::Storage;

use crate::cli::AdminCommands;

pub async fn handle(cmd: AdminCommands, storage: &Storage) -> Result<()> {
    match cmd {
        AdminCommands::Grant { email } => set_admin(storage, &email, true).await,
        AdminCommands::Revoke { email } => set_admin(storage, &email, false).await,
        AdminCommands::List => list(storage).await,
    }
}

async fn set_admin(storage: &Storage, email: &str, is_admin: bool) -> Result<()> {
    let user = storage.set_admin(email, is_admin).await?;
    if user.is_admin {
        println!("✓ {} can now access the dashboard", user.email);
    } else {
        println!("✓ {} no longer has dashboard access", user.email);
    }
    Ok(())
}

async fn list(storage: &Storage) -> Result<()> {
    let users = storage.list_users().await?;

    if users.is_empty() {
        println!("No users registered.");
        return Ok(());
    }

    println!("Users:");
    for user in users {
        let role = if user.is_admin { "admin" } else { "user" };
        println!("  {} ({})", user.email, role);
        println!("    ID: {}", user.id);
    }

    Ok(())
}
