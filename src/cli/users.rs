// User listings for operators

use std::sync::Arc;

use crate::app_data::AppData;
use crate::coordinators::AdminCoordinator;

/// Print accounts waiting for approval
pub async fn print_pending(app_data: Arc<AppData>) -> Result<(), Box<dyn std::error::Error>> {
    let pending = AdminCoordinator::new(app_data).list_pending_users().await?;

    if pending.is_empty() {
        println!("No users awaiting approval.");
        return Ok(());
    }

    println!("{:<6} {:<20} {:<32} {}", "ID", "USERNAME", "EMAIL", "ROLE");
    for user in pending {
        println!("{:<6} {:<20} {:<32} {}", user.id, user.username, user.email, user.role);
    }
    Ok(())
}
