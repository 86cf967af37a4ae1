use std::collections::BTreeSet;

use crate::AppData;
use crate::config::database::{begin_transaction, commit_transaction};
use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::providers::crypto_provider::generate_secure_password;
use crate::providers::user_provider::registration_message;
use crate::stores::GrantSet;
use crate::types::internal::{DashboardTab, NewUser, Permission, RoleName};

/// What `ensure_bootstrapped` changed. All zero/false on a settled store.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub roles_created: usize,
    pub tabs_created: usize,
    pub permissions_granted: usize,
    pub root_created: bool,
    /// A non-super-admin account held the reserved username and was deleted
    pub stale_root_replaced: bool,
    /// Set only when the root account was created without `ROOT_PASSWORD`
    pub generated_password: Option<String>,
}

impl BootstrapReport {
    pub fn changed_anything(&self) -> bool {
        self.roles_created > 0 || self.tabs_created > 0 || self.permissions_granted > 0 || self.root_created
    }
}

/// Seed reference data and make sure a super-admin exists.
///
/// Safe on every start: each insert is gated by an existence check and
/// the whole run is one transaction.
pub async fn ensure_bootstrapped(app_data: &AppData) -> Result<BootstrapReport, InternalError> {
    let stores = &app_data.stores;
    let root = app_data.settings.root();
    let mut report = BootstrapReport::default();

    let txn = begin_transaction(&app_data.db).await?;

    report.roles_created = stores.roles.ensure_roles(&txn).await?;
    report.tabs_created = stores.tabs.ensure_tabs(&txn, &DashboardTab::ALL).await?;
    if report.tabs_created > 0 {
        tracing::info!(count = report.tabs_created, "Created dashboard tabs");
    }

    for permission in Permission::ALL {
        if stores
            .roles
            .grant_permission(&txn, RoleName::SuperAdmin, permission)
            .await?
        {
            report.permissions_granted += 1;
        }
    }
    if report.permissions_granted > 0 {
        tracing::info!(count = report.permissions_granted, "Granted super admin permissions");
    }

    if stores.users.find_first_with_role(&txn, RoleName::SuperAdmin).await?.is_some() {
        tracing::debug!("Super admin already exists");
    } else {
        tracing::info!(username = %root.username, "No super admin found, creating one");

        if let Some(stale) = stores.users.find_by_username(&txn, &root.username).await? {
            tracing::warn!(user_id = stale.id, role = %stale.role_name, "Deleting stale account holding the reserved username");
            stores.users.delete(&txn, stale.id).await?;
            report.stale_root_replaced = true;
        }

        if let Some(holder) = stores.users.find_by_email(&txn, &root.email).await? {
            tracing::error!(
                email = %root.email,
                user_id = holder.id,
                username = %holder.username,
                "ROOT_EMAIL is already used by another account; set a different ROOT_EMAIL to create the super admin"
            );
            return Err(CredentialError::duplicate_email(&root.email));
        }

        let password = match &root.password {
            Some(password) => password.clone(),
            None => {
                let generated = generate_secure_password();
                report.generated_password = Some(generated.clone());
                generated
            }
        };

        let created = stores
            .users
            .create(
                &txn,
                NewUser {
                    username: root.username.clone(),
                    email: root.email.clone(),
                    password_digest: app_data.hasher.hash(&password)?,
                    first_name: "Super".to_string(),
                    last_name: "Admin".to_string(),
                    role: RoleName::SuperAdmin,
                },
            )
            .await?;

        let all_tabs: BTreeSet<i32> = stores.tabs.list(&txn).await?.into_iter().map(|tab| tab.id).collect();
        stores.tab_grants.replace_all(&txn, created.id, &all_tabs).await?;

        report.root_created = true;
        tracing::info!(
            user_id = created.id,
            tabs = all_tabs.len(),
            "{}",
            registration_message(RoleName::SuperAdmin)
        );
    }

    commit_transaction(txn).await?;
    Ok(report)
}
