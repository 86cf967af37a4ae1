use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::InternalError;

/// Fixed set of roles. Stored by canonical name in `roles.name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    SuperAdmin,
    Admin,
    Viewer,
}

impl RoleName {
    pub const ALL: [RoleName; 3] = [RoleName::SuperAdmin, RoleName::Admin, RoleName::Viewer];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::SuperAdmin => "super_admin",
            RoleName::Admin => "admin",
            RoleName::Viewer => "viewer",
        }
    }

    /// Human-readable description written to `roles.description`
    pub fn description(&self) -> &'static str {
        match self {
            RoleName::SuperAdmin => "Super Admin",
            RoleName::Admin => "Admin",
            RoleName::Viewer => "Viewer",
        }
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, RoleName::SuperAdmin)
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = InternalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        RoleName::ALL
            .into_iter()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| InternalError::parse("role", format!("unknown role '{}'", value)))
    }
}

/// Action rights granted to roles through the permission matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Create,
    Read,
    Update,
    Delete,
}

impl Permission {
    pub const ALL: [Permission; 4] = [
        Permission::Create,
        Permission::Read,
        Permission::Update,
        Permission::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Create => "create",
            Permission::Read => "read",
            Permission::Update => "update",
            Permission::Delete => "delete",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = InternalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| InternalError::parse("permission", format!("unknown permission '{}'", value)))
    }
}

/// Dashboard tabs created at bootstrap.
///
/// Tabs are reference data: grant operations resolve names against the
/// `tabs` table, so this enum only drives seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardTab {
    Overview,
    Sales,
    GrossProfit,
    Inventory,
    Shipment,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 5] = [
        DashboardTab::Overview,
        DashboardTab::Sales,
        DashboardTab::GrossProfit,
        DashboardTab::Inventory,
        DashboardTab::Shipment,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DashboardTab::Overview => "overview",
            DashboardTab::Sales => "sales",
            DashboardTab::GrossProfit => "gross_profit",
            DashboardTab::Inventory => "inventory",
            DashboardTab::Shipment => "shipment",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DashboardTab::Overview => "Overview",
            DashboardTab::Sales => "Sales",
            DashboardTab::GrossProfit => "Gross Profit",
            DashboardTab::Inventory => "Inventory",
            DashboardTab::Shipment => "Shipment",
        }
    }
}
