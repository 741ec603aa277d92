use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Permission class of the acting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Developer,
    Admin,
}

/// Actions a role may be offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ViewBugs,
    SubmitBug,
    ProgressWork,
    ApproveFix,
    AssignDeveloper,
    AdminPanel,
}

const CUSTOMER_CAPABILITIES: &[Capability] = &[Capability::ViewBugs, Capability::SubmitBug];

const DEVELOPER_CAPABILITIES: &[Capability] = &[Capability::ViewBugs, Capability::ProgressWork];

const ADMIN_CAPABILITIES: &[Capability] = &[
    Capability::ViewBugs,
    Capability::ApproveFix,
    Capability::AssignDeveloper,
    Capability::AdminPanel,
];

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Developer => "developer",
            Role::Admin => "admin",
        }
    }

    pub fn capabilities(self) -> &'static [Capability] {
        match self {
            Role::Customer => CUSTOMER_CAPABILITIES,
            Role::Developer => DEVELOPER_CAPABILITIES,
            Role::Admin => ADMIN_CAPABILITIES,
        }
    }

    pub fn can(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
