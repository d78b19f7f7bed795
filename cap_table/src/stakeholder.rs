//! Stakeholder rows.

use rlp_types::{Share, TypesError, WalletAddress};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a stakeholder currently participates in distributions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Active,
    Inactive,
}

impl Status {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

impl FromStr for Status {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(TypesError::InvalidStatus(s.to_string())),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the cap table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StakeholderEntry {
    /// Free-text label, e.g. "Founder".
    pub role: String,
    /// Display name; payouts are addressed to it.
    pub name: String,
    pub wallet: WalletAddress,
    pub share: Share,
    #[serde(default)]
    pub status: Status,
}

impl StakeholderEntry {
    /// A new Active stakeholder.
    pub fn new(
        role: impl Into<String>,
        name: impl Into<String>,
        wallet: impl Into<WalletAddress>,
        share: Share,
    ) -> Self {
        Self {
            role: role.into(),
            name: name.into(),
            wallet: wallet.into(),
            share,
            status: Status::Active,
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// A partial update to a row. `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StakeholderEdit {
    pub role: Option<String>,
    pub name: Option<String>,
    pub wallet: Option<WalletAddress>,
    pub share: Option<Share>,
    pub status: Option<Status>,
}

impl StakeholderEdit {
    pub fn is_empty(&self) -> bool {
        self.role.is_none()
            && self.name.is_none()
            && self.wallet.is_none()
            && self.share.is_none()
            && self.status.is_none()
    }

    pub(crate) fn apply(self, entry: &mut StakeholderEntry) {
        if let Some(role) = self.role {
            entry.role = role;
        }
        if let Some(name) = self.name {
            entry.name = name;
        }
        if let Some(wallet) = self.wallet {
            entry.wallet = wallet;
        }
        if let Some(share) = self.share {
            entry.share = share;
        }
        if let Some(status) = self.status {
            entry.status = status;
        }
    }
}
