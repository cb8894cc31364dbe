use crate::model::lenient;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// A ledger account at one physical point-transfer location, as returned by the API.
///
/// All ledger figures are computed upstream. A figure that is missing or malformed is held as
/// `None` and read as zero through the accessors.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Branch {
    #[serde(rename = "_id", alias = "id", default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    active: bool,
    /// The branch's starting ledger value.
    #[serde(default, deserialize_with = "lenient::decimal")]
    opening_balance: Option<Decimal>,
    /// Cumulative earned commission.
    #[serde(default, deserialize_with = "lenient::decimal")]
    commission: Option<Decimal>,
    /// Commission earned in the current day window.
    #[serde(default, deserialize_with = "lenient::decimal")]
    today_commission: Option<Decimal>,
    /// Opening balance adjusted by today's net transaction flow.
    #[serde(default, deserialize_with = "lenient::decimal")]
    transaction_balance: Option<Decimal>,
    /// Commission accrued but not yet transferred into the branch's balance.
    #[serde(default, deserialize_with = "lenient::decimal")]
    remaining_transfer_commission: Option<Decimal>,
}

impl Branch {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            active: true,
            ..Default::default()
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_opening_balance(mut self, value: impl Into<Decimal>) -> Self {
        self.opening_balance = Some(value.into());
        self
    }

    pub fn with_commission(mut self, value: impl Into<Decimal>) -> Self {
        self.commission = Some(value.into());
        self
    }

    pub fn with_today_commission(mut self, value: impl Into<Decimal>) -> Self {
        self.today_commission = Some(value.into());
        self
    }

    pub fn with_transaction_balance(mut self, value: impl Into<Decimal>) -> Self {
        self.transaction_balance = Some(value.into());
        self
    }

    pub fn with_remaining_transfer_commission(mut self, value: impl Into<Decimal>) -> Self {
        self.remaining_transfer_commission = Some(value.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn opening_balance(&self) -> Decimal {
        self.opening_balance.unwrap_or_default()
    }

    pub fn commission(&self) -> Decimal {
        self.commission.unwrap_or_default()
    }

    pub fn today_commission(&self) -> Decimal {
        self.today_commission.unwrap_or_default()
    }

    pub fn transaction_balance(&self) -> Decimal {
        self.transaction_balance.unwrap_or_default()
    }

    pub fn remaining_transfer_commission(&self) -> Decimal {
        self.remaining_transfer_commission.unwrap_or_default()
    }
}

/// A reference from a transaction to a branch. The API sends either the bare id or the populated
/// branch object.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BranchRef {
    Id(String),
    Populated {
        #[serde(rename = "_id")]
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl Default for BranchRef {
    fn default() -> Self {
        BranchRef::Id(String::new())
    }
}

impl BranchRef {
    pub fn id(&self) -> &str {
        match self {
            BranchRef::Id(id) => id,
            BranchRef::Populated { id, .. } => id,
        }
    }

    /// The branch name, if the API populated it.
    pub fn name(&self) -> Option<&str> {
        match self {
            BranchRef::Id(_) => None,
            BranchRef::Populated { name, .. } => name.as_deref(),
        }
    }
}

impl From<&str> for BranchRef {
    fn from(id: &str) -> Self {
        BranchRef::Id(id.to_string())
    }
}

impl<'de> Deserialize<'de> for BranchRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Id(String),
            Populated {
                #[serde(rename = "_id", alias = "id")]
                id: String,
                #[serde(default)]
                name: Option<String>,
            },
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None => BranchRef::default(),
            Some(Raw::Id(id)) => BranchRef::Id(id),
            Some(Raw::Populated { id, name }) => BranchRef::Populated { id, name },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_branch() {
        let json = r#"{
            "_id": "b1",
            "name": "Surat",
            "location": "Varachha",
            "active": true,
            "opening_balance": 1000,
            "commission": "45.5",
            "today_commission": 12,
            "transaction_balance": -300,
            "remaining_transfer_commission": 4
        }"#;
        let branch: Branch = serde_json::from_str(json).unwrap();
        assert_eq!(branch.id(), "b1");
        assert_eq!(branch.name(), "Surat");
        assert_eq!(branch.location(), "Varachha");
        assert!(branch.active());
        assert_eq!(branch.opening_balance(), Decimal::from(1000));
        assert_eq!(branch.commission(), Decimal::new(455, 1));
        assert_eq!(branch.today_commission(), Decimal::from(12));
        assert_eq!(branch.transaction_balance(), Decimal::from(-300));
        assert_eq!(branch.remaining_transfer_commission(), Decimal::from(4));
    }

    #[test]
    fn test_missing_figures_read_as_zero() {
        let branch: Branch =
            serde_json::from_str(r#"{"id": "b2", "transaction_balance": null}"#).unwrap();
        assert_eq!(branch.id(), "b2");
        assert!(!branch.active());
        assert!(branch.opening_balance().is_zero());
        assert!(branch.transaction_balance().is_zero());
        assert!(branch.remaining_transfer_commission().is_zero());
    }

    #[test]
    fn test_branch_ref_variants() {
        let r: BranchRef = serde_json::from_str("\"b1\"").unwrap();
        assert_eq!(r.id(), "b1");
        assert_eq!(r.name(), None);

        let r: BranchRef = serde_json::from_str(r#"{"_id": "b2", "name": "Mumbai"}"#).unwrap();
        assert_eq!(r.id(), "b2");
        assert_eq!(r.name(), Some("Mumbai"));

        let r: BranchRef = serde_json::from_str("null").unwrap();
        assert_eq!(r.id(), "");
    }
}
