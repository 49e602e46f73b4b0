use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct UserInfo {
    /// USD
    pub balance: f64,
    pub email: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub organization_name: String,
    #[serde(default)]
    pub organization_type: String,
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PaymentMethod {
    pub id: String,
    pub last4: String,
}
