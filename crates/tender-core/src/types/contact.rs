//! Administrative contact record

use serde::{Deserialize, Serialize};

/// Contact details recovered from a free-text block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub institution_phone: Option<String>,
}

impl ContactRecord {
    /// Whether no field was recovered
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.mobile.is_none()
            && self.institution_phone.is_none()
    }
}
