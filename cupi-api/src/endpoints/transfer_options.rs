//! Call handler transfer option endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::Value;

use cupi_core::error::{CuError, CuResult};

use crate::client::ApiClient;
use crate::response::{collection, ApiOutcome, Oid, Resource};
use crate::wire;

/// Transfer rules every call handler has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferRule {
    Standard,
    OffHours,
    Alternate,
}

impl TransferRule {
    pub fn name(&self) -> &'static str {
        match self {
            TransferRule::Standard => "Standard",
            TransferRule::OffHours => "Off Hours",
            TransferRule::Alternate => "Alternate",
        }
    }

    fn path(&self, handler_oid: &Oid) -> String {
        format!(
            "/handlers/callhandlers/{handler_oid}/transferoptions/{}",
            wire::path_segment(self.name())
        )
    }
}

impl fmt::Display for TransferRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransferRule {
    type Err = CuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match folded.as_str() {
            "standard" => Ok(TransferRule::Standard),
            "offhours" => Ok(TransferRule::OffHours),
            "alternate" => Ok(TransferRule::Alternate),
            _ => Err(CuError::InvalidInput(format!("unknown transfer rule: {s}"))),
        }
    }
}

/// Where an active transfer rule sends the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferAction {
    /// Skip the transfer and play the greeting.
    Greeting = 0,
    /// Ring `Extension`.
    Extension = 1,
}

impl Serialize for TransferAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&(*self as u8))
    }
}

/// Changes to a transfer option. Unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransferOptionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<TransferAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    /// Rings to wait before giving up on a supervised transfer.
    #[serde(
        rename = "TransferRings",
        skip_serializing_if = "Option::is_none",
        serialize_with = "wire::opt_num_token"
    )]
    pub rings: Option<u32>,
    /// When the rule switches itself off, as the server's timestamp text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_expires: Option<String>,
}

impl ApiClient {
    /// All transfer options of a call handler.
    pub async fn transfer_options(&self, handler_oid: &Oid) -> CuResult<ApiOutcome<Vec<Value>>> {
        let outcome = self
            .get(&format!("/handlers/callhandlers/{handler_oid}/transferoptions"))
            .await?
            .expect_json(Resource::CallHandler)?;
        Ok(outcome.map(|v| collection(v, "TransferOption")))
    }

    /// One transfer option of a call handler.
    pub async fn transfer_option(&self, handler_oid: &Oid, rule: TransferRule) -> CuResult<ApiOutcome<Value>> {
        Ok(self
            .get(&rule.path(handler_oid))
            .await?
            .expect_json(Resource::TransferOption)?)
    }

    /// Change a transfer option.
    pub async fn update_transfer_option(
        &self,
        handler_oid: &Oid,
        rule: TransferRule,
        update: &TransferOptionUpdate,
    ) -> CuResult<ApiOutcome<String>> {
        Ok(self
            .put(&rule.path(handler_oid), update)
            .await?
            .expect_no_content(Resource::TransferOption, format!("Transfer option {rule} updated")))
    }
}
