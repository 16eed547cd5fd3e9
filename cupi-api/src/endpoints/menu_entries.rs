//! Caller input (menu entry) endpoints.
//!
//! Every call handler has one menu entry per phone key, deciding what
//! happens when a caller presses that key during the greeting.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::Value;

use cupi_core::error::{CuError, CuResult};

use crate::client::ApiClient;
use crate::response::{collection, ApiOutcome, Oid, Resource};
use crate::wire;

/// A phone key: `0`-`9`, `*` or `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuKey(char);

impl MenuKey {
    pub fn new(key: char) -> CuResult<Self> {
        match key {
            '0'..='9' | '*' | '#' => Ok(Self(key)),
            _ => Err(CuError::InvalidInput(format!("not a phone key: {key:?}"))),
        }
    }

    pub fn as_char(&self) -> char {
        self.0
    }

    fn path(&self, handler_oid: &Oid) -> String {
        format!(
            "/handlers/callhandlers/{handler_oid}/menuentries/{}",
            wire::path_segment(&self.0.to_string())
        )
    }
}

impl fmt::Display for MenuKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MenuKey {
    type Err = CuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(key), None) => MenuKey::new(key),
            _ => Err(CuError::InvalidInput(format!("not a phone key: {s:?}"))),
        }
    }
}

/// What a menu entry does when its key is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Ignore = 0,
    Hangup = 1,
    Goto = 2,
    Error = 3,
    TakeMessage = 4,
    SkipGreeting = 5,
    RestartGreeting = 6,
    TransferToAlternateContact = 7,
    RouteFromNextRule = 8,
}

impl Serialize for MenuAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&(*self as u8))
    }
}

/// Changes to a menu entry. Unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MenuEntryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<MenuAction>,
    /// Conversation to send the caller to with `MenuAction::Goto`, e.g.
    /// "PHTransfer" or "PHGreeting".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_conversation: Option<String>,
    #[serde(rename = "TargetHandlerObjectId", skip_serializing_if = "Option::is_none")]
    pub target_handler_oid: Option<Oid>,
    /// Ignore further key presses once this one is taken.
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "wire::opt_bool_token")]
    pub locked: Option<bool>,
}

impl MenuEntryUpdate {
    /// Send callers who press the key to another call handler.
    pub fn transfer_to(handler_oid: Oid) -> Self {
        Self {
            action: Some(MenuAction::Goto),
            target_conversation: Some("PHTransfer".into()),
            target_handler_oid: Some(handler_oid),
            locked: None,
        }
    }
}

impl ApiClient {
    /// All menu entries of a call handler.
    pub async fn menu_entries(&self, handler_oid: &Oid) -> CuResult<ApiOutcome<Vec<Value>>> {
        let outcome = self
            .get(&format!("/handlers/callhandlers/{handler_oid}/menuentries"))
            .await?
            .expect_json(Resource::CallHandler)?;
        Ok(outcome.map(|v| collection(v, "MenuEntry")))
    }

    /// The menu entry for one key.
    pub async fn menu_entry(&self, handler_oid: &Oid, key: MenuKey) -> CuResult<ApiOutcome<Value>> {
        Ok(self.get(&key.path(handler_oid)).await?.expect_json(Resource::MenuEntry)?)
    }

    /// Change what a key does.
    pub async fn update_menu_entry(
        &self,
        handler_oid: &Oid,
        key: MenuKey,
        update: &MenuEntryUpdate,
    ) -> CuResult<ApiOutcome<String>> {
        Ok(self
            .put(&key.path(handler_oid), update)
            .await?
            .expect_no_content(Resource::MenuEntry, format!("Menu entry {key} updated")))
    }
}
