//! Call handler endpoints.

use serde::Serialize;
use serde_json::Value;

use cupi_core::error::CuResult;

use crate::client::ApiClient;
use crate::response::{ApiOutcome, Created, Listing, Oid, Projection, Resource};
use crate::wire;

/// Parameters for creating a call handler.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewCallHandler {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtmf_access_id: Option<String>,
    /// Call handler template to copy settings from, sent as a query parameter.
    #[serde(skip)]
    pub template_oid: Oid,
}

impl NewCallHandler {
    pub fn new(display_name: &str, template_oid: Oid) -> Self {
        Self {
            display_name: display_name.to_string(),
            dtmf_access_id: None,
            template_oid,
        }
    }
}

impl ApiClient {
    /// List system call handlers.
    pub async fn call_handlers(&self, projection: Projection) -> CuResult<ApiOutcome<Listing>> {
        let outcome = self
            .get("/handlers/callhandlers")
            .await?
            .expect_json(Resource::CallHandler)?;
        Ok(outcome.map(|v| Listing::project(v, "Callhandler", "DisplayName", projection)))
    }

    /// Get a call handler by OID.
    pub async fn call_handler(&self, oid: &Oid) -> CuResult<ApiOutcome<Value>> {
        Ok(self
            .get(&format!("/handlers/callhandlers/{oid}"))
            .await?
            .expect_json(Resource::CallHandler)?)
    }

    /// Create a call handler from a template.
    pub async fn add_call_handler(&self, handler: &NewCallHandler) -> CuResult<ApiOutcome<Created>> {
        let path = format!(
            "/handlers/callhandlers?templateObjectId={}",
            wire::path_segment(handler.template_oid.as_str())
        );
        Ok(self
            .post(&path, handler)
            .await?
            .expect_created(Resource::CallHandler, "Call handler added"))
    }

    /// Update arbitrary call handler fields.
    pub async fn update_call_handler(&self, oid: &Oid, fields: &Value) -> CuResult<ApiOutcome<String>> {
        Ok(self
            .put(&format!("/handlers/callhandlers/{oid}"), fields)
            .await?
            .expect_no_content(Resource::CallHandler, "Call handler updated".into()))
    }

    /// Delete a call handler.
    pub async fn delete_call_handler(&self, oid: &Oid) -> CuResult<ApiOutcome<String>> {
        Ok(self
            .delete(&format!("/handlers/callhandlers/{oid}"))
            .await?
            .expect_no_content(Resource::CallHandler, "Call handler deleted".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_call_handler_serialize() {
        let mut handler = NewCallHandler::new("Main AA", Oid::from("tmpl-1"));
        handler.dtmf_access_id = Some("7000".into());
        let json = serde_json::to_value(&handler).unwrap();
        assert_eq!(json, serde_json::json!({"DisplayName": "Main AA", "DtmfAccessId": "7000"}));
    }
}
