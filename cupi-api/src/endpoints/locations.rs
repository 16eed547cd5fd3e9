//! Location and template endpoints.
//!
//! These are mostly read to obtain the OIDs that creates need: the owner
//! location for schedules, the call handler template for new handlers, and
//! a user template alias for new users.

use serde_json::Value;

use cupi_core::error::CuResult;

use crate::client::ApiClient;
use crate::response::{collection, ApiOutcome, Listing, Oid, Projection, Resource};

impl ApiClient {
    /// List Connection locations.
    pub async fn locations(&self, projection: Projection) -> CuResult<ApiOutcome<Listing>> {
        let outcome = self
            .get("/locations/connectionlocations")
            .await?
            .expect_json(Resource::Location)?;
        Ok(outcome.map(|v| Listing::project(v, "ConnectionLocation", "DisplayName", projection)))
    }

    /// OID of the local Connection location, the owner of new schedules.
    pub async fn owner_location_oid(&self) -> CuResult<ApiOutcome<Oid>> {
        let outcome = self
            .get("/locations/connectionlocations")
            .await?
            .expect_json(Resource::Location)?;
        Ok(first_oid(outcome, "ConnectionLocation", Resource::Location))
    }

    /// List call handler templates.
    pub async fn call_handler_templates(&self, projection: Projection) -> CuResult<ApiOutcome<Listing>> {
        let outcome = self
            .get("/callhandlertemplates")
            .await?
            .expect_json(Resource::CallHandlerTemplate)?;
        Ok(outcome.map(|v| Listing::project(v, "CallhandlerTemplate", "DisplayName", projection)))
    }

    /// OID of the first call handler template.
    pub async fn call_handler_template_oid(&self) -> CuResult<ApiOutcome<Oid>> {
        let outcome = self
            .get("/callhandlertemplates")
            .await?
            .expect_json(Resource::CallHandlerTemplate)?;
        Ok(first_oid(outcome, "CallhandlerTemplate", Resource::CallHandlerTemplate))
    }

    /// List user templates. The mini view pairs each template's alias with
    /// its OID; the alias is what `add_user` takes.
    pub async fn user_templates(&self, projection: Projection) -> CuResult<ApiOutcome<Listing>> {
        let outcome = self
            .get("/usertemplates")
            .await?
            .expect_json(Resource::UserTemplate)?;
        Ok(outcome.map(|v| Listing::project(v, "UserTemplate", "Alias", projection)))
    }
}

/// The `ObjectId` of the first item of a collection. An empty collection
/// reads as not found.
fn first_oid(outcome: ApiOutcome<Value>, kind: &str, resource: Resource) -> ApiOutcome<Oid> {
    match outcome {
        ApiOutcome::Success(envelope) => collection(envelope, kind)
            .first()
            .and_then(|item| item.get("ObjectId"))
            .and_then(Value::as_str)
            .map(|oid| ApiOutcome::Success(Oid::from(oid)))
            .unwrap_or(ApiOutcome::NotFound(resource)),
        ApiOutcome::NotFound(resource) => ApiOutcome::NotFound(resource),
        ApiOutcome::Failure(failure) => ApiOutcome::Failure(failure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_oid_single_object() {
        let envelope = json!({
            "@total": "1",
            "ConnectionLocation": {"DisplayName": "cuc1", "ObjectId": "89443b75"}
        });
        let oid = first_oid(ApiOutcome::Success(envelope), "ConnectionLocation", Resource::Location);
        assert_eq!(oid, ApiOutcome::Success(Oid::from("89443b75")));
    }

    #[test]
    fn test_first_oid_empty_collection() {
        let oid = first_oid(
            ApiOutcome::Success(json!({"@total": "0"})),
            "CallhandlerTemplate",
            Resource::CallHandlerTemplate,
        );
        assert_eq!(oid.message(), "Call handler template not found");
    }
}
