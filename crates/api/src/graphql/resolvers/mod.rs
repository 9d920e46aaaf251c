//! Resolver modules, one per domain, plus shared output-object helpers.

pub mod activity;
pub mod auth;
pub mod biosecurity;
pub mod catalogue;
pub mod livestock;
pub mod pricing;
pub mod production;
pub mod reference;

use std::collections::HashMap;

use async_graphql::SimpleObject;

use agrireg_core::types::RecordUuid;
use agrireg_db::models::user::UserStub;

/// Denormalized actor stub embedded on audited records.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "UserStub")]
pub struct UserStubObject {
    pub uuid: RecordUuid,
    pub username: String,
}

impl From<&UserStub> for UserStubObject {
    fn from(stub: &UserStub) -> Self {
        Self {
            uuid: stub.uuid,
            username: stub.username.clone(),
        }
    }
}

/// Resolve an optional actor uuid into a stub, if the user still exists.
pub(crate) fn actor_stub(
    stubs: &HashMap<RecordUuid, UserStub>,
    uuid: Option<RecordUuid>,
) -> Option<UserStubObject> {
    uuid.and_then(|u| stubs.get(&u)).map(UserStubObject::from)
}

/// Resolve a reference uuid into its display name. Falls back to the uuid
/// itself if the reference row has vanished (should not happen under FK
/// constraints, but exports must never panic).
pub(crate) fn ref_name(map: &HashMap<RecordUuid, String>, uuid: RecordUuid) -> String {
    map.get(&uuid).cloned().unwrap_or_else(|| uuid.to_string())
}
