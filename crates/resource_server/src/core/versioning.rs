use api_models::enums::ApiVersion;
use error_stack::report;

use crate::core::errors::{ApiErrorResponse, RouterResult};

/// Decide whether a resource created under `resource_version` may be read by
/// a request made under `requested_version`.
///
/// A resource is visible from the version it was created under and from every
/// later version; older versions must not see it, since response shapes are
/// not guaranteed backward-compatible. The conflict carries both versions so
/// client tooling can tell "wrong version" apart from "does not exist".
pub fn validate_resource_access(
    resource_version: ApiVersion,
    requested_version: ApiVersion,
) -> RouterResult<()> {
    if requested_version < resource_version {
        return Err(report!(ApiErrorResponse::ResourceVersionConflict {
            resource_version,
            requested_version,
        }));
    }
    Ok(())
}
