use crate::claims::Claims;
use crate::error::{AuthError, AuthResult};

pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
/// Guards both creating and editing drinks.
pub const POST_DRINKS: &str = "post:drinks";
pub const DELETE_DRINKS: &str = "delete:drinks";

pub fn check_permission(required: &str, claims: &Claims) -> AuthResult<bool> {
    let granted = claims
        .permissions
        .as_deref()
        .ok_or(AuthError::PermissionsClaimMissing)?;

    if !granted.iter().any(|value| value == required) {
        return Err(AuthError::PermissionDenied {
            required: required.to_string(),
        });
    }
    Ok(true)
}
