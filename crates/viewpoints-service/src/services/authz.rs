//! Poll admin checks
//!
//! The poll admin is the user who created the poll. Anonymous sessions are
//! never admins.

use viewpoints_core::{DomainError, Poll};

use super::error::{ServiceError, ServiceResult};

/// Require the caller to be the poll admin
pub fn require_poll_admin(poll: &Poll, user_id: Option<&str>) -> ServiceResult<()> {
    match user_id {
        None => Err(ServiceError::unauthenticated()),
        Some(_) if poll.is_owned_by(user_id) => Ok(()),
        Some(_) => Err(DomainError::NotPollAdmin.into()),
    }
}

/// Require the poll admin only when the poll is private
pub fn require_poll_admin_if_private(poll: &Poll, user_id: Option<&str>) -> ServiceResult<()> {
    if poll.is_private() {
        require_poll_admin(poll, user_id)
    } else {
        Ok(())
    }
}
