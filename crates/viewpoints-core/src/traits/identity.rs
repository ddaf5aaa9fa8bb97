//! Identity resolution port

use crate::value_objects::VoterIdentity;

/// Maps the current request or session to a voter identity
///
/// Implementations must never yield both a user and a session: the
/// `VoterIdentity` enum makes that unrepresentable. `None` means the caller
/// could not be identified at all.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self) -> Option<VoterIdentity>;
}

impl IdentityResolver for VoterIdentity {
    fn resolve(&self) -> Option<VoterIdentity> {
        Some(self.clone())
    }
}

impl<T: IdentityResolver + ?Sized> IdentityResolver for &T {
    fn resolve(&self) -> Option<VoterIdentity> {
        (**self).resolve()
    }
}
