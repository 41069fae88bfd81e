//! Display-field backfill from the profile directory.

use tracing::warn;

use crate::model::candidate::AssignmentCandidate;
use crate::source::ProfileDirectory;

/// Backfill display fields on candidates that still need a lookup.
///
/// Lookups run one at a time; a failed or empty lookup leaves the
/// candidate's own fields in place, which at worst means an id shown where
/// a name would be. The unknown sentinel is never looked up.
pub fn resolve_identities<P: ProfileDirectory>(candidates: &mut [AssignmentCandidate], profiles: &P) {
    for candidate in candidates.iter_mut() {
        if candidate.actor_id.is_unknown() || !candidate.is_unresolved() {
            continue;
        }
        let profile = match profiles.resolve(&candidate.actor_id) {
            Ok(Some(profile)) => profile,
            Ok(None) => continue,
            Err(error) => {
                warn!(
                    actor_id = %candidate.actor_id,
                    %error,
                    "profile lookup failed, keeping source-provided fields"
                );
                continue;
            }
        };

        if !profile.name.is_empty() {
            candidate.display_name = profile.name;
        }
        if candidate.email.is_empty() {
            candidate.email = profile.email;
        }
        if candidate.role.is_empty() {
            if let Some(role) = profile.role {
                candidate.role = role;
            }
        }
    }
}
