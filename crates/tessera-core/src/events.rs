//! Audit events
//!
//! Every state transition in the registries, and every capability-token
//! verification, appends an event to the context's sink. Token consumption is
//! recorded on every verification call, including pure reads, so the sink
//! carries a full audit trail of who proved what, not only of what changed.

use crate::address::Address;
use serde::{Deserialize, Serialize};

/// An audit event appended to the context's event sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A capability type was registered for a project.
    IdentityRegistered {
        /// Address of the project that owns the capability type.
        owner: Address,
        /// Operator-facing key recorded at registration.
        api_key: String,
    },

    /// An identity was enabled or disabled by the administrator.
    IdentityToggled {
        /// Address of the project that owns the capability type.
        owner: Address,
        /// Operator-facing key recorded at registration.
        api_key: String,
        /// Active flag before the toggle.
        before: bool,
        /// Active flag after the toggle.
        after: bool,
    },

    /// A capability token was presented and verified.
    TokenConsumed {
        /// Operator-facing key of the verified identity.
        api_key: String,
    },

    /// A read grant was delegated from one project to another.
    AuthorizationGranted {
        /// The granting project.
        authorizer: Address,
        /// The project receiving access.
        authorized: Address,
    },

    /// A read grant was revoked by its authorizer.
    AuthorizationRevoked {
        /// The granting project.
        authorizer: Address,
        /// The project that held access.
        authorized: Address,
    },

    /// A grant was enabled or disabled by the administrator.
    AuthorizationToggled {
        /// The granting project.
        authorizer: Address,
        /// The project holding access.
        authorized: Address,
        /// Active flag before the toggle.
        before: bool,
        /// Active flag after the toggle.
        after: bool,
    },

    /// A grant was exercised through the metered usage path.
    AuthorizationUsed {
        /// The granting project.
        authorizer: Address,
        /// The project that exercised access.
        authorized: Address,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    // The substrate persists events; they must survive serialization.
    #[test]
    fn events_round_trip_through_serde() {
        let event = Event::IdentityToggled {
            owner: Address::derived("acme"),
            api_key: "acme-key".to_owned(),
            before: true,
            after: false,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
