//! Fixture projects and their capability tokens

use tessera_core::Address;
use tessera_identity::ProjectToken;

/// Address of the fixture project "acme".
pub fn acme() -> Address {
    Address::derived("acme")
}

/// Address of the fixture project "bolt".
pub fn bolt() -> Address {
    Address::derived("bolt")
}

/// Address of the fixture project "cobalt".
pub fn cobalt() -> Address {
    Address::derived("cobalt")
}

/// Capability token of the fixture project "acme".
pub struct AcmeToken(());

impl AcmeToken {
    /// Mint a token. Tests stand in for acme's own code here.
    pub fn mint() -> Self {
        Self(())
    }
}

impl ProjectToken for AcmeToken {
    fn project_address() -> Address {
        acme()
    }
}

/// Capability token of the fixture project "bolt".
pub struct BoltToken(());

impl BoltToken {
    /// Mint a token. Tests stand in for bolt's own code here.
    pub fn mint() -> Self {
        Self(())
    }
}

impl ProjectToken for BoltToken {
    fn project_address() -> Address {
        bolt()
    }
}

/// Capability token of the fixture project "cobalt".
pub struct CobaltToken(());

impl CobaltToken {
    /// Mint a token. Tests stand in for cobalt's own code here.
    pub fn mint() -> Self {
        Self(())
    }
}

impl ProjectToken for CobaltToken {
    fn project_address() -> Address {
        cobalt()
    }
}
