//! Per-connection trust state: the anti-forgery token and the authorization
//! claim.

/// The `(handle, room)` pair a connection is permitted to act as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    /// Player handle bound to the connection.
    pub handle: String,
    /// Room key bound to the connection.
    pub room: String,
}

/// Connection-scoped session gates.
///
/// Two independent checks: every message must present the anti-forgery token
/// captured when the page session was created, and mutating actions must
/// match the claim fixed by the connection's first accepted join. Both pieces
/// of state die with the connection.
#[derive(Debug)]
pub struct SessionAuth {
    token: Option<String>,
    claim: Option<Claim>,
}

impl SessionAuth {
    /// New session around the token captured at transport upgrade, if any.
    pub fn new(token: Option<String>) -> Self {
        Self { token, claim: None }
    }

    /// Authentication gate: the presented token must equal the session's.
    ///
    /// A connection that never captured a token fails for every message;
    /// callers drop failing messages silently so a wrong token is
    /// indistinguishable from a malformed frame.
    pub fn authenticate(&self, presented: &str) -> bool {
        self.token.as_deref() == Some(presented)
    }

    /// Authorization gate for mutating actions: the action's `(handle, room)`
    /// must equal the stored claim exactly.
    pub fn authorize(&self, handle: &str, room: &str) -> bool {
        self.claim
            .as_ref()
            .is_some_and(|claim| claim.handle == handle && claim.room == room)
    }

    /// Record the claim established by an accepted join. First join wins:
    /// later joins from the same connection never change the claim.
    pub fn record_join(&mut self, handle: &str, room: &str) {
        if self.claim.is_none() {
            self.claim = Some(Claim {
                handle: handle.to_string(),
                room: room.to_string(),
            });
        }
    }

    /// The claim established for this connection, if any.
    pub fn claim(&self) -> Option<&Claim> {
        self.claim.as_ref()
    }
}
