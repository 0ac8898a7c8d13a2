use stockledger_core::OwnerId;

/// Owner context for a request, resolved from the bearer token.
///
/// Immutable and present on every protected route.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OwnerContext {
    owner: OwnerId,
}

impl OwnerContext {
    pub fn new(owner: OwnerId) -> Self {
        Self { owner }
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }
}
