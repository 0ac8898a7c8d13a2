use stockledger_core::OwnerId;

/// Helper trait for owner-scoped values.
///
/// Marks types that belong to exactly one owner, so storage and query
/// components can enforce isolation without knowing the concrete type.
///
/// ## Use Cases
///
/// - **Store lookups**: a record fetched by id is only returned when its owner matches
/// - **Query filtering**: audit entries from other owners never reach a filter result
pub trait OwnerScoped {
    fn owner(&self) -> OwnerId;
}
