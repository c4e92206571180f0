//! Entity model marker
//!
//! An entity model is any plain record type that is stored as exactly one
//! document. The kernel places no requirement on its shape; identifier
//! uniqueness and similar constraints belong to the database.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Marker trait for record types persisted through a repository
///
/// Implementors must be serializable in both directions and constructible
/// through `Default`. The remaining bounds let entities cross task and
/// thread boundaries inside async drivers.
///
/// # Example
///
/// ```rust
/// use repo_kernel::EntityModel;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Default, Serialize, Deserialize)]
/// struct Customer {
///     email: String,
///     name: String,
/// }
///
/// impl EntityModel for Customer {}
/// ```
pub trait EntityModel:
    Serialize + DeserializeOwned + Default + Send + Sync + Unpin + 'static
{
    /// Human-readable type name used in logs and error messages
    ///
    /// The module path of the outer type is dropped; generic arguments are
    /// kept as written, e.g. `Envelope<app::Invoice>`.
    fn entity_name() -> &'static str {
        let full = std::any::type_name::<Self>();
        let head = full.find('<').map_or(full, |generics| &full[..generics]);
        let start = head.rfind("::").map_or(0, |sep| sep + 2);
        &full[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Invoice {
        number: u32,
    }

    impl EntityModel for Invoice {}

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Envelope<T> {
        body: T,
    }

    impl<T: EntityModel> EntityModel for Envelope<T> {}

    #[test]
    fn test_entity_name_strips_module_path() {
        assert_eq!(Invoice::entity_name(), "Invoice");
    }

    #[test]
    fn test_generic_entity_name_keeps_arguments() {
        let name = Envelope::<Invoice>::entity_name();

        assert!(name.starts_with("Envelope<"), "unexpected name {name}");
        assert!(name.ends_with("::Invoice>"), "unexpected name {name}");
    }
}
