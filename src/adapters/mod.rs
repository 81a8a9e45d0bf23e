// Adapters layer: concrete HTTP clients behind the domain ports.

pub mod postal_lookup;
pub mod rest_store;

pub use postal_lookup::PostalCodeLookup;
pub use rest_store::RestPlanStore;
