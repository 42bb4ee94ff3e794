pub mod loader;

use crate::domain::product::Product;

/// The in-memory product catalog. Built once from a successful load and
/// immutable for the rest of the process lifetime, so it can be shared
/// across lookup callers without synchronization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Takes ownership of the loaded sequence; insertion order is preserved.
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Point query over the catalog: returns the first product whose id
    /// equals `identifier` exactly (case-sensitive, byte-exact). Absence is
    /// a normal outcome, not an error.
    pub fn lookup(&self, identifier: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id.as_str() == identifier)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::product::{Product, ProductId};

    use super::Catalog;

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: ProductId(id.to_string()),
            name: name.to_string(),
            price: Decimal::new(999, 2),
            weight: Decimal::new(5, 1),
        }
    }

    #[test]
    fn lookup_returns_matching_product() {
        let catalog = Catalog::new(vec![product("A1", "Widget"), product("B2", "Gadget")]);

        let found = catalog.lookup("A1").expect("A1 should be present");
        assert_eq!(found.name, "Widget");
        assert_eq!(found.price, Decimal::new(999, 2));
        assert_eq!(found.weight, Decimal::new(5, 1));
    }

    #[test]
    fn lookup_is_absent_for_unknown_identifier() {
        let catalog = Catalog::new(vec![product("A1", "Widget")]);

        assert!(catalog.lookup("B2").is_none());
    }

    #[test]
    fn lookup_is_case_sensitive_and_rejects_empty() {
        let catalog = Catalog::new(vec![product("A1", "Widget")]);

        assert!(catalog.lookup("a1").is_none());
        assert!(catalog.lookup("").is_none());
    }

    #[test]
    fn repeated_lookups_are_idempotent() {
        let catalog = Catalog::new(vec![product("A1", "Widget")]);

        let first = catalog.lookup("A1").cloned();
        let second = catalog.lookup("A1").cloned();
        assert_eq!(first, second);
    }

    #[test]
    fn lookup_on_empty_catalog_is_absent() {
        let catalog = Catalog::default();

        assert!(catalog.lookup("A1").is_none());
        assert!(catalog.is_empty());
    }
}
