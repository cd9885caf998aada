use crate::product::Product;

/// Derives the visible products from a snapshot and the current search text.
///
/// A blank query returns the whole snapshot. Otherwise a product is kept when
/// its title contains the query, ignoring case. Snapshot order is preserved.
/// The query is matched as typed; only the emptiness check trims it.
pub fn filter_products(snapshot: &[Product], query: &str) -> Vec<Product> {
    if query.trim().is_empty() {
        return snapshot.to_vec();
    }
    let needle = query.to_lowercase();
    snapshot
        .iter()
        .filter(|product| product.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
