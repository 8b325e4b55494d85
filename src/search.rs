//! Name search over item aggregates.

use crate::models::ItemAggregate;

/// Items whose name contains `term`, ignoring case. A blank term matches everything.
pub fn filter_by_name<'a>(items: &'a [ItemAggregate], term: &str) -> Vec<&'a ItemAggregate> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&needle))
        .collect()
}
