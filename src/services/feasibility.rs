use crate::{
    error::{AppError, AppResult},
    models::{CategoryGroup, InventoryItem},
    services::classifier::classify,
};

/// Minimum closet size before any outfit is attempted
pub const MIN_INVENTORY_ITEMS: usize = 2;

/// Checks that the inventory can form at least one outfit
///
/// An outfit needs a dress, or a top together with a bottom.
pub fn check_feasibility(items: &[InventoryItem]) -> AppResult<()> {
    if items.len() < MIN_INVENTORY_ITEMS {
        tracing::info!(item_count = items.len(), "Inventory too small for an outfit");
        return Err(AppError::InsufficientItems);
    }

    let groups: Vec<CategoryGroup> = items.iter().map(|i| classify(&i.category)).collect();
    let has = |group: CategoryGroup| groups.contains(&group);

    if has(CategoryGroup::Dresses) || (has(CategoryGroup::Tops) && has(CategoryGroup::Bottoms)) {
        Ok(())
    } else {
        tracing::info!(
            item_count = items.len(),
            groups = ?groups,
            "Inventory lacks a dress or a top and bottom pair"
        );
        Err(AppError::NoValidCombination)
    }
}
