//! Stack-aware inventory operations.
//!
//! A holder's inventory is an ordered `Vec<InventoryStack>` where index
//! order is acquisition order -- additions top up the oldest stacks first
//! and removals drain the oldest stacks first. Removal is all-or-nothing:
//! the total across all stacks is checked before any row is touched, so a
//! failed removal leaves the inventory byte-for-byte unchanged.

use duskmire_types::{InventoryStack, ItemDefinition, ItemId};

use crate::error::EngineError;

/// Total units of an item held across all of its stacks.
pub fn count_item(stacks: &[InventoryStack], item_id: ItemId) -> u64 {
    stacks
        .iter()
        .filter(|stack| stack.item_id == item_id)
        .fold(0u64, |total, stack| {
            total.saturating_add(u64::from(stack.quantity))
        })
}

/// Whether the holder has at least `quantity` units of the item.
pub fn has_item(stacks: &[InventoryStack], item_id: ItemId, quantity: u32) -> bool {
    count_item(stacks, item_id) >= u64::from(quantity)
}

/// Add `quantity` units of an item.
///
/// Stackable items top up existing stacks oldest-first, then overflow into
/// new stacks of at most `stack_cap` units each. Non-stackable items get
/// one row per unit. A stackable item configured with a cap below 1 is a
/// content error and is rejected before anything is touched.
pub fn add_to_stacks(
    stacks: &mut Vec<InventoryStack>,
    item: &ItemDefinition,
    quantity: u32,
) -> Result<(), EngineError> {
    if quantity == 0 {
        return Ok(());
    }

    if !item.stackable {
        for _ in 0..quantity {
            stacks.push(InventoryStack {
                item_id: item.id,
                quantity: 1,
                stack_cap: 1,
                stackable: false,
            });
        }
        return Ok(());
    }

    if item.stack_cap == 0 {
        return Err(EngineError::InvalidStackCap {
            item: item.id,
            cap: item.stack_cap,
        });
    }

    let mut remaining = quantity;

    // Top up existing stacks, oldest first.
    for stack in stacks.iter_mut() {
        if remaining == 0 {
            break;
        }
        if stack.item_id != item.id {
            continue;
        }
        let free = stack.stack_cap.saturating_sub(stack.quantity);
        let take = free.min(remaining);
        if take == 0 {
            continue;
        }
        stack.quantity = stack.quantity.saturating_add(take);
        remaining = remaining.saturating_sub(take);
    }

    // Overflow into fresh stacks.
    while remaining > 0 {
        let take = remaining.min(item.stack_cap);
        stacks.push(InventoryStack {
            item_id: item.id,
            quantity: take,
            stack_cap: item.stack_cap,
            stackable: true,
        });
        remaining = remaining.saturating_sub(take);
    }

    Ok(())
}

/// Remove `quantity` units of an item, oldest stacks first.
///
/// Returns `false` -- without mutating anything -- if the total held across
/// all stacks is less than `quantity`. Fully drained stacks are deleted;
/// a partially drained stack is updated in place.
pub fn remove_from_stacks(
    stacks: &mut Vec<InventoryStack>,
    item_id: ItemId,
    quantity: u32,
) -> bool {
    if quantity == 0 {
        return true;
    }
    if count_item(stacks, item_id) < u64::from(quantity) {
        return false;
    }

    let mut remaining = quantity;
    stacks.retain_mut(|stack| {
        if stack.item_id != item_id || remaining == 0 {
            return true;
        }
        let take = stack.quantity.min(remaining);
        stack.quantity = stack.quantity.saturating_sub(take);
        remaining = remaining.saturating_sub(take);
        stack.quantity > 0
    });
    true
}
