use std::collections::BTreeSet;

use cosmwasm_schema::cw_serde;

use crate::inventory::{AdjacentPair, SlotInventory, SlotLabel};
use crate::shuffle::Shuffler;

/// Shuffled pools consumed front-to-back by the draw.
#[cw_serde]
#[derive(Default)]
pub struct AllocationPools {
    pub pair_pool: Vec<AdjacentPair>,
    pub single_pool: Vec<SlotLabel>,
}

/// Reserve adjacent pairs for two-slot households, then shuffle what is left.
///
/// Pairs are chosen first so every slot they consume is removed from the
/// single pool. At most `inventory.total_pairs()` pairs are planned; two-slot
/// applicants beyond that fall through to the single pool during the draw.
pub fn plan_pools<S: Shuffler>(
    two_slot_applicants: usize,
    inventory: &SlotInventory,
    shuffler: &mut S,
) -> AllocationPools {
    let mut pairs = inventory.pairs.clone();
    shuffler.shuffle(&mut pairs);
    pairs.truncate(two_slot_applicants.min(inventory.total_pairs()));

    let reserved: BTreeSet<&SlotLabel> = pairs.iter().flat_map(|p| p.labels()).collect();
    let mut singles: Vec<SlotLabel> = inventory
        .slots
        .iter()
        .filter(|slot| !reserved.contains(slot))
        .cloned()
        .collect();
    shuffler.shuffle(&mut singles);

    AllocationPools {
        pair_pool: pairs,
        single_pool: singles,
    }
}
