use std::collections::BTreeSet;
use std::fmt;

use cosmwasm_schema::cw_serde;

use crate::error::DrawError;

/// Block layout of the reference society: 205 slots in four numbering ranges.
pub const REFERENCE_BLOCKS: [(&str, u32); 4] = [("G", 26), ("UB", 59), ("LB", 50), ("T", 70)];

/// Upper bound on the slots a configuration may describe across all blocks.
pub const MAX_TOTAL_SLOTS: u32 = 10_000;

/// A contiguous, prefix-named numbering range of physical slots.
#[cw_serde]
pub struct SlotBlock {
    pub prefix: String,
    pub count: u32,
}

impl SlotBlock {
    pub fn new(prefix: impl Into<String>, count: u32) -> Self {
        Self {
            prefix: prefix.into(),
            count,
        }
    }
}

pub fn reference_blocks() -> Vec<SlotBlock> {
    REFERENCE_BLOCKS
        .iter()
        .map(|(prefix, count)| SlotBlock::new(*prefix, *count))
        .collect()
}

/// A physical slot: block prefix plus a 1-based number within the block.
/// Renders as `"{block}-{number}"`.
#[cw_serde]
#[derive(Eq, PartialOrd, Ord, Hash)]
pub struct SlotLabel {
    pub block: String,
    pub number: u32,
}

impl SlotLabel {
    pub fn new(block: impl Into<String>, number: u32) -> Self {
        Self {
            block: block.into(),
            number,
        }
    }
}

impl fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.block, self.number)
    }
}

/// Two consecutive slots of the same block, reserved together.
#[cw_serde]
#[derive(Eq)]
pub struct AdjacentPair {
    pub first: SlotLabel,
    pub second: SlotLabel,
}

impl AdjacentPair {
    pub fn labels(&self) -> [&SlotLabel; 2] {
        [&self.first, &self.second]
    }

    /// Same block, consecutive numbers, ascending.
    pub fn is_adjacent(&self) -> bool {
        self.first.block == self.second.block && self.first.number + 1 == self.second.number
    }
}

/// Reject block definitions that cannot produce a unique label set.
pub fn validate_blocks(blocks: &[SlotBlock]) -> Result<(), DrawError> {
    if blocks.is_empty() {
        return Err(DrawError::Configuration {
            reason: "at least one slot block is required".to_string(),
        });
    }

    let mut seen = BTreeSet::new();
    let mut total: u32 = 0;
    for block in blocks {
        if block.prefix.trim().is_empty() {
            return Err(DrawError::Configuration {
                reason: "block prefix must not be empty".to_string(),
            });
        }
        if block.prefix.contains('-') || block.prefix.trim() != block.prefix {
            return Err(DrawError::Configuration {
                reason: format!("block prefix {:?} must not contain '-' or whitespace padding", block.prefix),
            });
        }
        if block.count == 0 {
            return Err(DrawError::Configuration {
                reason: format!("block {} must have a positive slot count", block.prefix),
            });
        }
        if !seen.insert(block.prefix.as_str()) {
            return Err(DrawError::Configuration {
                reason: format!("duplicate block prefix {}", block.prefix),
            });
        }
        total = match total.checked_add(block.count) {
            Some(total) if total <= MAX_TOTAL_SLOTS => total,
            _ => {
                return Err(DrawError::Configuration {
                    reason: format!("slot blocks exceed {} slots in total", MAX_TOTAL_SLOTS),
                })
            }
        };
    }
    Ok(())
}

/// The full slot inventory and its adjacent-pair tiling.
///
/// `slots` is ordered by block then ascending number. `pairs` tiles each block
/// as (1,2), (3,4), ...; the last slot of an odd-sized block is left unpaired.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotInventory {
    pub slots: Vec<SlotLabel>,
    pub pairs: Vec<AdjacentPair>,
}

impl SlotInventory {
    pub fn build(blocks: &[SlotBlock]) -> Result<Self, DrawError> {
        validate_blocks(blocks)?;

        let total: u32 = blocks.iter().map(|b| b.count).sum();
        let mut slots = Vec::with_capacity(total as usize);
        let mut pairs = Vec::with_capacity(total as usize / 2);

        for block in blocks {
            for number in 1..=block.count {
                slots.push(SlotLabel::new(block.prefix.as_str(), number));
            }
            for start in (1..block.count).step_by(2) {
                pairs.push(AdjacentPair {
                    first: SlotLabel::new(block.prefix.as_str(), start),
                    second: SlotLabel::new(block.prefix.as_str(), start + 1),
                });
            }
        }

        Ok(Self { slots, pairs })
    }

    pub fn reference() -> Result<Self, DrawError> {
        Self::build(&reference_blocks())
    }

    pub fn total_slots(&self) -> usize {
        self.slots.len()
    }

    pub fn total_pairs(&self) -> usize {
        self.pairs.len()
    }

    pub fn contains(&self, label: &SlotLabel) -> bool {
        self.slots.contains(label)
    }
}
