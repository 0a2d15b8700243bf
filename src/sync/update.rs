// file: src/sync/update.rs
// description: block operations for appending and rewriting highlights on a remote page
// reference: internal sync logic

use crate::converter::markup_to_blocks;
use crate::models::Block;
use crate::sync::groups::HighlightGroup;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Blocks to append for a new highlight, closed by a separator.
pub fn blocks_for_append(markup: &str) -> Vec<Block> {
    let mut blocks = markup_to_blocks(markup);
    blocks.push(Block::empty_paragraph());
    blocks
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BlockOperation {
    UpdateInPlace { block_id: String, block: Block },
    Delete { block_id: String },
    Append { block: Block },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePlan {
    pub operations: Vec<BlockOperation>,
}

impl UpdatePlan {
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn deletions(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| matches!(op, BlockOperation::Delete { .. }))
            .count()
    }
}

/// Replaces a matched group with `new_blocks`.
///
/// The first old block is rewritten in place when it has the same type as
/// the first new block, otherwise it is deleted and the new block appended.
/// Remaining old blocks are deleted and remaining new blocks appended.
pub fn plan_update(group: &HighlightGroup<'_>, new_blocks: Vec<Block>) -> UpdatePlan {
    let mut operations = Vec::new();
    let mut new_blocks = new_blocks.into_iter();
    let mut old_blocks = group.blocks.iter();

    if let Some(first_new) = new_blocks.next() {
        match old_blocks.next() {
            Some(first_old) => match &first_old.id {
                Some(id) if first_old.same_type(&first_new) => {
                    operations.push(BlockOperation::UpdateInPlace {
                        block_id: id.clone(),
                        block: first_new,
                    });
                }
                Some(id) => {
                    operations.push(BlockOperation::Delete {
                        block_id: id.clone(),
                    });
                    operations.push(BlockOperation::Append { block: first_new });
                }
                None => {
                    warn!("Skipping {} block without a remote id", first_old.type_name());
                    operations.push(BlockOperation::Append { block: first_new });
                }
            },
            None => operations.push(BlockOperation::Append { block: first_new }),
        }
    }

    for old in old_blocks {
        match &old.id {
            Some(id) => operations.push(BlockOperation::Delete {
                block_id: id.clone(),
            }),
            None => warn!("Skipping {} block without a remote id", old.type_name()),
        }
    }

    operations.extend(new_blocks.map(|block| BlockOperation::Append { block }));

    UpdatePlan { operations }
}
