//! Body editing with stable positional handles
//!
//! The compositor addresses paragraphs and tables by the positional index
//! they had when the template was authored, and those indices must keep
//! resolving to the same blocks while earlier blocks are being removed.
//! Removal is therefore a tombstone: the slot stays in place, the node is
//! just skipped on export. Insertions hang off a slot as trailing nodes,
//! so an anchor keeps working even after its own block was pruned away.

use crate::xml::{XmlElement, XmlNode};

struct Slot {
    node: XmlNode,
    removed: bool,
    trailing: Vec<XmlNode>,
}

/// Insertion point after a block; advances as nodes are spliced in so a
/// sequence of insertions lands in order.
#[derive(Debug, Clone, Copy)]
pub struct Anchor {
    slot: usize,
    pos: usize,
}

/// Editor over a body's block-level children. Index maps for paragraphs
/// and tables are built once at construction and stay valid for the
/// editor's lifetime; paragraphs inside table cells are not indexed.
pub struct BodyEditor {
    slots: Vec<Slot>,
    paragraphs: Vec<usize>,
    tables: Vec<usize>,
}

impl BodyEditor {
    pub fn new(blocks: Vec<XmlNode>) -> Self {
        let mut paragraphs = Vec::new();
        let mut tables = Vec::new();
        let slots: Vec<Slot> = blocks
            .into_iter()
            .map(|node| Slot {
                node,
                removed: false,
                trailing: Vec::new(),
            })
            .collect();
        for (i, slot) in slots.iter().enumerate() {
            if let XmlNode::Element(el) = &slot.node {
                match el.name.as_str() {
                    "w:p" => paragraphs.push(i),
                    "w:tbl" => tables.push(i),
                    _ => {}
                }
            }
        }
        Self {
            slots,
            paragraphs,
            tables,
        }
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Paragraph by positional index; removal does not invalidate it.
    pub fn paragraph(&self, index: usize) -> Option<&XmlElement> {
        let slot = *self.paragraphs.get(index)?;
        self.slots[slot].node.as_element()
    }

    pub fn paragraph_mut(&mut self, index: usize) -> Option<&mut XmlElement> {
        let slot = *self.paragraphs.get(index)?;
        self.slots[slot].node.as_element_mut()
    }

    pub fn table(&self, index: usize) -> Option<&XmlElement> {
        let slot = *self.tables.get(index)?;
        self.slots[slot].node.as_element()
    }

    pub fn table_mut(&mut self, index: usize) -> Option<&mut XmlElement> {
        let slot = *self.tables.get(index)?;
        self.slots[slot].node.as_element_mut()
    }

    /// Tombstone a paragraph. Returns false when the index is out of
    /// range. Idempotent; trailing insertions at this slot survive.
    pub fn remove_paragraph(&mut self, index: usize) -> bool {
        match self.paragraphs.get(index) {
            Some(&slot) => {
                self.slots[slot].removed = true;
                true
            }
            None => false,
        }
    }

    /// An anchor pointing directly after the given paragraph.
    pub fn anchor_after_paragraph(&self, index: usize) -> Option<Anchor> {
        let slot = *self.paragraphs.get(index)?;
        Some(Anchor { slot, pos: 0 })
    }

    /// Splice a node in at the anchor and advance the anchor past it.
    /// Anchors are only handed out by this editor, so a stale slot index
    /// is ignored rather than diagnosed.
    pub fn insert_after(&mut self, anchor: &mut Anchor, node: XmlNode) {
        if let Some(slot) = self.slots.get_mut(anchor.slot) {
            let pos = anchor.pos.min(slot.trailing.len());
            slot.trailing.insert(pos, node);
            anchor.pos = pos + 1;
        }
    }

    /// Flatten back into a block list: live nodes in original order, each
    /// followed by its trailing insertions. Trailing nodes of a removed
    /// slot still emit, holding the position the block used to occupy.
    pub fn into_blocks(self) -> Vec<XmlNode> {
        let mut out = Vec::with_capacity(self.slots.len());
        for slot in self.slots {
            if !slot.removed {
                out.push(slot.node);
            }
            out.extend(slot.trailing);
        }
        out
    }
}
