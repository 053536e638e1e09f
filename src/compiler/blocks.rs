//! Blocks
//!
//!     A Block is an ordered list of nodes. It compiles to the flattened list of its children,
//!     except for layout slots: a named Block whose name starts with the block marker and that
//!     is not a sub-block (`@name`) compiles to a `named_block` node. The marker is stripped
//!     from the emitted name, so `block !sidebar` becomes the slot `sidebar`.

use super::{Compiler, Visited};
use crate::error::CompileError;
use crate::ir::{IrNode, NamedBlockNode, Provenance};
use directiv_parser::ast::{Block, Node};

impl Compiler {
    pub(super) fn visit_block(&self, node: &Node, block: &Block) -> Result<Visited, CompileError> {
        let children = self.visit_nodes(&block.nodes)?;

        let slot = block
            .name
            .as_deref()
            .filter(|_| !block.is_sub_block)
            .and_then(|name| name.strip_prefix(self.options.block_marker));

        match slot {
            Some(name) => Ok(Visited::One(IrNode::NamedBlock(NamedBlockNode {
                name: name.to_string(),
                args: block.args.clone(),
                children,
                provenance: Provenance::of(node),
            }))),
            None => Ok(Visited::Many(children)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CompileOptions;
    use directiv_parser::testing::*;

    fn visit(node: Node, options: CompileOptions) -> Visited {
        Compiler::new(block(vec![]), options)
            .visit(Some(&node))
            .unwrap()
    }

    #[test]
    fn test_marked_block_is_a_slot() {
        let visited = visit(
            named_block("!sidebar", vec![text("a"), text("b")]),
            CompileOptions::default(),
        );
        let Visited::One(IrNode::NamedBlock(slot)) = visited else {
            panic!("expected a named block, got {:?}", visited);
        };
        assert_eq!(slot.name, "sidebar");
        assert_eq!(slot.children.len(), 2);
    }

    #[test]
    fn test_unmarked_and_sub_blocks_are_lists() {
        let plain = visit(named_block("sidebar", vec![text("a")]), CompileOptions::default());
        assert!(matches!(plain, Visited::Many(ref nodes) if nodes.len() == 1));

        let sub = visit(sub_block("!header", None, vec![]), CompileOptions::default());
        assert_eq!(sub, Visited::Many(vec![]));
    }

    #[test]
    fn test_custom_marker() {
        let options = CompileOptions::default().with_block_marker('$');
        let visited = visit(named_block("$main", vec![]), options.clone());
        assert!(matches!(visited, Visited::One(IrNode::NamedBlock(ref b)) if b.name == "main"));
        let visited = visit(named_block("!main", vec![]), options);
        assert!(matches!(visited, Visited::Many(_)));
    }

    #[test]
    fn test_skipped_children_are_omitted() {
        let visited = visit(
            block(vec![text("a"), text(""), text("b")]),
            CompileOptions::default(),
        );
        assert!(matches!(visited, Visited::Many(ref nodes) if nodes.len() == 2));
    }
}
