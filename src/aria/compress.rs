//! Accessibility tree compression.
//!
//! Children are compressed before their parent. At each node an ordered
//! ladder of rewrite steps runs until none fires; the first step that
//! changes the node restarts the ladder. The root then goes through a
//! finalization pass of its own.
//!
//! Every step only deletes or relocates wrapper nodes, so leaf content
//! keeps its document order.

use std::mem;

use tracing::{debug, trace};

use super::{merge_names, AriaNode, AriaType};

/// Upper bound on ladder restarts at a single node.
const MAX_PASSES: usize = 256;

/// Types whose contiguous repeats are wrapped in a group node.
const GROUPABLE: &[AriaType] = &[
    AriaType::Article,
    AriaType::Section,
    AriaType::ListItem,
    AriaType::Img,
];

/// A compression step, in ladder order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    DropEmptyChildren,
    BlankTextToPlaceholder,
    PromoteStructuralChild,
    FlattenTextWrappers,
    CollapseSingleChild,
    FlattenSignificantWrappers,
    GroupRepeatedChildren,
    FlattenNested,
}

type StepFn = fn(&mut AriaNode) -> bool;

const STEPS: &[(Step, StepFn)] = &[
    (Step::DropEmptyChildren, drop_empty_children),
    (Step::BlankTextToPlaceholder, blank_text_to_placeholder),
    (Step::PromoteStructuralChild, promote_structural_child),
    (Step::FlattenTextWrappers, flatten_text_wrappers),
    (Step::CollapseSingleChild, collapse_single_child),
    (Step::FlattenSignificantWrappers, flatten_significant_wrappers),
    (Step::GroupRepeatedChildren, group_repeated_children),
    (Step::FlattenNested, flatten_nested),
];

/// Compress an accessibility tree.
///
/// `compress(compress(t)) == compress(t)` holds for any tree.
#[must_use]
pub fn compress(tree: AriaNode) -> AriaNode {
    let before = tree.node_count();
    let mut root = compress_node(tree);

    loop {
        let finalized = finalize_root(&mut root);
        let restabilized = stabilize(&mut root);
        if !finalized && !restabilized {
            break;
        }
    }

    debug!(before, after = root.node_count(), "compressed accessibility tree");
    root
}

fn compress_node(mut node: AriaNode) -> AriaNode {
    node.children = mem::take(&mut node.children)
        .into_iter()
        .map(compress_node)
        .collect();
    stabilize(&mut node);
    node
}

/// Run the step ladder at `node` until nothing fires. Children must
/// already be compressed.
fn stabilize(node: &mut AriaNode) -> bool {
    let mut changed = false;
    for _ in 0..MAX_PASSES {
        let fired = STEPS
            .iter()
            .find_map(|&(step, apply)| apply(node).then_some(step));
        match fired {
            Some(step) => {
                trace!(?step, node_type = %node.node_type, "compression step fired");
                changed = true;
            }
            None => return changed,
        }
    }
    debug!(node_type = %node.node_type, "compression did not settle");
    changed
}

/// Generic, nameless, childless children carry nothing.
fn drop_empty_children(node: &mut AriaNode) -> bool {
    let before = node.children.len();
    node.children.retain(|c| !c.is_empty_generic());
    node.children.len() != before
}

/// A childless text node without a name becomes an empty placeholder for
/// its parent to drop.
fn blank_text_to_placeholder(node: &mut AriaNode) -> bool {
    if node.node_type == AriaType::Text && node.children.is_empty() && !node.has_name() {
        *node = AriaNode::new(AriaType::Generic);
        return true;
    }
    false
}

/// A text node around a single structural landmark is replaced by it.
fn promote_structural_child(node: &mut AriaNode) -> bool {
    if node.node_type != AriaType::Text
        || node.children.len() != 1
        || !node.children[0].node_type.is_structural()
    {
        return false;
    }
    let Some(mut child) = node.children.pop() else {
        return false;
    };
    if !child.has_name() {
        child.name = merge_names(node.name.take(), None);
    }
    *node = child;
    true
}

/// A text node whose children are all generic wrappers gets their contents
/// instead.
fn flatten_text_wrappers(node: &mut AriaNode) -> bool {
    if node.node_type != AriaType::Text
        || node.children.is_empty()
        || !node.children.iter().all(|c| c.node_type == AriaType::Generic)
    {
        return false;
    }
    let unwrapped = unwrap_generics(mem::take(&mut node.children));
    node.children = unwrapped;
    true
}

/// A nameless generic, or a node of the same type as its only child, is
/// replaced by that child.
fn collapse_single_child(node: &mut AriaNode) -> bool {
    if node.children.len() != 1 {
        return false;
    }
    let child_type = node.children[0].node_type;
    let nameless_generic = node.node_type == AriaType::Generic && !node.has_name();
    if !nameless_generic && child_type != node.node_type {
        return false;
    }
    let Some(mut child) = node.children.pop() else {
        return false;
    };
    child.name = merge_names(node.name.take(), child.name.take());
    *node = child;
    true
}

/// Landmarks mixing generic wrappers with other children lose the wrappers.
fn flatten_significant_wrappers(node: &mut AriaNode) -> bool {
    if !node.node_type.is_significant() {
        return false;
    }
    let generic = node
        .children
        .iter()
        .filter(|c| c.node_type == AriaType::Generic)
        .count();
    if generic == 0 || generic == node.children.len() {
        return false;
    }
    let unwrapped = unwrap_generics(mem::take(&mut node.children));
    node.children = unwrapped;
    true
}

/// Wrap contiguous runs of repeated article/section/listitem/img children.
fn group_repeated_children(node: &mut AriaNode) -> bool {
    let total = node.children.len();
    if total < 3 {
        // A run must be shorter than the child list and longer than one.
        return false;
    }

    let mut runs = Vec::new();
    let mut start = 0;
    while start < total {
        let kind = node.children[start].node_type;
        let mut end = start + 1;
        while end < total && node.children[end].node_type == kind {
            end += 1;
        }
        if end - start > 1 && end - start < total && GROUPABLE.contains(&kind) && kind != node.node_type {
            runs.push((start, end, kind));
        }
        start = end;
    }
    if runs.is_empty() {
        return false;
    }

    let mut children = mem::take(&mut node.children).into_iter().enumerate().peekable();
    let mut grouped = Vec::with_capacity(total);
    for (start, end, kind) in runs {
        while let Some((_, child)) = children.next_if(|(i, _)| *i < start) {
            grouped.push(child);
        }
        let mut group = AriaNode::new(kind);
        group.role = Some(kind.as_str().to_string());
        while let Some((_, child)) = children.next_if(|(i, _)| *i < end) {
            group.children.push(child);
        }
        grouped.push(group);
    }
    grouped.extend(children.map(|(_, child)| child));
    node.children = grouped;
    true
}

/// Nested-singleton flattening, then absorption of same-type children.
fn flatten_nested(node: &mut AriaNode) -> bool {
    let mut changed = false;

    let mut i = 0;
    while i < node.children.len() {
        let child = &mut node.children[i];
        if child.children.len() == 1 && nests_redundantly(child.node_type, child.children[0].node_type) {
            if let Some(grandchild) = child.children.pop() {
                child.name = merge_names(child.name.take(), grandchild.name);
                child.children = grandchild.children;
                changed = true;
                // Re-examine the same position.
                continue;
            }
        }
        i += 1;
    }

    if node.is_synthetic() || node.children.len() < 2 {
        return changed;
    }
    while let Some(pos) = node
        .children
        .iter()
        .position(|c| c.node_type == node.node_type && !c.children.is_empty())
    {
        let absorbed = node.children.remove(pos);
        node.name = merge_names(node.name.take(), absorbed.name);
        node.children.splice(pos..pos, absorbed.children);
        changed = true;
    }
    changed
}

fn nests_redundantly(outer: AriaType, inner: AriaType) -> bool {
    outer == inner
        || (outer == AriaType::Text
            && matches!(inner, AriaType::Main | AriaType::Article | AriaType::Section))
}

/// Replace nameless generic nodes by their children. Named generics are
/// retyped to text so their name survives.
fn unwrap_generics(children: Vec<AriaNode>) -> Vec<AriaNode> {
    let mut out = Vec::with_capacity(children.len());
    for child in children {
        if child.node_type != AriaType::Generic {
            out.push(child);
        } else if child.has_name() {
            let mut text = child;
            text.node_type = AriaType::Text;
            stabilize(&mut text);
            if !text.is_empty_generic() {
                out.push(text);
            }
        } else {
            out.extend(child.children);
        }
    }
    out
}

/// Root-only rewrites. Returns whether the root changed.
fn finalize_root(root: &mut AriaNode) -> bool {
    if root.node_type == AriaType::Text {
        if let Some(pos) = root.children.iter().position(|c| c.node_type.is_structural()) {
            let mut children = mem::take(&mut root.children);
            let mut promoted = children.remove(pos);
            if !promoted.has_name() {
                promoted.name = merge_names(root.name.take(), None);
            }
            // Siblings keep their place around the promoted node's content.
            let after = children.split_off(pos);
            let own = mem::take(&mut promoted.children);
            promoted.children = children.into_iter().chain(own).chain(after).collect();
            *root = promoted;
            return true;
        }
    }

    if root.children.len() == 1 && !root.children[0].children.is_empty() {
        if let Some(child) = root.children.pop() {
            root.name = merge_names(root.name.take(), child.name);
            root.children = child.children;
            return true;
        }
    }
    false
}
