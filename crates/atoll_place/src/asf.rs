//! The ASF-B*-tree core: tree ownership, the packing pipeline, and the
//! perturbation hooks an outer annealer drives.

use crate::builder;
use crate::error::PlaceError;
use crate::packer;
use crate::symmetry;
use crate::tree::{BStarTree, NodeId};
use crate::validate;
use atoll_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use atoll_model::{Module, ModuleMap, SymmetryGroup};

/// An automatic symmetric-feasible B*-tree over one symmetry group.
///
/// Holds exclusive borrows of the module registry and the group descriptor
/// for its lifetime: the core is the only writer of module positions and
/// orientation flags, and of the group's axis coordinate. The outer annealer
/// mutates the tree through [`rotate`](Self::rotate), [`swap`](Self::swap),
/// and [`move_node`](Self::move_node), then calls [`pack`](Self::pack)
/// before reading any coordinate back.
pub struct AsfBStarTree<'a> {
    modules: &'a mut ModuleMap,
    group: &'a mut SymmetryGroup,
    tree: BStarTree,
    preorder: Vec<NodeId>,
    inorder: Vec<NodeId>,
}

impl<'a> AsfBStarTree<'a> {
    /// Creates a core over the given registry and group descriptor.
    ///
    /// The tree starts empty; call
    /// [`build_initial_tree`](Self::build_initial_tree) before packing.
    pub fn new(modules: &'a mut ModuleMap, group: &'a mut SymmetryGroup) -> Self {
        Self {
            modules,
            group,
            tree: BStarTree::new(),
            preorder: Vec::new(),
            inorder: Vec::new(),
        }
    }

    /// Builds the deterministic symmetric-feasible initial tree, replacing
    /// any previous tree.
    pub fn build_initial_tree(&mut self, sink: &DiagnosticSink) -> Result<(), PlaceError> {
        self.tree = builder::build_initial_tree(self.modules, self.group)?;
        self.preorder.clear();
        self.inorder.clear();
        sink.emit(
            Diagnostic::note(
                DiagnosticCode::new(Category::Placement, 304),
                format!("built initial tree over {} representatives", self.tree.len()),
            )
            .with_note(self.tree.format_structure()),
        );
        Ok(())
    }

    /// Packs the tree and positions the mirrored modules.
    ///
    /// Runs the full sequence: traversal rebuild, B*-tree packing with
    /// compaction, axis computation, mirror placement, and symmetry
    /// validation. Returns whether validation passed; fatal errors from the
    /// lower layers are converted into a `false` return after emitting an
    /// error diagnostic.
    pub fn pack(&mut self, sink: &DiagnosticSink) -> bool {
        match self.try_pack(sink) {
            Ok(valid) => valid,
            Err(err) => {
                sink.emit(Diagnostic::error(err.diagnostic_code(), err.to_string()));
                false
            }
        }
    }

    fn try_pack(&mut self, sink: &DiagnosticSink) -> Result<bool, PlaceError> {
        self.rebuild_traversals();
        packer::pack_tree(&self.tree, self.modules, self.group)?;
        symmetry::compute_axis(self.modules, self.group, sink)?;
        symmetry::place_mirrors(self.modules, self.group, sink)?;
        Ok(validate::validate_symmetry(self.modules, self.group, sink))
    }

    fn rebuild_traversals(&mut self) {
        self.preorder = self.tree.preorder();
        self.inorder = self.tree.inorder();
    }

    /// Checks the symmetry equations of the current placement.
    pub fn validate_symmetry(&self, sink: &DiagnosticSink) -> bool {
        validate::validate_symmetry(self.modules, self.group, sink)
    }

    /// Checks that the current placement is a single connected island.
    pub fn validate_connectivity(&self, sink: &DiagnosticSink) -> bool {
        validate::validate_connectivity(self.modules, self.group, sink)
    }

    /// Rotates the named module in place, swapping its dimensions.
    ///
    /// Like every perturbation, the caller must re-pack before reading
    /// coordinates.
    pub fn rotate(&mut self, name: &str) -> Result<(), PlaceError> {
        match self.modules.get_mut(name) {
            Some(module) => {
                module.rotate();
                Ok(())
            }
            None => Err(PlaceError::UnknownModule {
                name: name.to_string(),
            }),
        }
    }

    /// Exchanges the modules placed by two tree nodes; the tree shape is
    /// unchanged.
    pub fn swap(&mut self, a: &str, b: &str) -> Result<(), PlaceError> {
        let a_id = self.find_node(a)?;
        let b_id = self.find_node(b)?;
        if a_id == b_id {
            return Ok(());
        }
        let a_name = self.tree.node(a_id).module.clone();
        let b_name = self.tree.node(b_id).module.clone();
        self.tree.node_mut(a_id).module = b_name;
        self.tree.node_mut(b_id).module = a_name;
        self.tree.validate_structure(&self.group.representatives())
    }

    /// Detaches `src` (with its subtree) and re-attaches it as a child of
    /// `dst`.
    ///
    /// A subtree already occupying the target slot is re-hung on the first
    /// open same-side slot inside the moved subtree. Moving the root, moving
    /// a node into its own subtree, or naming a module absent from the tree
    /// is [`PlaceError::InvalidTopology`] / [`PlaceError::UnknownModule`].
    pub fn move_node(
        &mut self,
        src: &str,
        dst: &str,
        as_left_child: bool,
    ) -> Result<(), PlaceError> {
        let src_id = self.find_node(src)?;
        let dst_id = self.find_node(dst)?;
        if src_id == dst_id {
            return Err(PlaceError::InvalidTopology {
                reason: format!("cannot move `{src}` onto itself"),
            });
        }
        if self.tree.in_subtree(src_id, dst_id) {
            return Err(PlaceError::InvalidTopology {
                reason: format!("`{dst}` lies inside the subtree of `{src}`"),
            });
        }
        let (parent, from_left) = match self.tree.parent_of(src_id) {
            Some(link) => link,
            None => {
                return Err(PlaceError::InvalidTopology {
                    reason: format!("cannot move the root `{src}`"),
                })
            }
        };

        if from_left {
            self.tree.node_mut(parent).left = None;
        } else {
            self.tree.node_mut(parent).right = None;
        }

        let displaced = if as_left_child {
            self.tree.node_mut(dst_id).left.replace(src_id)
        } else {
            self.tree.node_mut(dst_id).right.replace(src_id)
        };
        if let Some(displaced) = displaced {
            let hook = if as_left_child {
                self.tree.find_open_left_slot(src_id)
            } else {
                self.tree.find_open_right_slot(src_id)
            };
            match hook {
                Some(hook) => {
                    if as_left_child {
                        self.tree.node_mut(hook).left = Some(displaced);
                    } else {
                        self.tree.node_mut(hook).right = Some(displaced);
                    }
                }
                None => {
                    return Err(PlaceError::InvalidTopology {
                        reason: format!("no open slot to re-hang the child displaced by `{src}`"),
                    })
                }
            }
        }

        self.tree.validate_structure(&self.group.representatives())
    }

    fn find_node(&self, name: &str) -> Result<NodeId, PlaceError> {
        self.tree.find(name).ok_or_else(|| PlaceError::UnknownModule {
            name: name.to_string(),
        })
    }

    /// The current tree.
    pub fn tree(&self) -> &BStarTree {
        &self.tree
    }

    /// Pre-order traversal captured by the last `pack()`.
    pub fn preorder(&self) -> &[NodeId] {
        &self.preorder
    }

    /// In-order traversal captured by the last `pack()`.
    pub fn inorder(&self) -> &[NodeId] {
        &self.inorder
    }

    /// The axis coordinate of the group (negative before the first pack).
    pub fn axis(&self) -> f64 {
        self.group.axis
    }

    /// Read access to a module record.
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }
}
