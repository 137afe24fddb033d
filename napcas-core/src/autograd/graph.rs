//! Node arena of the computation graph.
//!
//! Every thread owns one arena. Operations append nodes to it during the
//! forward pass and tensors keep a [`NodeId`] handle to the node that produced
//! them. A node owns handles to its input tensors, so the graph is kept alive
//! from its outputs back to its leaves and never the other way around.

use crate::autograd::backward_op::Op;
use crate::tensor::Tensor;
use log::trace;
use std::cell::{Cell, RefCell};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ENGINE_ID: AtomicU64 = AtomicU64::new(1);

/// Handle of a node in a thread's graph arena.
///
/// The generation makes stale handles (nodes already consumed by a backward
/// pass) detectable instead of aliasing a newer node in the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    engine: u64,
    index: usize,
    generation: u64,
}

/// One recorded operation.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) op: Op,
    /// Inputs in forward order; backward rules return gradients in the same order.
    pub(crate) inputs: Vec<Tensor>,
    /// Copies of the input values the backward rule reads, taken at record time.
    pub(crate) saved: Vec<Option<Arc<Vec<f32>>>>,
    pub(crate) output_shape: Vec<usize>,
}

#[derive(Debug)]
struct Slot {
    generation: u64,
    node: Option<Node>,
}

#[derive(Debug)]
struct Engine {
    id: u64,
    slots: Vec<Slot>,
    free: Vec<usize>,
    live: usize,
}

impl Engine {
    fn new() -> Self {
        Engine {
            id: NEXT_ENGINE_ID.fetch_add(1, Ordering::Relaxed),
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    fn insert(&mut self, node: Node) -> NodeId {
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                NodeId {
                    engine: self.id,
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    engine: self.id,
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    fn slot(&self, id: NodeId) -> Option<&Slot> {
        if id.engine != self.id {
            return None;
        }
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
    }

    fn get(&self, id: NodeId) -> Option<Node> {
        self.slot(id).and_then(|slot| slot.node.clone())
    }

    // The node is handed back to the caller so that it is dropped outside of
    // the arena borrow: dropping it may release further nodes.
    fn take(&mut self, id: NodeId) -> Option<Node> {
        self.slot(id)?;
        let slot = &mut self.slots[id.index];
        let node = slot.node.take()?;
        slot.generation += 1;
        self.free.push(id.index);
        self.live -= 1;
        Some(node)
    }
}

thread_local! {
    static ENGINE: RefCell<Engine> = RefCell::new(Engine::new());
    static GRAD_ENABLED: Cell<bool> = const { Cell::new(true) };
}

/// Appends a node to the current thread's arena.
pub(crate) fn record(op: Op, inputs: Vec<Tensor>, output_shape: Vec<usize>) -> NodeId {
    let name = op.name();
    let saved = inputs
        .iter()
        .enumerate()
        .map(|(index, input)| {
            op.saves_input(index)
                .then(|| Arc::new(input.get_f32_data()))
        })
        .collect();
    let id = ENGINE.with(|engine| {
        engine.borrow_mut().insert(Node {
            op,
            inputs,
            saved,
            output_shape,
        })
    });
    trace!("recorded {} node {:?}", name, id);
    id
}

/// Returns a copy of the node, or `None` if it was released or belongs to
/// another thread.
pub(crate) fn get(id: NodeId) -> Option<Node> {
    ENGINE.with(|engine| engine.borrow().get(id))
}

/// Removes the node from the arena and returns it.
pub(crate) fn take(id: NodeId) -> Option<Node> {
    ENGINE.with(|engine| engine.borrow_mut().take(id))
}

/// Releases a node whose output tensor is gone. Stale handles are ignored.
pub(crate) fn release(id: NodeId) {
    // try_with: the arena may already be torn down at thread exit.
    let node = ENGINE
        .try_with(|engine| {
            engine
                .try_borrow_mut()
                .ok()
                .and_then(|mut engine| engine.take(id))
        })
        .ok()
        .flatten();
    if let Some(node) = node {
        trace!("released {} node {:?}", node.op.name(), id);
        drop(node);
    }
}

/// Number of nodes currently alive in this thread's graph.
pub fn live_node_count() -> usize {
    ENGINE.with(|engine| engine.borrow().live)
}

/// Returns whether operations on this thread are currently recorded.
pub fn is_grad_enabled() -> bool {
    GRAD_ENABLED.with(|enabled| enabled.get())
}

/// Guard returned by [`no_grad`]; restores the previous mode when dropped.
#[derive(Debug)]
pub struct NoGradGuard {
    previous: bool,
}

impl Drop for NoGradGuard {
    fn drop(&mut self) {
        GRAD_ENABLED.with(|enabled| enabled.set(self.previous));
    }
}

/// Disables graph recording on the current thread until the guard is dropped.
///
/// ```
/// use napcas_core::autograd::no_grad;
/// use napcas_core::Tensor;
///
/// let w = Tensor::ones(&[2]).unwrap().with_requires_grad();
/// let y = {
///     let _guard = no_grad();
///     w.mul_scalar(2.0).unwrap()
/// };
/// assert!(!y.requires_grad());
/// ```
pub fn no_grad() -> NoGradGuard {
    let previous = GRAD_ENABLED.with(|enabled| enabled.replace(false));
    NoGradGuard { previous }
}
