// SPDX-License-Identifier: MIT OR Apache-2.0

//! Game record tree: moves, variations and path-based addressing
//!
//! Nodes live in an arena owned by [`RunningGame`]. Parent links are plain
//! indices, children are kept in insertion order and the first child of every
//! node continues the main line. Callers address nodes with a [`NodePath`],
//! the list of child indices leading from the root, so navigation state can
//! be copied, compared and stored independently of the tree.

use crate::{meta::GameMetaInformation, ActionType, Color, GameError, Move, Position, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node inside the arena of one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node of every game
    pub const ROOT: NodeId = NodeId(0);
}

/// Root-relative address of a node: one child index per level
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// The empty path, addressing the root
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// The path that always takes the first child, `depth` levels deep
    pub fn main_line(depth: usize) -> Self {
        Self(vec![0; depth])
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    pub fn pop(&mut self) -> Option<usize> {
        self.0.pop()
    }

    /// A new path addressing the `index`-th child of this node
    pub fn child(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.push(index);
        path
    }

    /// The parent's path, or `None` for the root
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }

    /// Whether `other` lies on the way from the root to this node
    pub fn starts_with(&self, other: &NodePath) -> bool {
        self.0.starts_with(&other.0)
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl FromIterator<usize> for NodePath {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Clock state captured when a move is committed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    /// Main or period time left for the mover, in milliseconds
    pub clock_remaining_millis: Option<i64>,
    /// Overtime periods (or stones) left for the mover
    pub overtime_periods_remaining: Option<i8>,
}

/// One node of the game record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveNode {
    /// `None` only for the root
    action: Option<Move>,
    /// `None` only for the root
    color: Option<Color>,
    pub clock_remaining_millis: Option<i64>,
    pub overtime_periods_remaining: Option<i8>,
    pub comment: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl MoveNode {
    fn root() -> Self {
        Self {
            action: None,
            color: None,
            clock_remaining_millis: None,
            overtime_periods_remaining: None,
            comment: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn action(&self) -> Option<Move> {
        self.action
    }

    pub fn action_type(&self) -> Option<ActionType> {
        self.action.map(|a| a.action_type())
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Whether Black made this move; false for the root
    pub fn is_black(&self) -> bool {
        self.color == Some(Color::Black)
    }

    pub fn position(&self) -> Option<Position> {
        self.action.map(|a| a.position())
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_pass(&self) -> bool {
        self.action == Some(Move::Pass)
    }

    pub fn is_resign(&self) -> bool {
        self.action == Some(Move::Resign)
    }

    pub fn timing(&self) -> Timing {
        Timing {
            clock_remaining_millis: self.clock_remaining_millis,
            overtime_periods_remaining: self.overtime_periods_remaining,
        }
    }

    pub fn set_timing(&mut self, timing: Timing) {
        self.clock_remaining_millis = timing.clock_remaining_millis;
        self.overtime_periods_remaining = timing.overtime_periods_remaining;
    }
}

/// A game being played or reviewed
///
/// Owns the move tree and the game information, and tracks two paths: the
/// cursor (the position currently looked at) and the line actually played so
/// far, which `play_move` extends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningGame {
    nodes: Vec<MoveNode>,
    meta: GameMetaInformation,
    current: NodePath,
    played: NodePath,
}

impl Default for RunningGame {
    fn default() -> Self {
        Self::new(GameMetaInformation::default())
    }
}

impl RunningGame {
    /// Create a game holding only the root node
    pub fn new(meta: GameMetaInformation) -> Self {
        Self {
            nodes: vec![MoveNode::root()],
            meta,
            current: NodePath::root(),
            played: NodePath::root(),
        }
    }

    /// Create an empty game on a board of the given size
    pub fn with_board_size(board_size: u8) -> Result<Self> {
        Ok(Self::new(GameMetaInformation::new(board_size)?))
    }

    pub fn meta(&self) -> &GameMetaInformation {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut GameMetaInformation {
        &mut self.meta
    }

    pub fn board_size(&self) -> u8 {
        self.meta.board_size()
    }

    /// Change the board size; only allowed while no move is recorded
    pub fn set_board_size(&mut self, size: u8) -> Result<()> {
        if self.has_moves() {
            return Err(GameError::BoardSizeLocked);
        }
        crate::meta::check_board_size(size)?;
        self.meta.set_board_size_unchecked(size);
        Ok(())
    }

    /// Whether any node besides the root exists
    pub fn has_moves(&self) -> bool {
        self.nodes.len() > 1
    }

    /// Total number of nodes including the root
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn root(&self) -> &MoveNode {
        &self.nodes[NodeId::ROOT.0]
    }

    /// Look up a node by id
    pub fn node(&self, id: NodeId) -> Option<&MoveNode> {
        self.nodes.get(id.0)
    }

    /// Resolve a path to the id of the node it addresses
    pub fn resolve(&self, path: &NodePath) -> Result<NodeId> {
        let mut id = NodeId::ROOT;
        for &index in path.indices() {
            id = *self.nodes[id.0]
                .children
                .get(index)
                .ok_or_else(|| GameError::InvalidPath(path.clone()))?;
        }
        Ok(id)
    }

    /// The node at `path`
    pub fn get_node(&self, path: &NodePath) -> Result<&MoveNode> {
        let id = self.resolve(path)?;
        Ok(&self.nodes[id.0])
    }

    /// Mutable access to the node at `path`, e.g. to attach timing or comments
    pub fn get_node_mut(&mut self, path: &NodePath) -> Result<&mut MoveNode> {
        let id = self.resolve(path)?;
        Ok(&mut self.nodes[id.0])
    }

    /// Rebuild the path of a node by walking its parent links
    pub fn path_of(&self, id: NodeId) -> Option<NodePath> {
        let mut indices = Vec::new();
        let mut node = self.node(id)?;
        let mut current = id;
        while let Some(parent) = node.parent {
            let parent_node = &self.nodes[parent.0];
            let index = parent_node.children.iter().position(|&c| c == current)?;
            indices.push(index);
            current = parent;
            node = parent_node;
        }
        indices.reverse();
        Some(NodePath(indices))
    }

    /// The nodes from the root (excluded) down to the node at `path` (included)
    pub fn line_to(&self, path: &NodePath) -> Result<Vec<&MoveNode>> {
        let mut line = Vec::with_capacity(path.len());
        let mut id = NodeId::ROOT;
        for &index in path.indices() {
            id = *self.nodes[id.0]
                .children
                .get(index)
                .ok_or_else(|| GameError::InvalidPath(path.clone()))?;
            line.push(&self.nodes[id.0]);
        }
        Ok(line)
    }

    /// Color expected to move after the node `id`
    fn color_after(&self, id: NodeId) -> Color {
        match self.nodes[id.0].color {
            Some(color) => color.opposite(),
            None if self.meta.handicap >= 2 => Color::White,
            None => Color::Black,
        }
    }

    /// Append a move as the last child of the node at `parent_path`
    ///
    /// The color alternates from the parent unless `color` overrides it.
    /// Returns the index of the new child among its siblings, which is 0
    /// when the move continues the main line.
    pub fn record_move(
        &mut self,
        action: Move,
        parent_path: &NodePath,
        color: Option<Color>,
    ) -> Result<usize> {
        if let Move::Place(coord) = action {
            if !coord.is_valid(self.board_size()) {
                return Err(GameError::InvalidPosition {
                    x: coord.x.into(),
                    y: coord.y.into(),
                    board_size: self.board_size(),
                });
            }
        }

        let parent = self.resolve(parent_path)?;
        let color = color.unwrap_or_else(|| self.color_after(parent));
        let id = NodeId(self.nodes.len());

        self.nodes.push(MoveNode {
            action: Some(action),
            color: Some(color),
            parent: Some(parent),
            ..MoveNode::root()
        });
        let children = &mut self.nodes[parent.0].children;
        children.push(id);
        let index = children.len() - 1;

        tracing::debug!(?action, ?color, parent = %parent_path, index, "recorded move");
        Ok(index)
    }

    /// Path that always follows the first child, cut at `depth` or at the
    /// end of the main line, whichever comes first
    pub fn main_line_path(&self, depth: usize) -> NodePath {
        let mut path = NodePath::root();
        let mut node = self.root();
        while path.len() < depth {
            match node.children.first() {
                Some(&child) => {
                    path.push(0);
                    node = &self.nodes[child.0];
                }
                None => break,
            }
        }
        path
    }

    /// Path of the last node of the main line
    pub fn main_line_end(&self) -> NodePath {
        self.main_line_path(usize::MAX)
    }

    /// The nodes of the main line, root excluded
    pub fn main_line(&self) -> Vec<&MoveNode> {
        let mut line = Vec::new();
        let mut node = self.root();
        while let Some(&child) = node.children.first() {
            node = &self.nodes[child.0];
            line.push(node);
        }
        line
    }

    /// The children of the node at `path`, first child (main line) first
    pub fn children_of(&self, path: &NodePath) -> Result<Vec<&MoveNode>> {
        let node = self.get_node(path)?;
        Ok(node.children.iter().map(|&id| &self.nodes[id.0]).collect())
    }

    /// Path of the position currently looked at
    pub fn current_path(&self) -> &NodePath {
        &self.current
    }

    pub fn current_node(&self) -> &MoveNode {
        // The cursor only ever holds paths that resolved when they were set,
        // and nodes are never removed.
        self.get_node(&self.current).unwrap_or_else(|_| self.root())
    }

    /// Move the cursor to `path`
    pub fn set_current(&mut self, path: NodePath) -> Result<()> {
        self.resolve(&path)?;
        self.current = path;
        Ok(())
    }

    /// Move the cursor to its `child_index`-th child
    pub fn advance(&mut self, child_index: usize) -> Result<()> {
        let next = self.current.child(child_index);
        self.set_current(next)
    }

    /// Move the cursor to its parent; a no-op at the root
    pub fn retreat(&mut self) {
        self.current.pop();
    }

    /// Depth of the cursor, i.e. the number of moves up to it
    pub fn depth(&self) -> usize {
        self.current.len()
    }

    /// Line played so far (the path `play_move` extends)
    pub fn played_line(&self) -> &NodePath {
        &self.played
    }

    /// Replace the line played so far, e.g. after loading a record
    pub fn set_played_line(&mut self, path: NodePath) -> Result<()> {
        self.resolve(&path)?;
        self.played = path;
        Ok(())
    }

    /// Color to move at the cursor
    pub fn to_play(&self) -> Color {
        self.color_to_play_after(&self.current)
            .unwrap_or(Color::Black)
    }

    /// Color expected to move after the node at `path`
    pub fn color_to_play_after(&self, path: &NodePath) -> Result<Color> {
        let id = self.resolve(path)?;
        Ok(self.color_after(id))
    }

    /// Play a move at the end of the line played so far and move the cursor
    /// onto it
    pub fn play_move(&mut self, action: Move, timing: Timing) -> Result<usize> {
        let parent = self.played.clone();
        let index = self.record_move(action, &parent, None)?;
        self.played.push(index);
        let path = self.played.clone();
        self.get_node_mut(&path)?.set_timing(timing);
        self.current = path;
        Ok(index)
    }

    /// Record a move below the cursor and move the cursor onto it
    ///
    /// Used when reviewing: playing into an earlier position starts a
    /// variation instead of rewriting what follows.
    pub fn record_move_at_cursor(&mut self, action: Move, color: Option<Color>) -> Result<usize> {
        let parent = self.current.clone();
        let index = self.record_move(action, &parent, color)?;
        self.current.push(index);
        if self.current.len() == self.played.len() + 1 && self.current.starts_with(&self.played) {
            self.played = self.current.clone();
        }
        Ok(index)
    }

    /// Step the cursor one move forward along the played line
    pub fn skip_forward(&mut self) -> bool {
        if self.current.len() < self.played.len() && self.played.starts_with(&self.current) {
            let next = self.played.indices()[self.current.len()];
            self.current.push(next);
            return true;
        }
        false
    }

    /// Step the cursor one move back
    pub fn skip_backward(&mut self) -> bool {
        self.current.pop().is_some()
    }
}

/// Largest board whose coordinates and pass letter fit in `a`..`z`
pub const MAX_BOARD_SIZE: u8 = 25;
