//! Extension-contributed menu items.
//!
//! Extensions register menu nodes with the extension runtime as a flat list
//! with optional parent links. Every time a menu opens, the runtime's current
//! list is read and rebuilt into a tree:
//!
//! - nodes are visited once, in the order the runtime returns them;
//! - a node attaches under its parent only if that parent was already seen
//!   (and rendered) earlier in the list, otherwise it lands at the root;
//! - each extension's items are grouped: a single top-level item is shown
//!   directly, several are wrapped in a submenu named after the extension.
//!
//! The runtime owns the nodes; this module never mutates them. A node can
//! disappear between building the menu and the user clicking it, in which
//! case [`ExtensionRuntime::dispatch_menu_click`] reports
//! [`MenuError::StaleNode`] and dispatch treats it as a miss.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::context::{ContextSnapshot, MediaKind};
use crate::error::{MenuError, Result};
use crate::item::{MenuCommand, MenuItem, MenuSection};

// ============================================================================
// Node model
// ============================================================================

/// Kind of an extension menu node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Normal,
    Checkbox,
    Radio,
    Separator,
}

impl FromStr for NodeKind {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "normal" => Ok(NodeKind::Normal),
            "checkbox" => Ok(NodeKind::Checkbox),
            "radio" => Ok(NodeKind::Radio),
            "separator" => Ok(NodeKind::Separator),
            other => Err(MenuError::UnknownNodeKind(other.to_string())),
        }
    }
}

/// Where an extension node asks to be shown.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VisibilityContext {
    All,
    Page,
    Editable,
    Selection,
    Link,
    Image,
    /// A context this subsystem does not render into.
    Other(String),
}

impl From<&str> for VisibilityContext {
    fn from(s: &str) -> Self {
        match s {
            "all" => Self::All,
            "page" => Self::Page,
            "editable" => Self::Editable,
            "selection" => Self::Selection,
            "link" => Self::Link,
            "image" => Self::Image,
            other => Self::Other(other.to_string()),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_contexts() -> Vec<String> {
    vec!["page".to_string()]
}

fn default_kind() -> String {
    "normal".to_string()
}

/// A menu node as stored by the extension runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExtensionNode {
    pub extension_id: String,
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub checked: bool,
    #[serde(default = "default_contexts")]
    pub contexts: Vec<String>,
}

/// A validated extension menu node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionMenuNode {
    pub extension_id: String,
    pub id: String,
    pub parent_id: Option<String>,
    pub title: String,
    pub kind: NodeKind,
    pub enabled: bool,
    pub checked: bool,
    pub contexts: Vec<VisibilityContext>,
}

impl TryFrom<RawExtensionNode> for ExtensionMenuNode {
    type Error = MenuError;

    fn try_from(raw: RawExtensionNode) -> Result<Self> {
        Ok(Self {
            kind: raw.kind.parse()?,
            contexts: raw.contexts.iter().map(|c| c.as_str().into()).collect(),
            extension_id: raw.extension_id,
            id: raw.id,
            parent_id: raw.parent_id,
            title: raw.title,
            enabled: raw.enabled,
            checked: raw.checked,
        })
    }
}

impl ExtensionMenuNode {
    /// Whether the node is shown for a page click, or an editable click.
    pub fn is_visible(&self, editable: bool) -> bool {
        self.contexts.iter().any(|context| match context {
            VisibilityContext::All | VisibilityContext::Page => true,
            VisibilityContext::Editable => editable,
            _ => false,
        })
    }

    fn is_separator(&self) -> bool {
        self.kind == NodeKind::Separator
    }
}

/// Parse raw runtime records, skipping (and logging) unknown node kinds.
pub fn parse_nodes(raw: Vec<RawExtensionNode>) -> Vec<ExtensionMenuNode> {
    raw.into_iter()
        .filter_map(|node| {
            let extension_id = node.extension_id.clone();
            let id = node.id.clone();
            match ExtensionMenuNode::try_from(node) {
                Ok(node) => Some(node),
                Err(e) => {
                    tracing::warn!(
                        target: "horizon_menu::extension",
                        %extension_id,
                        node_id = %id,
                        "skipping extension menu node: {}",
                        e
                    );
                    None
                }
            }
        })
        .collect()
}

// ============================================================================
// Click dispatch
// ============================================================================

/// What an extension learns about the click that invoked its node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtensionClickContext {
    pub page_url: Option<String>,
    pub frame_url: Option<String>,
    pub link_url: Option<String>,
    pub src_url: Option<String>,
    pub selection_text: Option<String>,
    pub editable: bool,
    pub media_kind: MediaKind,
    /// Checked state before the click, for checkbox and radio nodes.
    pub was_checked: Option<bool>,
    /// Checked state after the click, for checkbox and radio nodes.
    pub checked: Option<bool>,
}

impl ExtensionClickContext {
    /// The click facts shared by every node in one menu.
    pub fn from_snapshot(snapshot: &ContextSnapshot) -> Self {
        Self {
            page_url: snapshot.page_url.clone(),
            frame_url: snapshot.frame_url.clone(),
            link_url: snapshot.link_url.clone(),
            src_url: snapshot.src_url.clone(),
            selection_text: snapshot
                .has_selection()
                .then(|| snapshot.selection_text.clone()),
            editable: snapshot.is_editable,
            media_kind: snapshot.media_kind,
            was_checked: None,
            checked: None,
        }
    }
}

/// A click routed back to the extension that owns a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionClick {
    pub extension_id: String,
    pub node_id: String,
    pub context: ExtensionClickContext,
}

/// The extension runtime.
pub trait ExtensionRuntime: Send + Sync {
    /// The current flat list of registered menu nodes, in registration order.
    fn registered_menu_nodes(&self) -> Vec<RawExtensionNode>;

    /// Display name of an extension, used to label its grouping submenu.
    fn extension_name(&self, extension_id: &str) -> Option<String>;

    /// Deliver a click. Returns [`MenuError::StaleNode`] if the node is gone.
    fn dispatch_menu_click(&self, click: &ExtensionClick) -> Result<()>;
}

// ============================================================================
// Tree builder
// ============================================================================

/// Deepest nesting an extension tree may reach. Nodes past it attach at root.
pub const MAX_MENU_DEPTH: usize = 32;

struct Slot<'a> {
    node: &'a ExtensionMenuNode,
    depth: usize,
    children: Vec<usize>,
}

/// Rebuilds menu trees from flat node lists.
///
/// The builder holds the click context that every rendered node's command
/// carries; the arena and id index live only for one [`build_tree`] call.
///
/// [`build_tree`]: ExtensionTreeBuilder::build_tree
#[derive(Debug, Clone)]
pub struct ExtensionTreeBuilder {
    click_context: ExtensionClickContext,
}

impl ExtensionTreeBuilder {
    pub fn new(click_context: ExtensionClickContext) -> Self {
        Self { click_context }
    }

    /// Build the tree for one extension's nodes.
    pub fn build_tree(&self, nodes: &[ExtensionMenuNode], editable: bool) -> Vec<MenuItem> {
        let mut arena: Vec<Slot<'_>> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut roots: Vec<usize> = Vec::new();

        for node in nodes {
            if !node.is_visible(editable) {
                continue;
            }

            let slot = arena.len();
            let parent = node
                .parent_id
                .as_deref()
                .and_then(|parent_id| index.get(parent_id).copied())
                .filter(|&parent| !arena[parent].node.is_separator());
            let too_deep = parent.is_some_and(|parent| arena[parent].depth >= MAX_MENU_DEPTH);

            match parent {
                Some(parent) if !too_deep => {
                    let depth = arena[parent].depth + 1;
                    arena.push(Slot {
                        node,
                        depth,
                        children: Vec::new(),
                    });
                    arena[parent].children.push(slot);
                }
                _ => {
                    if too_deep {
                        tracing::trace!(
                            target: "horizon_menu::extension",
                            node_id = %node.id,
                            max_depth = MAX_MENU_DEPTH,
                            "nesting too deep, attaching at root"
                        );
                    } else if node.parent_id.is_some() {
                        tracing::trace!(
                            target: "horizon_menu::extension",
                            node_id = %node.id,
                            "parent not seen yet, attaching at root"
                        );
                    }
                    arena.push(Slot {
                        node,
                        depth: 1,
                        children: Vec::new(),
                    });
                    roots.push(slot);
                }
            }

            index.insert(node.id.as_str(), slot);
        }

        roots
            .into_iter()
            .filter(|&slot| !arena[slot].node.is_separator())
            .map(|slot| self.materialize(&arena, slot))
            .collect()
    }

    /// Build the extension section: one group per extension, in order of
    /// each extension's first node.
    pub fn build_section(
        &self,
        nodes: &[ExtensionMenuNode],
        editable: bool,
        extension_name: impl Fn(&str) -> Option<String>,
    ) -> MenuSection {
        let mut order: Vec<&str> = Vec::new();
        let mut groups: HashMap<&str, Vec<ExtensionMenuNode>> = HashMap::new();
        for node in nodes {
            let key = node.extension_id.as_str();
            if !groups.contains_key(key) {
                order.push(key);
            }
            groups.entry(key).or_default().push(node.clone());
        }

        let mut items = Vec::new();
        for extension_id in order {
            let Some(group) = groups.get(extension_id) else {
                continue;
            };
            let mut top_level = self.build_tree(group, editable);
            match top_level.len() {
                0 => {}
                1 => items.append(&mut top_level),
                _ => {
                    let label =
                        extension_name(extension_id).unwrap_or_else(|| extension_id.to_string());
                    items.extend(MenuItem::submenu(label, top_level));
                }
            }
        }
        MenuSection::new(items)
    }

    fn materialize(&self, arena: &[Slot<'_>], slot: usize) -> MenuItem {
        let node = arena[slot].node;
        if node.is_separator() {
            return MenuItem::separator();
        }

        let children: Vec<MenuItem> = arena[slot]
            .children
            .iter()
            .map(|&child| self.materialize(arena, child))
            .collect();
        let children = normalize_separators(children);

        // A container with nothing left under it stays directly invocable.
        match MenuItem::submenu(node.title.clone(), children) {
            Some(submenu) => submenu,
            None => self.render_leaf(node),
        }
    }

    fn render_leaf(&self, node: &ExtensionMenuNode) -> MenuItem {
        let mut context = self.click_context.clone();
        let item = match node.kind {
            NodeKind::Normal => {
                let command = self.click_command(node, context);
                MenuItem::action(node.title.clone(), command)
            }
            NodeKind::Checkbox => {
                context.was_checked = Some(node.checked);
                context.checked = Some(!node.checked);
                let command = self.click_command(node, context);
                MenuItem::checkbox(node.title.clone(), node.checked, command)
            }
            NodeKind::Radio => {
                context.was_checked = Some(node.checked);
                context.checked = Some(true);
                let command = self.click_command(node, context);
                MenuItem::radio(node.title.clone(), node.checked, command)
            }
            NodeKind::Separator => return MenuItem::separator(),
        };
        item.with_enabled(node.enabled)
    }

    fn click_command(&self, node: &ExtensionMenuNode, context: ExtensionClickContext) -> MenuCommand {
        MenuCommand::Extension(ExtensionClick {
            extension_id: node.extension_id.clone(),
            node_id: node.id.clone(),
            context,
        })
    }
}

/// Drop leading, trailing and repeated separators.
fn normalize_separators(items: Vec<MenuItem>) -> Vec<MenuItem> {
    let mut out: Vec<MenuItem> = Vec::with_capacity(items.len());
    for item in items {
        if item.is_separator() && out.last().is_none_or(MenuItem::is_separator) {
            continue;
        }
        out.push(item);
    }
    if out.last().is_some_and(MenuItem::is_separator) {
        out.pop();
    }
    out
}
