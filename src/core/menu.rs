//! # Menu Compiler
//!
//! Turns the service's command tree into a navigation structure. The root level
//! and nested levels use different layouts: every root entry is a top-level
//! trigger, while nested entries are list items whose directories expand into
//! submenus. Depth is unbounded; recursion follows the tree.
//!
//! Directory triggers receive identifiers of the form `prefix + depth + '-' + n`.
//! `n` is the entry's 1-based ordinal among all entries compiled at that depth in
//! the current pass, so identifiers never collide even when two directories at the
//! same depth live under different parents. At the root the ordinal is simply the
//! sibling position. A new pass (after a reload) starts numbering from scratch.

use crate::{
    constants::{NESTED_TRIGGER_PREFIX, ROOT_TRIGGER_PREFIX, SETTINGS_KEY},
    models::{CommandInfo, CommandTree, NodeKind},
};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LABEL_SEPARATOR_RE: Regex = Regex::new(r"[-_]").unwrap();
}

/// One level of navigation: the root bar, or the contents of a submenu.
#[derive(Debug, Clone, PartialEq)]
pub struct NavFragment {
    pub depth: usize,
    pub items: Vec<NavItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavItem {
    /// Original key; used for lookups and invocation.
    pub key: String,
    /// Keys from the root down to and including this entry.
    pub key_path: Vec<String>,
    /// Display label with separators replaced by spaces.
    pub label: String,
    pub depth: usize,
    pub ordinal: usize,
    /// Attachable handle; only directory triggers and the Settings trigger carry one.
    pub id: Option<String>,
    pub layout: Layout,
    pub target: NavTarget,
}

/// How an entry is laid out, fixed by its depth and kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Root directory: a trigger owning a dropdown container.
    RootDropdown,
    /// Root leaf: a trigger wrapped as a single-item container.
    RootSingle,
    /// Nested directory: a list item with a right-expanding submenu.
    NestedSubmenu,
    /// Nested leaf: a plain list item.
    NestedItem,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavTarget {
    Submenu(NavFragment),
    OpenCommand(CommandRef),
    /// The synthetic administrative entry appended at the root.
    Settings,
}

/// Everything the "open command" action needs, detached from the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandRef {
    pub key_path: Vec<String>,
    pub info: CommandInfo,
    pub invocation_path: String,
}

impl CommandRef {
    /// The `/`-joined key path (`deploy/web/restart`).
    pub fn path(&self) -> String {
        self.key_path.join("/")
    }
}

/// Replaces `-` and `_` with spaces. The key itself is left untouched.
pub fn display_label(key: &str) -> String {
    LABEL_SEPARATOR_RE.replace_all(key, " ").into_owned()
}

/// Capitalizes every word of a label for presentation.
pub fn capitalize_label(label: &str) -> String {
    label
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compiles `tree` at `depth` in a fresh pass. Root compilation is `depth = 1`
/// and appends the Settings trigger after the last command. `0` is treated as `1`.
pub fn compile(tree: &CommandTree, depth: usize) -> NavFragment {
    let depth = depth.max(1);
    let mut pass = CompilePass::default();
    let mut fragment = pass.compile_level(tree, depth, &[]);

    if depth == 1 {
        let ordinal = pass.next_ordinal(depth);
        log::debug!("Appending settings trigger at ordinal {}", ordinal);
        fragment.items.push(NavItem {
            key: SETTINGS_KEY.to_string(),
            key_path: vec![SETTINGS_KEY.to_string()],
            label: display_label(SETTINGS_KEY),
            depth,
            ordinal,
            id: Some(trigger_id(depth, ordinal)),
            layout: Layout::RootDropdown,
            target: NavTarget::Settings,
        });
    }
    fragment
}

/// Per-pass numbering state. Dropped with the pass, so old identifiers never leak
/// into a recompilation.
#[derive(Debug, Default)]
struct CompilePass {
    ordinals: Vec<usize>,
}

impl CompilePass {
    fn next_ordinal(&mut self, depth: usize) -> usize {
        if self.ordinals.len() < depth {
            self.ordinals.resize(depth, 0);
        }
        match self.ordinals.get_mut(depth - 1) {
            Some(counter) => {
                *counter += 1;
                *counter
            }
            None => 1,
        }
    }

    fn compile_level(&mut self, tree: &CommandTree, depth: usize, parent_path: &[String]) -> NavFragment {
        let mut items = Vec::with_capacity(tree.len());

        for (key, node) in tree {
            let ordinal = self.next_ordinal(depth);
            let mut key_path = parent_path.to_vec();
            key_path.push(key.clone());

            let (layout, id, target) = match &node.kind {
                NodeKind::Directory(children) => {
                    let submenu = self.compile_level(children, depth + 1, &key_path);
                    let layout = if depth == 1 {
                        Layout::RootDropdown
                    } else {
                        Layout::NestedSubmenu
                    };
                    (layout, Some(trigger_id(depth, ordinal)), NavTarget::Submenu(submenu))
                }
                NodeKind::Leaf(leaf) => {
                    let layout = if depth == 1 {
                        Layout::RootSingle
                    } else {
                        Layout::NestedItem
                    };
                    let command = CommandRef {
                        key_path: key_path.clone(),
                        info: leaf.info.clone(),
                        invocation_path: leaf.invocation_path.clone(),
                    };
                    (layout, None, NavTarget::OpenCommand(command))
                }
            };

            items.push(NavItem {
                key: key.clone(),
                key_path,
                label: display_label(key),
                depth,
                ordinal,
                id,
                layout,
                target,
            });
        }

        NavFragment { depth, items }
    }
}

fn trigger_id(depth: usize, ordinal: usize) -> String {
    let prefix = if depth == 1 {
        ROOT_TRIGGER_PREFIX
    } else {
        NESTED_TRIGGER_PREFIX
    };
    format!("{}{}-{}", prefix, depth, ordinal)
}

impl NavFragment {
    /// Every item of this fragment and its submenus, depth first, in layout order.
    pub fn flatten(&self) -> Vec<&NavItem> {
        let mut out = Vec::new();
        collect(self, &mut out);
        out
    }

    pub fn find_by_id(&self, id: &str) -> Option<&NavItem> {
        self.flatten()
            .into_iter()
            .find(|item| item.id.as_deref() == Some(id))
    }

    /// Number of commands reachable from this fragment.
    pub fn command_count(&self) -> usize {
        self.flatten()
            .iter()
            .filter(|item| matches!(item.target, NavTarget::OpenCommand(_)))
            .count()
    }
}

fn collect<'a>(fragment: &'a NavFragment, out: &mut Vec<&'a NavItem>) {
    for item in &fragment.items {
        out.push(item);
        if let NavTarget::Submenu(submenu) = &item.target {
            collect(submenu, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CommandNode;
    use serde_json::{Value, json};
    use std::collections::HashSet;

    fn leaf(name: &str) -> Value {
        json!({ "name": name, "is_directory": false, "http_path": format!("/api/run/{}", name) })
    }

    fn dir(name: &str, children: Vec<(&str, Value)>) -> Value {
        let commands: serde_json::Map<String, Value> = children
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        json!({ "name": name, "is_directory": true, "commands": commands })
    }

    fn tree_from(value: Value) -> CommandTree {
        serde_json::from_value::<CommandNode>(value).unwrap().into_tree()
    }

    /// root: [ops (dir: [db (dir: [backup]), cache-flush]), net (dir: [dns (dir: [flush_all])]), uptime]
    fn nested_tree() -> CommandTree {
        tree_from(dir(
            "root",
            vec![
                (
                    "ops",
                    dir(
                        "ops",
                        vec![
                            ("db", dir("db", vec![("backup", leaf("backup"))])),
                            ("cache-flush", leaf("cache-flush")),
                        ],
                    ),
                ),
                (
                    "net",
                    dir("net", vec![("dns", dir("dns", vec![("flush_all", leaf("flush_all"))]))]),
                ),
                ("uptime", leaf("uptime")),
            ],
        ))
    }

    fn count_entries(tree: &CommandTree) -> usize {
        tree.values()
            .map(|node| match &node.kind {
                NodeKind::Directory(children) => 1 + count_entries(children),
                NodeKind::Leaf(_) => 1,
            })
            .sum()
    }

    #[test]
    fn test_labels_replace_separators_only() {
        assert_eq!(display_label("cache-flush_all"), "cache flush all");
        assert_eq!(capitalize_label("cache flush all"), "Cache Flush All");
        assert_eq!(display_label("plain"), "plain");
    }

    #[test]
    fn test_one_trigger_per_entry_plus_settings() {
        let tree = nested_tree();
        let nav = compile(&tree, 1);
        let flat = nav.flatten();

        assert_eq!(flat.len(), count_entries(&tree) + 1);
        let settings: Vec<_> = flat
            .iter()
            .filter(|item| matches!(item.target, NavTarget::Settings))
            .collect();
        assert_eq!(settings.len(), 1);
        assert_eq!(settings[0].depth, 1);
        assert_eq!(nav.items.last().unwrap().target, NavTarget::Settings);
    }

    #[test]
    fn test_root_and_nested_layouts() {
        let nav = compile(&nested_tree(), 1);
        let layouts: Vec<_> = nav.items.iter().map(|item| item.layout).collect();
        assert_eq!(
            layouts,
            vec![
                Layout::RootDropdown,
                Layout::RootDropdown,
                Layout::RootSingle,
                Layout::RootDropdown
            ]
        );

        let NavTarget::Submenu(ops) = &nav.items[0].target else {
            panic!("ops should be a submenu");
        };
        assert_eq!(ops.depth, 2);
        assert_eq!(ops.items[0].layout, Layout::NestedSubmenu);
        assert_eq!(ops.items[1].layout, Layout::NestedItem);
        assert_eq!(ops.items[1].label, "cache flush");
        assert_eq!(ops.items[1].key, "cache-flush");
    }

    #[test]
    fn test_identifiers_follow_depth_and_ordinal() {
        let nav = compile(&nested_tree(), 1);
        let ids: Vec<_> = nav.items.iter().map(|item| item.id.clone()).collect();
        assert_eq!(
            ids,
            vec![
                Some("navbar-dropdown-1-1".to_string()),
                Some("navbar-dropdown-1-2".to_string()),
                None,
                Some("navbar-dropdown-1-4".to_string()),
            ]
        );
        assert!(nav.find_by_id("dropdown-submenu-2-1").is_some());
        assert_eq!(
            nav.find_by_id("navbar-dropdown-1-4").unwrap().target,
            NavTarget::Settings
        );
    }

    #[test]
    fn test_identifiers_unique_across_parents() {
        // `ops/db` and `net/dns` are both the first directory under their parent.
        let nav = compile(&nested_tree(), 1);
        let ids: Vec<_> = nav.flatten().iter().filter_map(|item| item.id.clone()).collect();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(ids.len(), unique.len());
        assert!(ids.contains(&"dropdown-submenu-2-1".to_string()));
        assert!(ids.contains(&"dropdown-submenu-2-3".to_string()));
    }

    #[test]
    fn test_recompile_regenerates_from_scratch() {
        let tree = nested_tree();
        let first = compile(&tree, 1);
        let second = compile(&tree, 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_directory_still_renders() {
        let tree = tree_from(dir("root", vec![("empty", dir("empty", vec![]))]));
        let nav = compile(&tree, 1);
        let NavTarget::Submenu(submenu) = &nav.items[0].target else {
            panic!("empty directory should still own a container");
        };
        assert!(submenu.items.is_empty());
        assert_eq!(nav.items[0].id.as_deref(), Some("navbar-dropdown-1-1"));
        assert_eq!(nav.items[1].id.as_deref(), Some("navbar-dropdown-1-2"));
    }

    #[test]
    fn test_empty_tree_has_only_settings() {
        let nav = compile(&CommandTree::new(), 1);
        assert_eq!(nav.items.len(), 1);
        assert_eq!(nav.items[0].ordinal, 1);
    }

    #[test]
    fn test_commands_keep_key_path_and_invocation_path() {
        let nav = compile(&nested_tree(), 1);
        let backup = nav
            .flatten()
            .into_iter()
            .find(|item| item.key == "backup")
            .unwrap();
        let NavTarget::OpenCommand(command) = &backup.target else {
            panic!("backup is a leaf");
        };
        assert_eq!(command.path(), "ops/db/backup");
        assert_eq!(command.invocation_path, "/api/run/backup");
        assert_eq!(backup.depth, 3);
        assert_eq!(nav.command_count(), 4);
    }

    #[test]
    fn test_nested_compile_has_no_settings() {
        let nav = compile(&nested_tree(), 2);
        assert!(
            nav.flatten()
                .iter()
                .all(|item| item.target != NavTarget::Settings)
        );
        assert_eq!(nav.items[0].layout, Layout::NestedSubmenu);
    }
}
