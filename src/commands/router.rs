//! Multi-token alias router.
//!
//! Aliases are token paths (`"quote add"` is `["quote", "add"]`) stored in a
//! trie keyed by token. Routing walks the trie greedily along the input
//! tokens and returns the deepest command seen, so `quote add hi` resolves
//! to `quote add` (2 tokens consumed) rather than `quote` (1 token).
//!
//! The trie is built once at startup and never mutated afterwards, which
//! makes concurrent lookups safe without locking.
//!
//! Registration rejects ambiguous tables:
//! - two commands claiming the identical alias path, and
//! - one command's alias being a token-wise prefix of another command's
//!   alias, unless one of them is a declared (possibly nested) sub-command
//!   of the other.

use super::Command;
use super::args::{self, BindError};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Registration-time configuration errors.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("command `{command}` declares an empty alias")]
    EmptyAlias { command: String },

    #[error("alias `{alias}` is already registered")]
    AliasCollision { alias: String },

    #[error("alias `{alias}` conflicts with unrelated command `{other}`")]
    PrefixConflict { alias: String, other: String },

    #[error("command `{alias}` has invalid arguments: {source}")]
    InvalidArguments {
        alias: String,
        #[source]
        source: BindError,
    },
}

#[derive(Default, Clone)]
struct RouteNode {
    children: HashMap<String, RouteNode>,
    /// Index into `Router::entries` of the command ending here.
    terminal: Option<usize>,
}

impl RouteNode {
    fn collect_terminals(&self, out: &mut Vec<usize>) {
        for child in self.children.values() {
            if let Some(id) = child.terminal {
                out.push(id);
            }
            child.collect_terminals(out);
        }
    }
}

#[derive(Clone)]
struct Entry {
    command: Arc<dyn Command>,
    parent: Option<usize>,
}

/// Alias trie plus the flattened command list.
#[derive(Default, Clone)]
pub struct Router {
    root: RouteNode,
    entries: Vec<Entry>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command and, recursively, all of its sub-commands.
    ///
    /// The whole tree is registered or nothing is: on error the table is
    /// left exactly as it was.
    pub fn add_command(&mut self, command: Arc<dyn Command>) -> Result<(), RouteError> {
        // Registration only happens at startup, so staging on a copy is fine
        let mut staged = self.clone();
        staged.insert(command, None)?;
        *self = staged;
        Ok(())
    }

    fn insert(&mut self, command: Arc<dyn Command>, parent: Option<usize>) -> Result<(), RouteError> {
        let name = primary_alias(command.as_ref()).to_string();
        args::validate(command.args()).map_err(|source| RouteError::InvalidArguments {
            alias: name.clone(),
            source,
        })?;

        let id = self.entries.len();
        self.entries.push(Entry {
            command: Arc::clone(&command),
            parent,
        });

        for alias in command.aliases() {
            let path: Vec<&str> = alias.split_whitespace().collect();
            if path.is_empty() {
                return Err(RouteError::EmptyAlias { command: name });
            }
            self.check_path(alias, &path, id)?;

            let mut node = &mut self.root;
            for token in &path {
                node = node.children.entry((*token).to_string()).or_default();
            }
            node.terminal = Some(id);
            debug!(alias, command = %name, "Registered alias");
        }

        for sub in command.subcommands() {
            self.insert(sub, Some(id))?;
        }
        Ok(())
    }

    /// Reject `path` if it collides with or shadows an unrelated command.
    fn check_path(&self, alias: &str, path: &[&str], id: usize) -> Result<(), RouteError> {
        let mut node = &self.root;
        for (depth, token) in path.iter().enumerate() {
            let Some(next) = node.children.get(*token) else {
                return Ok(());
            };
            node = next;
            let is_last = depth + 1 == path.len();
            match node.terminal {
                Some(_) if is_last => {
                    return Err(RouteError::AliasCollision {
                        alias: alias.to_string(),
                    });
                }
                Some(other) if !self.related(other, id) => {
                    return Err(self.conflict(alias, other));
                }
                _ => {}
            }
        }

        // Full path already exists as an interior node: check what hangs below it
        let mut below = Vec::new();
        node.collect_terminals(&mut below);
        match below.into_iter().find(|other| !self.related(*other, id)) {
            Some(other) => Err(self.conflict(alias, other)),
            None => Ok(()),
        }
    }

    fn conflict(&self, alias: &str, other: usize) -> RouteError {
        RouteError::PrefixConflict {
            alias: alias.to_string(),
            other: primary_alias(self.entries[other].command.as_ref()).to_string(),
        }
    }

    /// Whether one command is the other, or an ancestor of it.
    fn related(&self, a: usize, b: usize) -> bool {
        self.is_ancestor(a, b) || self.is_ancestor(b, a)
    }

    fn is_ancestor(&self, ancestor: usize, mut id: usize) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.entries[id].parent {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    /// Resolve the longest registered alias prefix of `tokens`.
    ///
    /// Returns the command and the number of tokens its alias consumed, or
    /// `None` when not even the first token matches an alias.
    pub fn route(&self, tokens: &[&str]) -> Option<(&Arc<dyn Command>, usize)> {
        let mut node = &self.root;
        let mut found = None;
        for (depth, token) in tokens.iter().enumerate() {
            let Some(next) = node.children.get(*token) else {
                break;
            };
            node = next;
            if let Some(id) = node.terminal {
                found = Some((id, depth + 1));
            }
        }
        found.map(|(id, consumed)| (&self.entries[id].command, consumed))
    }

    /// Every registered command, depth-first in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &Arc<dyn Command>> {
        self.entries.iter().map(|entry| &entry.command)
    }

    /// Primary alias of every registered command, in [`Router::commands`] order.
    pub fn aliases(&self) -> Vec<&'static str> {
        self.commands()
            .map(|command| primary_alias(command.as_ref()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// First alias of a command, used to name it in listings and logs.
pub fn primary_alias(command: &dyn Command) -> &'static str {
    command.aliases().first().copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::args::{ArgSpec, Args};
    use crate::commands::{CommandResult, Context};
    use async_trait::async_trait;

    struct Stub {
        aliases: Vec<&'static str>,
        subs: Vec<Arc<dyn Command>>,
        args: &'static [ArgSpec],
    }

    fn stub(aliases: &[&'static str]) -> Stub {
        Stub {
            aliases: aliases.to_vec(),
            subs: Vec::new(),
            args: &[],
        }
    }

    fn with_subs(aliases: &[&'static str], subs: Vec<Stub>) -> Arc<dyn Command> {
        Arc::new(Stub {
            subs: subs.into_iter().map(|s| Arc::new(s) as Arc<dyn Command>).collect(),
            ..stub(aliases)
        })
    }

    #[async_trait]
    impl Command for Stub {
        fn aliases(&self) -> &[&'static str] {
            &self.aliases
        }

        fn description(&self) -> &str {
            "stub"
        }

        fn args(&self) -> &'static [ArgSpec] {
            self.args
        }

        fn subcommands(&self) -> Vec<Arc<dyn Command>> {
            self.subs.clone()
        }

        async fn execute(&self, _ctx: &Context<'_>, _args: &Args) -> CommandResult {
            Ok(None)
        }
    }

    fn quote_router() -> Router {
        let mut router = Router::new();
        router
            .add_command(with_subs(
                &["quote"],
                vec![stub(&["quote add"]), stub(&["quote list", "quote ls"])],
            ))
            .unwrap();
        router.add_command(Arc::new(stub(&["ping"]))).unwrap();
        router
    }

    #[test]
    fn test_longest_match_wins() {
        let router = quote_router();
        let (command, consumed) = router.route(&["quote", "add", "hi"]).unwrap();
        assert_eq!(primary_alias(command.as_ref()), "quote add");
        assert_eq!(consumed, 2);
    }

    #[test]
    fn test_parent_matches_when_child_does_not() {
        let router = quote_router();
        let (command, consumed) = router.route(&["quote", "3"]).unwrap();
        assert_eq!(primary_alias(command.as_ref()), "quote");
        assert_eq!(consumed, 1);

        let (command, consumed) = router.route(&["quote"]).unwrap();
        assert_eq!(primary_alias(command.as_ref()), "quote");
        assert_eq!(consumed, 1);
    }

    #[test]
    fn test_secondary_alias_routes_to_same_command() {
        let router = quote_router();
        let (command, consumed) = router.route(&["quote", "ls"]).unwrap();
        assert_eq!(primary_alias(command.as_ref()), "quote list");
        assert_eq!(consumed, 2);
    }

    #[test]
    fn test_no_match_is_none() {
        let router = quote_router();
        assert!(router.route(&["nope", "add"]).is_none());
        assert!(router.route(&[]).is_none());
        // Matching is exact
        assert!(router.route(&["Quote"]).is_none());
    }

    #[test]
    fn test_interior_node_without_command_is_not_a_match() {
        let mut router = Router::new();
        router.add_command(Arc::new(stub(&["emoji count"]))).unwrap();
        assert!(router.route(&["emoji"]).is_none());
        assert!(router.route(&["emoji", "other"]).is_none());
    }

    #[test]
    fn test_enumeration_is_depth_first_registration_order() {
        let router = quote_router();
        assert_eq!(router.aliases(), vec!["quote", "quote add", "quote list", "ping"]);
        assert_eq!(router.len(), 4);
    }

    #[test]
    fn test_identical_alias_is_rejected() {
        let mut router = quote_router();
        let err = router.add_command(Arc::new(stub(&["ping"]))).unwrap_err();
        assert!(matches!(err, RouteError::AliasCollision { ref alias } if alias == "ping"));
    }

    #[test]
    fn test_rejected_command_leaves_table_untouched() {
        let mut router = quote_router();

        // First alias is fine, the second collides
        let err = router.add_command(Arc::new(stub(&["pong", "ping"]))).unwrap_err();
        assert!(matches!(err, RouteError::AliasCollision { ref alias } if alias == "ping"));
        assert!(router.route(&["pong"]).is_none());

        // Parent is fine, a sub-command collides
        let err = router
            .add_command(with_subs(&["fresh"], vec![stub(&["fresh one"]), stub(&["ping"])]))
            .unwrap_err();
        assert!(matches!(err, RouteError::AliasCollision { .. }));
        assert!(router.route(&["fresh"]).is_none());
        assert!(router.route(&["fresh", "one"]).is_none());

        assert_eq!(router.aliases(), vec!["quote", "quote add", "quote list", "ping"]);
        assert_eq!(router.len(), 4);
        let (command, _) = router.route(&["ping"]).unwrap();
        assert_eq!(primary_alias(command.as_ref()), "ping");
    }

    #[test]
    fn test_unrelated_prefix_is_rejected() {
        // A top-level command shadowing a sub-command path
        let mut router = quote_router();
        let err = router.add_command(Arc::new(stub(&["quote search"]))).unwrap_err();
        assert!(matches!(err, RouteError::PrefixConflict { ref other, .. } if other == "quote"));

        // A top-level command that would sit above existing paths
        let mut router = Router::new();
        router.add_command(Arc::new(stub(&["emoji count"]))).unwrap();
        let err = router.add_command(Arc::new(stub(&["emoji"]))).unwrap_err();
        assert!(matches!(err, RouteError::PrefixConflict { ref other, .. } if other == "emoji count"));
    }

    #[test]
    fn test_nested_subcommands_are_related() {
        let mut router = Router::new();
        let grandchild = stub(&["a b c"]);
        let child = Stub {
            subs: vec![Arc::new(grandchild) as Arc<dyn Command>],
            ..stub(&["a b"])
        };
        router.add_command(with_subs(&["a"], vec![child])).unwrap();

        let (command, consumed) = router.route(&["a", "b", "c", "d"]).unwrap();
        assert_eq!(primary_alias(command.as_ref()), "a b c");
        assert_eq!(consumed, 3);
    }

    #[test]
    fn test_invalid_argument_shape_is_rejected() {
        const BROKEN: &[ArgSpec] = &[ArgSpec::strings("words"), ArgSpec::int("n")];
        let mut router = Router::new();
        let err = router
            .add_command(Arc::new(Stub { args: BROKEN, ..stub(&["broken"]) }))
            .unwrap_err();
        assert!(matches!(err, RouteError::InvalidArguments { .. }));
    }

    #[test]
    fn test_empty_alias_is_rejected() {
        let mut router = Router::new();
        let err = router.add_command(Arc::new(stub(&["  "]))).unwrap_err();
        assert!(matches!(err, RouteError::EmptyAlias { .. }));
    }
}
