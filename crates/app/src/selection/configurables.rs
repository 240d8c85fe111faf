//! Companion values attached to every matched path.
//!
//! A match lists every context value of its service (tree order, inputs
//! first) followed by the other matches that share its scope.

use devmeta_domain::selectable::Configurable;

/// How far sibling matches reach when collecting configurables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigurableScope {
    /// Only matches inside the same root input/output content.
    #[default]
    SameContent,
    /// Every match of the same service.
    SameService,
}

impl ConfigurableScope {
    /// Whether a match in root content `other` is a sibling of one in `root`.
    #[must_use]
    pub fn includes(self, root: usize, other: usize) -> bool {
        match self {
            Self::SameContent => root == other,
            Self::SameService => true,
        }
    }
}

/// A match of one service, positioned by the index of its root content.
#[derive(Debug, Clone)]
pub struct ScopedMatch {
    pub root: usize,
    pub configurable: Configurable,
}

/// Configurables of `matches[index]`: all `context` values, then every other
/// match in scope. The match itself is never listed.
#[must_use]
pub fn collect_configurables(
    index: usize,
    matches: &[ScopedMatch],
    context: &[Configurable],
    scope: ConfigurableScope,
) -> Vec<Configurable> {
    let root = matches[index].root;
    context
        .iter()
        .cloned()
        .chain(
            matches
                .iter()
                .enumerate()
                .filter(|(other, m)| *other != index && scope.includes(root, m.root))
                .map(|(_, m)| m.configurable.clone()),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use devmeta_domain::aspect::AspectNode;

    fn configurable(path: &str) -> Configurable {
        Configurable {
            path: path.to_string(),
            characteristic_id: None,
            aspect_node: AspectNode::default(),
            function_id: None,
            value: None,
            variable_type: None,
        }
    }

    fn matched(root: usize, path: &str) -> ScopedMatch {
        ScopedMatch {
            root,
            configurable: configurable(path),
        }
    }

    fn paths(configurables: &[Configurable]) -> Vec<&str> {
        configurables.iter().map(|c| c.path.as_str()).collect()
    }

    #[test]
    fn should_list_context_first_then_siblings_without_self() {
        let matches = [matched(0, "speed.a"), matched(0, "speed.b"), matched(1, "other")];
        let context = [configurable("unit")];

        let result = collect_configurables(0, &matches, &context, ConfigurableScope::SameContent);
        assert_eq!(paths(&result), ["unit", "speed.b"]);

        let result = collect_configurables(1, &matches, &context, ConfigurableScope::SameContent);
        assert_eq!(paths(&result), ["unit", "speed.a"]);
    }

    #[test]
    fn should_include_other_contents_when_scope_is_service() {
        let matches = [matched(0, "speed.a"), matched(0, "speed.b"), matched(1, "other")];

        let result = collect_configurables(0, &matches, &[], ConfigurableScope::SameService);
        assert_eq!(paths(&result), ["speed.b", "other"]);
    }

    #[test]
    fn should_return_only_context_for_lone_match() {
        let matches = [matched(2, "level")];
        let context = [configurable("duration")];

        let result = collect_configurables(0, &matches, &context, ConfigurableScope::SameContent);
        assert_eq!(paths(&result), ["duration"]);
    }
}
