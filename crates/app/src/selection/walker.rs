//! Depth-first walk over the variable tree of one root content.
//!
//! Every variable gets a dotted path. Function-tagged variables are
//! *candidates* for matching; untagged leaves are *context values* the caller
//! has to supply alongside. Untagged interior variables are structure only.

use devmeta_domain::device_type::{Content, ContentVariable};

/// A variable reached by the walk, with its computed path.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkedVariable<'a> {
    pub path: String,
    pub variable: &'a ContentVariable,
}

/// The classified variables of one root content, in tree order.
#[derive(Debug, Default, PartialEq)]
pub struct ContentWalk<'a> {
    pub candidates: Vec<WalkedVariable<'a>>,
    pub context_values: Vec<WalkedVariable<'a>>,
}

/// Walk `content`, prefixing every path with `path_prefix`.
#[must_use]
pub fn walk_content<'a>(content: &'a Content, path_prefix: &str) -> ContentWalk<'a> {
    let mut walk = ContentWalk::default();
    visit(&content.content_variable, path_prefix, &mut walk);
    walk
}

fn visit<'a>(variable: &'a ContentVariable, parent_path: &str, walk: &mut ContentWalk<'a>) {
    let path = join_path(parent_path, variable);
    if variable.function().is_some() {
        walk.candidates.push(WalkedVariable {
            path: path.clone(),
            variable,
        });
    } else if variable.is_leaf() {
        walk.context_values.push(WalkedVariable {
            path: path.clone(),
            variable,
        });
    }
    for sub in &variable.sub_content_variables {
        visit(sub, &path, walk);
    }
}

/// Append the segment of `variable` to `parent`.
///
/// Segments are variable names, not ids: names are what payloads address.
/// Void variables contribute an empty segment and always leave a trailing
/// separator, even under an empty parent.
#[must_use]
pub fn join_path(parent: &str, variable: &ContentVariable) -> String {
    if variable.is_void {
        return format!("{parent}.");
    }
    if parent.is_empty() {
        variable.name.clone()
    } else {
        format!("{parent}.{}", variable.name)
    }
}
