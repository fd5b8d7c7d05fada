use std::borrow::Cow;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::{Fragment, sql};
use crate::value::Arg;

static PROJECT_ROOT: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Nearest ancestor of the working directory containing a `Cargo.toml`.
///
/// Computed once per process; the first result, success or failure, sticks.
fn project_root() -> Option<&'static Path> {
    PROJECT_ROOT
        .get_or_init(|| {
            let mut dir = std::env::current_dir().ok()?;
            loop {
                if dir.join("Cargo.toml").is_file() {
                    return Some(dir);
                }
                if !dir.pop() {
                    return None;
                }
            }
        })
        .as_deref()
}

fn relative_to_root(file: &str) -> Option<Cow<'_, str>> {
    let root = project_root()?;
    let path = Path::new(file);
    if path.is_relative() {
        // rustc emits workspace-relative paths for local crates already.
        return Some(Cow::Borrowed(file));
    }
    let rel = path.strip_prefix(root).ok()?;
    Some(Cow::Owned(rel.to_string_lossy().into_owned()))
}

fn indent(v: &str) -> String {
    let mut out = String::with_capacity(v.len() + 8);
    out.push_str("\n\t");
    for (n, line) in v.trim().split('\n').enumerate() {
        if n > 0 {
            out.push_str("\n\t");
        }
        out.push_str(line);
    }
    out.push('\n');
    out
}

/// Like [`sql`], with the statement annotated by the caller's source
/// location and nested multi-line fragments re-indented for readability.
///
/// The annotation is an SQL comment and never changes query semantics; the
/// output is meant for humans reading query logs. When the project root
/// cannot be determined the comment is omitted and this behaves exactly like
/// [`sql`].
#[track_caller]
pub fn debug_sql(stmt: impl Into<String>, args: Vec<Arg>) -> Fragment {
    let caller = Location::caller();

    let args = args
        .into_iter()
        .map(|arg| match arg {
            Arg::Fragment(sub) if sub.statement().contains('\n') => {
                let statement = indent(sub.statement());
                Arg::Fragment(Fragment::from_parts(statement, sub.into_args()))
            }
            arg => arg,
        })
        .collect();

    match relative_to_root(caller.file()) {
        Some(path) => sql(
            format!("\n/* {}:{} */ {}", path, caller.line(), stmt.into()),
            args,
        ),
        None => sql(stmt, args),
    }
}
