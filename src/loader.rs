//! File loading and import resolution. Parsing a
//! single file is the parser's job; turning a tree of `import` statements
//! into a closed set of `ast::File`s — resolving relative paths, detecting
//! cycles, and bounding recursion depth — is this module's.
//!
//! `FileResolver` is the seam a host embeds its own source (disk, a
//! bundled archive, a network fetch) through; the default
//! `InMemoryResolver` is a flat mount-table keyed by canonical path,
//! splitting "name a file" (`resolve`) from "fetch its bytes" (`read`)
//! so a disk- or network-backed resolver can implement the same trait.

use crate::ast::File;
use crate::error::{Diagnostics, ParseError, ResolveError};
use crate::parser::Parser;
use std::collections::{HashMap, HashSet};

/// Knows how to turn an import path (as written in source, possibly
/// relative) plus the importing file's own canonical path into the
/// canonical path of the imported file, and how to fetch its source text.
pub trait FileResolver {
    fn resolve(&self, importer: &str, import_path: &str) -> Result<String, ResolveError>;
    fn read(&self, canonical_path: &str) -> Result<String, ResolveError>;
}

/// A flat in-memory mount table: every file is addressed by an exact
/// key, and `import "foo/bar"` resolves to that key directly (no
/// filesystem-relative path math). Good enough for tests and embedders
/// that pre-load all sources; a disk-backed resolver can implement the
/// same trait against real paths.
#[derive(Debug, Default)]
pub struct InMemoryResolver {
    files: HashMap<String, String>,
}

impl InMemoryResolver {
    pub fn new() -> InMemoryResolver {
        InMemoryResolver { files: HashMap::new() }
    }

    pub fn mount(&mut self, canonical_path: &str, source: &str) {
        self.files.insert(canonical_path.to_string(), source.to_string());
    }
}

impl FileResolver for InMemoryResolver {
    fn resolve(&self, _importer: &str, import_path: &str) -> Result<String, ResolveError> {
        if self.files.contains_key(import_path) {
            Ok(import_path.to_string())
        } else {
            Err(ResolveError::NotFound {
                importer: _importer.to_string(),
                import: import_path.to_string(),
                reason: "no file mounted at that path".to_string(),
            })
        }
    }

    fn read(&self, canonical_path: &str) -> Result<String, ResolveError> {
        self.files.get(canonical_path).cloned().ok_or_else(|| ResolveError::NotFound {
            importer: String::new(),
            import: canonical_path.to_string(),
            reason: "no file mounted at that path".to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// On the path from the load root to the current file: seeing it
    /// again means a cycle.
    Loading,
    Loaded,
}

pub const DEFAULT_MAX_IMPORT_DEPTH: usize = 64;

pub struct Loader<R: FileResolver> {
    resolver: R,
    max_depth: usize,
    status: HashMap<String, FileStatus>,
    pub files: HashMap<String, File>,
    pub diagnostics: Diagnostics<ResolveError>,
    pub parse_diagnostics: HashMap<String, Vec<ParseError>>,
}

impl<R: FileResolver> Loader<R> {
    pub fn new(resolver: R) -> Loader<R> {
        Loader {
            resolver,
            max_depth: DEFAULT_MAX_IMPORT_DEPTH,
            status: HashMap::new(),
            files: HashMap::new(),
            diagnostics: Diagnostics::new(),
            parse_diagnostics: HashMap::new(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Load `entry_path` and every file it transitively imports. Returns
    /// the entry file's canonical path; the full set is in `self.files`.
    /// Collects resolve/parse errors rather than aborting on the first.
    pub fn load(&mut self, entry_path: &str) -> String {
        let mut stack = vec![entry_path.to_string()];
        self.load_inner(entry_path, &mut stack, 0);
        entry_path.to_string()
    }

    fn load_inner(&mut self, canonical_path: &str, stack: &mut Vec<String>, depth: usize) {
        tracing::trace!(target: "loader", %canonical_path, depth, "load_inner");
        if depth > self.max_depth {
            tracing::warn!(target: "loader", %canonical_path, max_depth = self.max_depth, "import depth exceeded");
            self.diagnostics.push(ResolveError::DepthExceeded {
                path: canonical_path.to_string(),
                max_depth: self.max_depth,
            });
            return;
        }
        if self.status.get(canonical_path) == Some(&FileStatus::Loaded) {
            return;
        }

        let source = match self.resolver.read(canonical_path) {
            Ok(s) => s,
            Err(e) => {
                tracing::debug!(target: "loader", %canonical_path, error = %e, "resolve read failed");
                self.diagnostics.push(e);
                return;
            }
        };

        let mut parser = match Parser::new(&source) {
            Ok(p) => p,
            Err(e) => {
                self.parse_diagnostics.entry(canonical_path.to_string()).or_default().push(e);
                return;
            }
        };
        let file = parser.parse_file(canonical_path);
        if !parser.diagnostics.is_ok() {
            self.parse_diagnostics.insert(canonical_path.to_string(), parser.diagnostics.errors.clone());
        }

        self.status.insert(canonical_path.to_string(), FileStatus::Loading);

        let imports: Vec<(String, String)> = file
            .imports
            .iter()
            .map(|i| (i.path.clone(), i.alias.clone().unwrap_or_default()))
            .collect();

        self.files.insert(canonical_path.to_string(), file);

        for (import_path, _alias) in imports {
            let resolved = match self.resolver.resolve(canonical_path, &import_path) {
                Ok(p) => p,
                Err(e) => {
                    self.diagnostics.push(e);
                    continue;
                }
            };
            if self.status.get(&resolved) == Some(&FileStatus::Loading) || stack.contains(&resolved) {
                let mut chain: Vec<String> = stack.clone();
                chain.push(resolved.clone());
                tracing::warn!(target: "loader", chain = ?chain, "cyclic import detected");
                self.diagnostics.push(ResolveError::Cycle { chain });
                continue;
            }
            stack.push(resolved.clone());
            self.load_inner(&resolved, stack, depth + 1);
            stack.pop();
        }

        self.status.insert(canonical_path.to_string(), FileStatus::Loaded);
    }

    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_ok() && self.parse_diagnostics.values().all(|v| v.is_empty())
    }

    /// Names of every file reached from `entry_path`, for callers that
    /// want to ensure loading a cycle doesn't silently drop files.
    pub fn loaded_paths(&self) -> HashSet<String> {
        self.files.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_transitive_imports() {
        let mut r = InMemoryResolver::new();
        r.mount("a.sim", r#"import "b.sim"; component A { }"#);
        r.mount("b.sim", r#"component B { }"#);
        let mut loader = Loader::new(r);
        loader.load("a.sim");
        assert!(loader.is_ok(), "{:?} {:?}", loader.diagnostics.errors, loader.parse_diagnostics);
        assert_eq!(loader.files.len(), 2);
    }

    #[test]
    fn detects_import_cycle() {
        let mut r = InMemoryResolver::new();
        r.mount("a.sim", r#"import "b.sim"; component A { }"#);
        r.mount("b.sim", r#"import "a.sim"; component B { }"#);
        let mut loader = Loader::new(r);
        loader.load("a.sim");
        assert!(!loader.diagnostics.is_ok());
        assert!(loader.diagnostics.errors.iter().any(|e| matches!(e, ResolveError::Cycle { .. })));
    }

    #[test]
    fn missing_import_reports_not_found() {
        let mut r = InMemoryResolver::new();
        r.mount("a.sim", r#"import "missing.sim"; component A { }"#);
        let mut loader = Loader::new(r);
        loader.load("a.sim");
        assert!(loader.diagnostics.errors.iter().any(|e| matches!(e, ResolveError::NotFound { .. })));
    }

    #[test]
    fn depth_limit_reports_depth_exceeded() {
        // A self-import under a tiny max_depth should hit the depth guard
        // before the cycle guard ever gets a chance to run.
        let mut r = InMemoryResolver::new();
        r.mount("a.sim", r#"import "a.sim"; component A { }"#);
        let mut loader = Loader::new(r).with_max_depth(0);
        loader.load("a.sim");
        assert!(!loader.diagnostics.is_ok());
    }

    #[test]
    fn diamond_import_loads_shared_dependency_once() {
        let mut r = InMemoryResolver::new();
        r.mount("a.sim", r#"import "b.sim"; import "c.sim"; component A { }"#);
        r.mount("b.sim", r#"import "d.sim"; component B { }"#);
        r.mount("c.sim", r#"import "d.sim"; component C { }"#);
        r.mount("d.sim", r#"component D { }"#);
        let mut loader = Loader::new(r);
        loader.load("a.sim");
        assert!(loader.is_ok(), "{:?}", loader.diagnostics.errors);
        assert_eq!(loader.files.len(), 4);
    }
}
