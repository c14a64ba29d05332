// src/watch/patterns.rs

use std::fmt;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use tracing::{debug, warn};

use crate::config::model::WatchConfig;
use crate::watch::path_utils::relative_str;

/// What a filter stage does with matching paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// Keep only paths matching at least one pattern.
    Include,
    /// Skip paths matching any pattern.
    Exclude,
}

/// Verdict of a single stage for a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Keep,
    Skip,
}

/// A pattern after compilation. Invalid patterns are kept in place so that
/// evaluation order stays the same as the order the user wrote them in.
#[derive(Clone)]
enum CompiledPattern {
    Valid { source: String, matcher: GlobMatcher },
    Invalid { source: String },
}

/// Rewrite a shell glob so `globset` reads it with plain shell semantics:
/// a run of `*` is one `*` (no recursive `**`) and braces are literal (no
/// `{a,b}` alternation). Escapes and character classes pass through.
fn single_segment_syntax(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 4);
    let mut chars = pattern.chars().peekable();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '[' if !in_class => {
                in_class = true;
                out.push(c);
            }
            ']' if in_class => {
                in_class = false;
                out.push(c);
            }
            '*' if !in_class => {
                out.push('*');
                while chars.next_if_eq(&'*').is_some() {}
            }
            '{' | '}' if !in_class => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    out
}

impl CompiledPattern {
    fn compile(pattern: &str) -> Self {
        // `*` and `?` must not cross `/`, mirroring shell globbing on a
        // single path.
        let built = GlobBuilder::new(&single_segment_syntax(pattern))
            .literal_separator(true)
            .backslash_escape(true)
            .build();

        match built {
            Ok(glob) => CompiledPattern::Valid {
                source: pattern.to_string(),
                matcher: glob.compile_matcher(),
            },
            Err(err) => {
                warn!(pattern, error = %err, "invalid glob pattern; matching events will be skipped");
                CompiledPattern::Invalid {
                    source: pattern.to_string(),
                }
            }
        }
    }

    fn source(&self) -> &str {
        match self {
            CompiledPattern::Valid { source, .. } | CompiledPattern::Invalid { source } => source,
        }
    }
}

/// One ordered list of glob patterns applied as a single filter step.
#[derive(Clone)]
pub struct FilterStage {
    label: String,
    kind: StageKind,
    patterns: Vec<CompiledPattern>,
}

impl fmt::Debug for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let patterns: Vec<&str> = self.patterns.iter().map(|p| p.source()).collect();
        f.debug_struct("FilterStage")
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("patterns", &patterns)
            .finish()
    }
}

impl FilterStage {
    pub fn new<S: AsRef<str>>(label: impl Into<String>, kind: StageKind, patterns: &[S]) -> Self {
        Self {
            label: label.into(),
            kind,
            patterns: patterns
                .iter()
                .map(|p| CompiledPattern::compile(p.as_ref()))
                .collect(),
        }
    }

    pub fn include<S: AsRef<str>>(label: impl Into<String>, patterns: &[S]) -> Self {
        Self::new(label, StageKind::Include, patterns)
    }

    pub fn exclude<S: AsRef<str>>(label: impl Into<String>, patterns: &[S]) -> Self {
        Self::new(label, StageKind::Exclude, patterns)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    /// Patterns that failed to compile.
    pub fn invalid_patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().filter_map(|p| match p {
            CompiledPattern::Invalid { source } => Some(source.as_str()),
            CompiledPattern::Valid { .. } => None,
        })
    }

    /// Decide whether `rel_path` (relative to the base directory, forward
    /// slashes) survives this stage.
    ///
    /// Patterns are tried in order. The first match decides; reaching an
    /// invalid pattern before any match skips the path.
    pub fn decide(&self, rel_path: &str) -> Decision {
        for pattern in &self.patterns {
            match pattern {
                CompiledPattern::Invalid { .. } => return Decision::Skip,
                CompiledPattern::Valid { matcher, .. } => {
                    if matcher.is_match(rel_path) {
                        return match self.kind {
                            StageKind::Include => Decision::Keep,
                            StageKind::Exclude => Decision::Skip,
                        };
                    }
                }
            }
        }

        match self.kind {
            StageKind::Include => Decision::Skip,
            StageKind::Exclude => Decision::Keep,
        }
    }
}

/// Ordered chain of filter stages evaluated against paths relative to a
/// fixed base directory.
///
/// A path is interesting only if every stage keeps it. Include stages are
/// installed first, so exclude stages act as a veto on top of them.
#[derive(Debug, Clone)]
pub struct PathFilter {
    base: PathBuf,
    stages: Vec<FilterStage>,
}

impl PathFilter {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            stages: Vec::new(),
        }
    }

    pub fn with_stage(mut self, stage: FilterStage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Build the filter chain for a resolved configuration:
    /// include globs (if any), ignore-file patterns (if a file was given),
    /// then the inline ignore patterns.
    pub fn from_config(cfg: &WatchConfig) -> Self {
        let mut filter = PathFilter::new(&cfg.base_dir);

        if !cfg.include.is_empty() {
            filter = filter.with_stage(FilterStage::include("glob", &cfg.include));
        }
        if let Some(patterns) = &cfg.ignore_file_patterns {
            filter = filter.with_stage(FilterStage::exclude("ignore-file", patterns));
        }
        if !cfg.ignore.is_empty() {
            filter = filter.with_stage(FilterStage::exclude("ignore", &cfg.ignore));
        }

        filter
    }

    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    /// Whether an event for `path` should trigger a run.
    pub fn interested(&self, path: &Path) -> bool {
        let rel = match relative_str(&self.base, path) {
            Some(rel) => rel,
            None => path.to_string_lossy().replace('\\', "/"),
        };
        self.interested_rel(&rel)
    }

    /// Same as [`PathFilter::interested`] for an already-relative path.
    pub fn interested_rel(&self, rel_path: &str) -> bool {
        for stage in &self.stages {
            if stage.decide(rel_path) == Decision::Skip {
                debug!(path = rel_path, stage = stage.label(), "path filtered out");
                return false;
            }
        }
        true
    }
}
