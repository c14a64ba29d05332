mod common;
use crate::common::builders::WatchConfigBuilder;

use std::path::Path;

use runwatch::watch::{Decision, FilterStage, PathFilter, StageKind};

#[test]
fn default_style_excludes_skip_git_and_tmp() {
    let cfg = WatchConfigBuilder::new()
        .ignore(&[".git/*", "*.tmp"])
        .build();
    let filter = PathFilter::from_config(&cfg);

    assert!(!filter.interested(Path::new("/work/.git/HEAD")));
    assert!(!filter.interested(Path::new("/work/out.tmp")));
    assert!(filter.interested(Path::new("/work/src/main.go")));
}

#[test]
fn nested_tmp_needs_a_segment_aware_pattern() {
    // `*` stays within one path segment, so nested files need their own
    // directory component in the pattern.
    let flat = PathFilter::new("/work").with_stage(FilterStage::exclude("ignore", &["*.tmp"]));
    assert!(flat.interested(Path::new("/work/build/out.tmp")));

    let nested = PathFilter::new("/work")
        .with_stage(FilterStage::exclude("ignore", &[".git/*", "*.tmp", "*/*.tmp"]));
    assert!(!nested.interested(Path::new("/work/.git/HEAD")));
    assert!(!nested.interested(Path::new("/work/build/out.tmp")));
    assert!(nested.interested(Path::new("/work/src/main.go")));
}

#[test]
fn include_globs_keep_only_matching_paths() {
    let cfg = WatchConfigBuilder::new()
        .ignore(&[])
        .include("src/*.go")
        .build();
    let filter = PathFilter::from_config(&cfg);

    assert_eq!(filter.stages().len(), 1);
    assert_eq!(filter.stages()[0].kind(), StageKind::Include);
    assert!(filter.interested(Path::new("/work/src/main.go")));
    assert!(!filter.interested(Path::new("/work/docs/readme.md")));
}

#[test]
fn exclude_vetoes_after_include() {
    let cfg = WatchConfigBuilder::new()
        .include("src/*")
        .ignore(&["src/*_gen.go"])
        .build();
    let filter = PathFilter::from_config(&cfg);

    // Included and not excluded.
    assert!(filter.interested(Path::new("/work/src/main.go")));
    // Included but excluded: exclude wins.
    assert!(!filter.interested(Path::new("/work/src/api_gen.go")));
    // Not included; exclude never gets a say.
    assert!(!filter.interested(Path::new("/work/docs/readme.md")));
}

#[test]
fn ignore_file_and_inline_ignores_are_independent_stages() {
    let cfg = WatchConfigBuilder::new()
        .ignore_file_patterns(&["*.log"])
        .ignore(&["target/*"])
        .build();
    let filter = PathFilter::from_config(&cfg);

    let labels: Vec<&str> = filter.stages().iter().map(|s| s.label()).collect();
    assert_eq!(labels, vec!["ignore-file", "ignore"]);

    assert!(!filter.interested(Path::new("/work/server.log")));
    assert!(!filter.interested(Path::new("/work/target/app")));
    assert!(filter.interested(Path::new("/work/src/lib.rs")));
}

#[test]
fn malformed_exclude_pattern_skips_without_panicking() {
    let cfg = WatchConfigBuilder::new()
        .ignore(&["[unclosed", "*.tmp"])
        .build();
    let filter = PathFilter::from_config(&cfg);

    assert_eq!(
        filter.stages()[0].invalid_patterns().collect::<Vec<_>>(),
        vec!["[unclosed"]
    );
    assert!(!filter.interested(Path::new("/work/src/main.go")));
}

#[test]
fn malformed_pattern_in_one_stage_leaves_other_stage_intact() {
    let good = FilterStage::exclude("ignore", &["*.tmp"]);
    let bad = FilterStage::exclude("ignore-file", &["[x"]);

    assert_eq!(good.decide("src/main.go"), Decision::Keep);
    assert_eq!(bad.decide("src/main.go"), Decision::Skip);
}

#[test]
fn paths_outside_working_directory_are_relative_with_parents() {
    let filter = PathFilter::new("/work/project")
        .with_stage(FilterStage::include("glob", &["../shared/*.proto"]));

    assert!(filter.interested(Path::new("/work/shared/api.proto")));
    assert!(!filter.interested(Path::new("/work/project/api.proto")));
}

#[test]
fn double_star_in_ignore_file_stays_within_one_segment() {
    let cfg = WatchConfigBuilder::new()
        .ignore_file_patterns(&["build/**"])
        .build();
    let filter = PathFilter::from_config(&cfg);

    assert!(!filter.interested(Path::new("/work/build/app.o")));
    assert!(filter.interested(Path::new("/work/build/a/b/c.o")));
}
