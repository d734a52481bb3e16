//! Integration tests for content root resolution and catalog indexing
//! against real directory trees.

use std::fs;
use std::path::Path;

use feature_kit_mcp::catalog::{
    load_features, resolve_root, ContentLayout, FeatureStore, FsProbe, ResolveInputs, RootSource,
    FEATURES_SUBPATH,
};

fn make_feature(features: &Path, slug: &str, files: &[&str]) {
    let dir = features.join(slug);
    fs::create_dir_all(&dir).unwrap();
    for file in files {
        let path = dir.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "// content").unwrap();
    }
}

// =============================================================================
// Root Resolution
// =============================================================================

#[test]
fn local_checkout_is_found_from_install_dir() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join(FEATURES_SUBPATH)).unwrap();
    let install_dir = root.join("mcp-server/dist");
    fs::create_dir_all(&install_dir).unwrap();

    let resolution = resolve_root(
        &ResolveInputs {
            install_dir,
            env_override: None,
        },
        &FsProbe,
    );

    assert_eq!(resolution.source, RootSource::LocalDev);
    assert_eq!(resolution.root, root);
}

#[test]
fn existing_override_is_used_when_no_local_checkout() {
    let install = tempfile::tempdir().unwrap();
    let content = tempfile::tempdir().unwrap();

    let resolution = resolve_root(
        &ResolveInputs {
            install_dir: install.path().join("a/b"),
            env_override: Some(content.path().to_path_buf()),
        },
        &FsProbe,
    );

    assert_eq!(resolution.source, RootSource::Environment);
    assert_eq!(resolution.root, content.path());
}

#[test]
fn missing_override_falls_through_to_ancestor_search() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join(FEATURES_SUBPATH)).unwrap();
    let install_dir = root.join("x/y/z/w");
    fs::create_dir_all(&install_dir).unwrap();

    let resolution = resolve_root(
        &ResolveInputs {
            install_dir,
            env_override: Some(root.join("does-not-exist")),
        },
        &FsProbe,
    );

    assert_eq!(resolution.source, RootSource::Ancestor(1));
    assert_eq!(resolution.root, root);
    assert!(resolution.is_verified());
}

#[test]
fn unresolved_root_falls_back_to_local_candidate() {
    let dir = tempfile::tempdir().unwrap();
    let install_dir = dir.path().join("p/q");

    let resolution = resolve_root(
        &ResolveInputs {
            install_dir,
            env_override: None,
        },
        &FsProbe,
    );

    assert_eq!(resolution.source, RootSource::Unverified);
    assert_eq!(resolution.root, dir.path());
    assert!(!resolution.is_verified());
}

// =============================================================================
// Indexing
// =============================================================================

#[test]
fn indexes_feature_tree() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ContentLayout::new(dir.path());
    let features = layout.features_dir();
    make_feature(
        &features,
        "auto-save-form",
        &[
            "config.md",
            "prompt.txt",
            "types.ts",
            "components/AutoSaveForm.tsx",
            "components/README.md",
            "hooks/useAutoSave.ts",
        ],
    );
    make_feature(&features, "quiz-statistics", &["components/Chart.tsx"]);
    fs::write(features.join("NOTES.md"), "not a feature").unwrap();

    let registry = tokio_test::block_on(load_features(&features));

    assert_eq!(registry.len(), 2);
    let form = registry.get("auto-save-form").unwrap();
    assert_eq!(form.name, "Auto Save Form");
    assert!(form.has_config && form.has_prompt && form.has_types);
    assert_eq!(form.component_files, vec!["AutoSaveForm.tsx".to_string()]);
    assert!(form.has_hooks());
    assert!(!form.has_adapters());
    assert!(form.degraded.is_empty());

    let quiz = registry.get("quiz-statistics").unwrap();
    assert!(!quiz.has_config);
    assert!(quiz.hook_files.is_empty());
    assert!(registry.get("NOTES.md").is_none());
}

#[test]
fn missing_features_dir_is_empty_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let registry = tokio_test::block_on(load_features(&dir.path().join("nope")));
    assert!(registry.is_empty());
}

#[tokio::test]
async fn store_indexes_once() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ContentLayout::new(dir.path());
    make_feature(&layout.features_dir(), "badge", &["components/Badge.tsx"]);

    let store = FeatureStore::new(layout.clone());
    assert!(!store.is_loaded());
    assert_eq!(store.ensure_loaded().await.len(), 1);

    // Later additions are not picked up within the same process.
    make_feature(&layout.features_dir(), "late", &["components/Late.tsx"]);
    assert_eq!(store.ensure_loaded().await.len(), 1);
    assert!(store.ensure_loaded().await.get("late").is_none());
}
