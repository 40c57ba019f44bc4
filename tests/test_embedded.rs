//! Resolution tests against the embedded (bundled asset) backend.
//!
//! The same fixture tree as the filesystem tests, compiled into the test
//! binary, so both backends can be held to identical resolution outcomes.

use std::sync::Arc;

use include_dir::{Dir, include_dir};

use alcove::config::ResolutionConfig;
use alcove::resolve::backend::ResourceBackend;
use alcove::resolve::{
    EmbeddedBackend, FilesystemBackend, ResolutionResult, ResourceResolver,
};

static FIXTURES: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/tests/data");

fn embedded_resolver(config: ResolutionConfig) -> ResourceResolver {
    let backend = EmbeddedBackend::new(&FIXTURES, "").unwrap();
    ResourceResolver::new(Arc::new(backend), config)
}

fn found_path(result: &ResolutionResult) -> &str {
    match result {
        ResolutionResult::Found(descriptor) => &descriptor.path,
        ResolutionResult::NotFound => panic!("expected a resolved resource"),
    }
}

#[test]
fn direct_file_lookup() {
    let resolver = embedded_resolver(ResolutionConfig::default());

    match resolver.resolve("/testfile.json") {
        ResolutionResult::Found(descriptor) => {
            assert!(!descriptor.is_directory);
            assert_eq!(descriptor.content_length, Some(11));
        }
        ResolutionResult::NotFound => panic!("expected a resolved resource"),
    }
}

#[test]
fn extension_fallback_for_dotless_path() {
    let config = ResolutionConfig::default().with_supported_file_extensions([".json"]);
    let resolver = embedded_resolver(config);

    let result = resolver.resolve("/testfile");
    assert_eq!(found_path(&result), "/testfile.json");
}

#[test]
fn directory_resolves_identically_with_and_without_slash() {
    let config = ResolutionConfig::default().with_welcome_files(["index.json"]);
    let resolver = embedded_resolver(config);

    let without_slash = resolver.resolve("/mypath");
    let with_slash = resolver.resolve("/mypath/");
    assert_eq!(found_path(&without_slash), "/mypath/index.json");
    assert_eq!(without_slash, with_slash);
}

#[test]
fn ancestor_fallback_walks_up_to_a_welcome_file() {
    let config =
        ResolutionConfig::default().with_welcome_files(["index.html", "index.htm", "index.json"]);
    let resolver = embedded_resolver(config);

    let result = resolver.resolve("/mypath/subpath/addition");
    assert_eq!(found_path(&result), "/mypath/index.json");
}

#[test]
fn ancestor_fallback_respects_the_disable_flag() {
    let config = ResolutionConfig::default()
        .with_welcome_files(["my.json"])
        .with_resolve_parent_resource_if_not_found(false);
    let resolver = embedded_resolver(config);

    assert_eq!(
        resolver.resolve("/mypath/subpath/addition"),
        ResolutionResult::NotFound
    );
}

#[test]
fn prefix_narrows_the_served_tree() {
    let backend = EmbeddedBackend::new(&FIXTURES, "mypath").unwrap();
    let resolver =
        ResourceResolver::new(Arc::new(backend), ResolutionConfig::default());

    match resolver.resolve("/index.json") {
        ResolutionResult::Found(descriptor) => assert!(!descriptor.is_directory),
        ResolutionResult::NotFound => panic!("expected index.json under the prefix"),
    }
    // testfile.json lives outside the prefix.
    assert_eq!(resolver.resolve("/testfile.json"), ResolutionResult::NotFound);
}

#[test]
fn unknown_prefix_is_fatal_at_construction() {
    assert!(EmbeddedBackend::new(&FIXTURES, "no/such/prefix").is_err());
}

#[test]
fn listing_enumerates_bundle_entries() {
    let backend = EmbeddedBackend::new(&FIXTURES, "").unwrap();
    let listing = backend.list("/mypath").unwrap();

    let names: Vec<&str> = listing.iter().map(|entry| entry.name.as_str()).collect();
    assert_eq!(names, vec!["index.json", "subpath"]);
    assert!(listing[1].is_directory);
}

#[test]
fn both_backends_resolve_the_fixture_tree_identically() {
    let config = ResolutionConfig::default()
        .with_welcome_files(["index.json", "my.json"])
        .with_supported_file_extensions(["json"]);

    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data");
    let on_disk = ResourceResolver::new(
        Arc::new(FilesystemBackend::new(root).unwrap()),
        config.clone(),
    );
    let bundled = embedded_resolver(config);

    for path in [
        "/testfile.json",
        "/testfile",
        "/mypath",
        "/mypath/",
        "/mypath/subpath/addition",
        "/nonexistent",
    ] {
        let disk = on_disk.resolve(path);
        let embedded = bundled.resolve(path);
        match (&disk, &embedded) {
            (ResolutionResult::Found(a), ResolutionResult::Found(b)) => {
                assert_eq!(a.path, b.path, "path {path}");
                assert_eq!(a.is_directory, b.is_directory, "path {path}");
            }
            (ResolutionResult::NotFound, ResolutionResult::NotFound) => {}
            _ => panic!("backends disagree on {path}: {disk:?} vs {embedded:?}"),
        }
    }
}
