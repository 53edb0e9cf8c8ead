//! End-to-end install/update lifecycle tests
//!
//! Exercise the resolve -> download -> extract pipeline against a mock
//! release server, then reference-counted removal on the resulting state.

mod common;

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use suzuri_core::types::{Component, ResolvedArtifacts, UpdatePlan};
use suzuri_core::{archive_file_name, PluginPaths, RemoteSource};
use suzuri_plugins::downloader::ProgressFn;
use suzuri_plugins::{
    auto_add_input_methods, Catalog, DependencyResolver, InstalledStateReader,
    UninstallCoordinator, Updater,
};
use tempfile::TempDir;
use wiremock::MockServer;

use common::{archive_bytes, descriptor_json, mock_file, mock_failing_file};

fn ids(names: &[&str]) -> HashSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn fresh_install_pulls_dependencies_and_writes_descriptors() {
    common::init_tracing();
    let server = MockServer::start().await;

    // array is data-only and depends on chinese-addons, which is native.
    let array_data = archive_bytes(&[
        (
            "plugin/array.json",
            &descriptor_json(None, "1", &["share/array.dict"]),
        ),
        ("share/array.dict", "array table"),
    ]);
    let addons_native = archive_bytes(&[(
        "lib/chinese-addons.so",
        "binary",
    )]);
    let addons_data = archive_bytes(&[
        (
            "plugin/chinese-addons.json",
            &descriptor_json(
                Some("5.0"),
                "1",
                &["lib/chinese-addons.so", "share/addons.conf"],
            ),
        ),
        ("share/addons.conf", "conf"),
    ]);
    mock_file(&server, &archive_file_name("array", Component::Data), array_data).await;
    mock_file(
        &server,
        &archive_file_name("chinese-addons", Component::Native),
        addons_native,
    )
    .await;
    mock_file(
        &server,
        &archive_file_name("chinese-addons", Component::Data),
        addons_data,
    )
    .await;

    let temp = TempDir::new().unwrap();
    let paths = PluginPaths::new(temp.path());
    let state = InstalledStateReader::new(paths.clone());
    let catalog = Catalog::official();

    let requested = ids(&["array"]);
    let artifacts = DependencyResolver::new(&catalog, &state).resolve(&requested);
    assert!(artifacts.data.contains("array"));
    assert!(artifacts.native.contains("chinese-addons"));

    let source = RemoteSource::new(server.uri());
    let updater = Updater::new(source, &artifacts);
    let outcome = updater.run(&paths, None).await.unwrap();

    assert_eq!(outcome.data_results.get("array"), Some(&true));
    assert_eq!(outcome.data_results.get("chinese-addons"), Some(&true));
    assert_eq!(outcome.native_results.get("chinese-addons"), Some(&true));

    assert!(state.is_installed("array"));
    assert!(state.is_installed("chinese-addons"));
    assert!(paths.library_dir().join("share/array.dict").exists());
    assert!(paths.library_dir().join("lib/chinese-addons.so").exists());

    // Consumed archives are gone from the cache.
    assert!(!paths
        .cache_dir()
        .join(archive_file_name("array", Component::Data))
        .exists());
}

#[tokio::test]
async fn one_failed_archive_does_not_block_the_rest_of_the_batch() {
    let server = MockServer::start().await;
    let anthy_data = archive_bytes(&[(
        "plugin/anthy.json",
        &descriptor_json(Some("5.1"), "1", &[]),
    )]);
    mock_file(&server, &archive_file_name("anthy", Component::Data), anthy_data).await;
    mock_failing_file(&server, &archive_file_name("anthy", Component::Native), 500).await;

    let temp = TempDir::new().unwrap();
    let paths = PluginPaths::new(temp.path());
    let state = InstalledStateReader::new(paths.clone());

    let artifacts = ResolvedArtifacts {
        native: ids(&["anthy"]),
        data: ids(&["anthy"]),
    };
    let updater = Updater::new(RemoteSource::new(server.uri()), &artifacts);
    let outcome = updater.run(&paths, None).await.unwrap();

    assert_eq!(outcome.native_results.get("anthy"), Some(&false));
    assert_eq!(outcome.data_results.get("anthy"), Some(&true));
    assert!(!outcome.succeeded("anthy"));
    assert!(state.is_installed("anthy"));
}

#[tokio::test]
async fn update_run_refreshes_only_stale_components() {
    let server = MockServer::start().await;
    let rime_native = archive_bytes(&[("lib/rime.so", "binary v2")]);
    mock_file(
        &server,
        &archive_file_name("rime", Component::Native),
        rime_native,
    )
    .await;

    let temp = TempDir::new().unwrap();
    let paths = PluginPaths::new(temp.path());
    std::fs::create_dir_all(paths.plugin_dir()).unwrap();
    let state = InstalledStateReader::new(paths.clone());
    std::fs::write(
        state.descriptor_path("rime"),
        descriptor_json(Some("1.0"), "a", &["lib/rime.so"]),
    )
    .unwrap();

    // Update mode: driven straight from the stale lists, no dependency
    // expansion.
    let plan = UpdatePlan {
        stale_native: ids(&["rime"]),
        stale_data: HashSet::new(),
    };
    let artifacts = ResolvedArtifacts::from_update_plan(&plan);
    let updater = Updater::new(RemoteSource::new(server.uri()), &artifacts);

    let ticks: Arc<Mutex<Vec<f64>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&ticks);
    let on_progress: ProgressFn = Arc::new(move |ratio| sink.lock().unwrap().push(ratio));
    let outcome = updater.run(&paths, Some(on_progress)).await.unwrap();

    assert_eq!(outcome.native_results.get("rime"), Some(&true));
    assert!(outcome.data_results.is_empty());
    assert_eq!(
        std::fs::read(paths.library_dir().join("lib/rime.so")).unwrap(),
        b"binary v2"
    );
    assert!(!ticks.lock().unwrap().is_empty());

    // The refreshed native component was loaded, so a restart is due.
    assert!(outcome.needs_restart(["rime"]));
}

#[tokio::test]
async fn first_install_collects_input_methods_of_requested_plugins() {
    let server = MockServer::start().await;
    let hangul_native = archive_bytes(&[("lib/hangul.so", "binary")]);
    let hangul_data = archive_bytes(&[(
        "plugin/hangul.json",
        r#"{"version": "1.0", "data_version": "1", "files": ["lib/hangul.so"], "input_methods": ["hangul"]}"#,
    )]);
    mock_file(
        &server,
        &archive_file_name("hangul", Component::Native),
        hangul_native,
    )
    .await;
    mock_file(&server, &archive_file_name("hangul", Component::Data), hangul_data).await;

    let temp = TempDir::new().unwrap();
    let paths = PluginPaths::new(temp.path());
    let state = InstalledStateReader::new(paths.clone());
    let catalog = Catalog::official();

    let requested = ids(&["hangul"]);
    let artifacts = DependencyResolver::new(&catalog, &state).resolve(&requested);
    let updater = Updater::new(RemoteSource::new(server.uri()), &artifacts);
    let outcome = updater.run(&paths, None).await.unwrap();

    assert!(outcome.succeeded("hangul"));
    assert_eq!(
        auto_add_input_methods(&requested, &outcome, &state),
        vec!["hangul"]
    );
}

#[tokio::test]
async fn uninstall_after_install_respects_shared_files() {
    let server = MockServer::start().await;
    let array_data = archive_bytes(&[
        (
            "plugin/array.json",
            &descriptor_json(None, "1", &["share/table.db", "share/array.conf"]),
        ),
        ("share/table.db", "shared table"),
        ("share/array.conf", "array"),
    ]);
    let quick_data = archive_bytes(&[
        (
            "plugin/quick.json",
            &descriptor_json(None, "1", &["share/table.db", "share/quick.conf"]),
        ),
        ("share/table.db", "shared table"),
        ("share/quick.conf", "quick"),
    ]);
    mock_file(&server, &archive_file_name("array", Component::Data), array_data).await;
    mock_file(&server, &archive_file_name("quick", Component::Data), quick_data).await;

    let temp = TempDir::new().unwrap();
    let paths = PluginPaths::new(temp.path());
    let state = InstalledStateReader::new(paths.clone());

    let artifacts = ResolvedArtifacts {
        native: HashSet::new(),
        data: ids(&["array", "quick"]),
    };
    let updater = Updater::new(RemoteSource::new(server.uri()), &artifacts);
    let outcome = updater.run(&paths, None).await.unwrap();
    assert!(outcome.succeeded("array"));
    assert!(outcome.succeeded("quick"));

    UninstallCoordinator::new(&state).uninstall(&ids(&["array"]));

    assert!(!state.is_installed("array"));
    assert!(state.is_installed("quick"));
    assert!(!paths.library_dir().join("share/array.conf").exists());
    assert!(paths.library_dir().join("share/quick.conf").exists());
    assert!(paths.library_dir().join("share/table.db").exists());

    UninstallCoordinator::new(&state).uninstall(&ids(&["quick"]));
    assert!(!paths.library_dir().join("share/table.db").exists());
}
