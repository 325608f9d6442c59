//! CastSystem facade operations.
//!
//! These tests verify:
//! - the builder rejects missing collaborators
//! - preferences and playlist edits are persisted on every change
//! - persisted devices are restored offline and resume on discovery
//! - action execution reports unknown, offline and failing devices
//! - media root configuration and local file listing


use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;

use dlnacast::{
    CastConfig, CastError, CastSystem, DeviceConfig, DeviceDescriptor, DeviceId, DeviceSearch,
    DiscoveryEvent, MemoryStore, PlayItem,
};
use mockall::mock;
use tempfile::TempDir;
use test_helpers::*;

mock! {
    pub Search {}

    impl DeviceSearch for Search {
        fn search(&self) -> dlnacast::Result<()>;
    }
}

fn args(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_builder_requires_dispatcher_and_subscriptions() {
    let result = CastSystem::builder().build();
    assert!(matches!(result, Err(CastError::InvalidArgument(_))));

    let result = CastSystem::builder()
        .with_dispatcher(RecordingDispatcher::new())
        .build();
    assert!(matches!(result, Err(CastError::InvalidArgument(_))));
}

#[tokio::test]
async fn test_wildcard_host_is_replaced() {
    let h = harness(CastConfig {
        host: "0.0.0.0".to_string(),
        ..CastConfig::default()
    });
    assert_eq!(h.system.settings().host, "127.0.0.1");
}

#[tokio::test]
async fn test_discovery_lists_sessions_by_id() {
    let h = harness(CastConfig::default());
    h.system.handle_discovery(DiscoveryEvent::Added(renderer("uuid:bbb", "Bedroom")));
    h.system.handle_discovery(DiscoveryEvent::Added(renderer("uuid:aaa", "Attic")));

    let sessions = h.system.sessions();
    let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["aaa", "bbb"]);
    assert_eq!(sessions[0].name.as_deref(), Some("Attic"));
    assert_eq!(sessions[0].model_name.as_deref(), Some("Test Renderer"));
    assert!(sessions[0].online);
    assert!(!sessions[0].tracked);
    assert!(sessions[0].auto_play);
    assert_eq!(h.store.current().devices.len(), 2);
}

#[tokio::test]
async fn test_non_renderer_is_ignored() {
    let h = harness(CastConfig::default());
    h.system.handle_discovery(DiscoveryEvent::Added(DeviceDescriptor::new(
        "uuid:nas",
        "urn:schemas-upnp-org:device:MediaServer:1",
        "NAS",
    )));

    assert!(h.system.sessions().is_empty());
    assert_eq!(h.store.save_count(), 0);
}

#[tokio::test]
async fn test_persisted_devices_are_restored_and_resume() {
    let mut config = CastConfig::default();
    config.devices.push(DeviceConfig {
        id: tv_id(),
        tracked: true,
        auto_play: false,
        name: Some("Kitchen".to_string()),
    });
    let h = harness(config);

    let restored = &h.system.sessions()[0];
    assert_eq!(restored.name.as_deref(), Some("Kitchen"));
    assert!(restored.tracked);
    assert!(!restored.auto_play);
    assert!(!restored.online);

    h.system
        .handle_discovery(DiscoveryEvent::Added(renderer(TV_UDN, "Living Room")));
    settle().await;

    assert_eq!(h.subscriptions.request_count(), 1);
    let tv = h.system.session(&tv_id()).unwrap();
    assert!(tv.subscription().is_some());
    assert_eq!(tv.snapshot().name.as_deref(), Some("Kitchen"));
}

#[tokio::test]
async fn test_preferences_are_persisted() {
    let h = harness(CastConfig::default());
    h.system
        .handle_discovery(DiscoveryEvent::Added(renderer(TV_UDN, "Living Room")));

    h.system.set_auto_play(&tv_id(), false).unwrap();
    h.system
        .set_display_name(&tv_id(), Some("Den".to_string()))
        .unwrap();

    let saved = &h.store.current().devices[0];
    assert_eq!(saved.id, tv_id());
    assert!(!saved.auto_play);
    assert_eq!(saved.name.as_deref(), Some("Den"));

    h.system
        .set_display_name(&tv_id(), Some("   ".to_string()))
        .unwrap();
    assert_eq!(h.store.current().devices[0].name, None);
    assert_eq!(
        h.system.sessions()[0].name.as_deref(),
        Some("Living Room")
    );
}

#[tokio::test]
async fn test_preferences_of_unknown_device() {
    let h = harness(CastConfig::default());
    let ghost = DeviceId::new("uuid:ghost");

    assert!(matches!(
        h.system.set_auto_play(&ghost, true),
        Err(CastError::DeviceNotFound(_))
    ));
    assert!(matches!(
        h.system.start_tracking(&ghost).await,
        Err(CastError::DeviceNotFound(_))
    ));
}

#[tokio::test]
async fn test_playlist_edits_are_persisted() {
    let h = harness(config_with_playlist(vec![
        PlayItem::url("a.mp4"),
        PlayItem::url("b.mp4"),
    ]));

    h.system
        .add(PlayItem::new("slides/c.jpg", Some(8)).unwrap())
        .unwrap();
    h.system.move_earlier(0).unwrap();
    assert_eq!(
        urls(&h.system.playlist()),
        vec!["b.mp4", "slides/c.jpg", "a.mp4"]
    );

    h.system.move_later(2).unwrap();
    h.system
        .update(1, PlayItem::url("http://cdn.test/b.mp4"))
        .unwrap();
    let removed = h.system.remove(2).unwrap();
    assert_eq!(removed.duration, Some(8));

    assert_eq!(
        urls(&h.store.current().playlist),
        vec!["a.mp4", "http://cdn.test/b.mp4"]
    );
    assert_eq!(h.store.save_count(), 5);
}

#[tokio::test]
async fn test_playlist_edit_out_of_range() {
    let h = harness(config_with_playlist(vec![PlayItem::url("a.mp4")]));

    match h.system.update(3, PlayItem::url("b.mp4")) {
        Err(CastError::IndexOutOfRange { index, len }) => {
            assert_eq!((index, len), (3, 1));
        }
        other => panic!("Expected IndexOutOfRange, got {:?}", other),
    }
    assert!(h.system.remove(1).is_err());
    assert!(h.system.move_later(1).is_err());
    assert_eq!(h.store.save_count(), 0);
}

#[tokio::test]
async fn test_exec_action_errors() {
    let h = harness(CastConfig::default());
    let ghost = DeviceId::new("uuid:ghost");
    let instance = args(&[("InstanceID", "0")]);

    assert!(matches!(
        h.system.exec_action(&ghost, "Stop", &instance).await,
        Err(CastError::DeviceNotFound(_))
    ));

    h.system
        .handle_discovery(DiscoveryEvent::Added(renderer(TV_UDN, "Living Room")));
    assert!(matches!(
        h.system.exec_action(&tv_id(), "Eject", &instance).await,
        Err(CastError::InvalidArgument(_))
    ));
    assert!(matches!(
        h.system.exec_action(&tv_id(), "Play", &instance).await,
        Err(CastError::InvalidArgument(_))
    ));

    h.dispatcher.fail_on("Stop");
    match h.system.exec_action(&tv_id(), "Stop", &instance).await {
        Err(CastError::ActionFailed(detail)) => assert!(detail.contains("Stop")),
        other => panic!("Expected ActionFailed, got {:?}", other),
    }

    h.system.handle_discovery(DiscoveryEvent::Removed(tv_id()));
    assert!(matches!(
        h.system.exec_action(&tv_id(), "Stop", &instance).await,
        Err(CastError::DeviceOffline(_))
    ));
    assert!(matches!(
        h.system.actions(&tv_id()),
        Err(CastError::DeviceOffline(_))
    ));
}

#[tokio::test]
async fn test_exec_action_returns_outputs() {
    let h = harness(CastConfig::default());
    h.system
        .handle_discovery(DiscoveryEvent::Added(renderer(TV_UDN, "Living Room")));

    let outputs = h
        .system
        .exec_action(
            &tv_id(),
            "GetTransportInfo",
            &args(&[("InstanceID", "0"), ("Unused", "x")]),
        )
        .await
        .unwrap();

    assert_eq!(outputs["CurrentTransportState"], "STOPPED");
    let call = &h.dispatcher.calls()[0];
    assert_eq!(call.arguments, vec![("InstanceID".to_string(), "0".to_string())]);
}

#[tokio::test]
async fn test_actions_are_sorted_by_name() {
    let h = harness(CastConfig::default());
    h.system
        .handle_discovery(DiscoveryEvent::Added(renderer(TV_UDN, "Living Room")));

    let names: Vec<String> = h
        .system
        .actions(&tv_id())
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(
        names,
        vec!["GetTransportInfo", "Pause", "Play", "SetAVTransportURI", "Stop"]
    );
}

#[tokio::test]
async fn test_play_once_resolves_relative_urls() {
    let h = harness(CastConfig::default());
    h.system
        .handle_discovery(DiscoveryEvent::Added(renderer(TV_UDN, "Living Room")));

    h.system.play_once(&tv_id(), " clips/x.mp4 ").await.unwrap();

    assert_eq!(
        h.dispatcher.calls()[0].argument("CurrentURI"),
        Some("http://127.0.0.1:8686/static/clips/x.mp4")
    );
    assert!(matches!(
        h.system.play_once(&tv_id(), "").await,
        Err(CastError::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn test_media_root_listing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.mp4"), b"a").unwrap();
    fs::write(dir.path().join(".DS_Store"), b"x").unwrap();
    fs::create_dir(dir.path().join("slides")).unwrap();
    fs::write(dir.path().join("slides").join("b.jpg"), b"b").unwrap();

    let h = harness(config_with_playlist(vec![PlayItem::url("a.mp4")]));
    h.system
        .configure_media_root(" 192.168.1.20 ", dir.path())
        .unwrap();

    let settings = h.system.settings();
    assert_eq!(settings.host, "192.168.1.20");
    assert_eq!(settings.media_root, dir.path());
    assert_eq!(h.store.current().host, "192.168.1.20");
    assert_eq!(urls(&h.system.unlisted_local_files()), vec!["slides/b.jpg"]);
}

#[tokio::test]
async fn test_media_root_validation() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("not-a-dir.txt");
    fs::write(&file, b"x").unwrap();
    let h = harness(CastConfig::default());

    assert!(matches!(
        h.system.configure_media_root("", dir.path()),
        Err(CastError::InvalidArgument(_))
    ));
    assert!(matches!(
        h.system.configure_media_root("10.0.0.2", &file),
        Err(CastError::InvalidArgument(_))
    ));
    assert_eq!(h.system.settings().host, "127.0.0.1");
}

#[tokio::test]
async fn test_scan_uses_configured_search() {
    let mut search = MockSearch::new();
    search.expect_search().times(1).returning(|| Ok(()));

    let system = CastSystem::builder()
        .with_dispatcher(RecordingDispatcher::new())
        .with_subscriptions(ScriptedSubscriptions::new(SubscribeMode::Establish))
        .with_persistence(Arc::new(MemoryStore::default()))
        .with_search(Arc::new(search))
        .build()
        .unwrap();

    system.scan().unwrap();
}

#[tokio::test]
async fn test_scan_without_search() {
    let h = harness(CastConfig::default());
    assert!(matches!(h.system.scan(), Err(CastError::InvalidArgument(_))));
}

fn urls(items: &[PlayItem]) -> Vec<&str> {
    items.iter().map(|item| item.url.as_str()).collect()
}
