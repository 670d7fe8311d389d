//! Concurrent access to the shared settings store

use std::net::IpAddr;
use std::sync::Arc;
use std::thread;

use media_app_settings::{access, EncoderRung, SettingsStore};

const SPECS: [&str; 3] = ["10.0.0.0/8", "192.168.0.0/16, 172.16.0.0/12", "127.0.0.1, ::1, bogus"];

#[test]
fn test_allow_list_snapshot_never_mixes_generations() {
    let store = Arc::new(SettingsStore::from_defaults().unwrap());

    thread::scope(|s| {
        for writer in 0..2 {
            let store = Arc::clone(&store);
            s.spawn(move || {
                for i in 0..500 {
                    store.set_remote_allowed_cidr(SPECS[(i + writer) % SPECS.len()]);
                }
            });
        }

        for _ in 0..4 {
            let store = Arc::clone(&store);
            s.spawn(move || {
                for _ in 0..500 {
                    let snapshot = store.access_list();
                    let expected = access::parse(&snapshot.raw).matchers;
                    assert_eq!(&*snapshot.matchers, expected.as_slice(), "raw '{}'", snapshot.raw);
                }
            });
        }
    });
}

#[test]
fn test_set_then_read_sees_own_write() {
    let store = Arc::new(SettingsStore::from_defaults().unwrap());
    let inside: IpAddr = "10.20.30.40".parse().unwrap();

    thread::scope(|s| {
        let noisy = Arc::clone(&store);
        s.spawn(move || {
            for _ in 0..200 {
                let _ = noisy.allowed_cidr_list();
                let _ = noisy.remote_allowed_cidr();
            }
        });

        for _ in 0..200 {
            store.set_remote_allowed_cidr("10.0.0.0/8");
            let matchers = store.allowed_cidr_list();
            assert_eq!(matchers.len(), 1);
            assert!(matchers[0].contains(inside));
        }
    });
}

#[test]
fn test_ladder_cache_follows_latest_write() {
    let store = Arc::new(SettingsStore::from_defaults().unwrap());

    thread::scope(|s| {
        for height in [360, 480, 720] {
            let store = Arc::clone(&store);
            s.spawn(move || {
                for _ in 0..200 {
                    store.set_adaptive_resolution_list(Some(vec![EncoderRung::new(height, height * 1000, 64_000)]));
                }
            });
        }

        for _ in 0..2 {
            let store = Arc::clone(&store);
            s.spawn(move || {
                for _ in 0..200 {
                    if let Some(rungs) = store.adaptive_resolution_list().unwrap() {
                        assert_eq!(rungs.len(), 1);
                        assert_eq!(rungs[0].video_bitrate, rungs[0].height * 1000);
                    }
                }
            });
        }
    });

    let raw = store.encoder_settings_string().unwrap();
    let rungs = store.adaptive_resolution_list().unwrap().unwrap();
    assert_eq!(media_app_settings::encoder::encode(&rungs), raw);
}
