//! Fuzz target: stored blobs read back from NVS
//!
//! Feeds arbitrary bytes to the config and count decoders exactly as the
//! NVS adapter would find them in flash.  Verifies:
//! - No panics under arbitrary byte inputs
//! - Corrupt blobs surface as errors, never as a bogus config
//! - Any config that decodes and validates survives a save/load cycle
//!
//! cargo fuzz run fuzz_config_blob

#![no_main]

use libfuzzer_sys::fuzz_target;
use peoplecounter::adapters::nvs::{COUNT_KEY, COUNT_NAMESPACE, NvsAdapter};
use peoplecounter::app::ports::{ConfigPort, CounterStore, StoragePort};
use peoplecounter::config::SystemConfig;

fuzz_target!(|data: &[u8]| {
    let mut nvs = NvsAdapter::new().expect("simulation backend");

    // Raw count blob: either decodes to a u16 or reports corruption.
    let _ = nvs.write(COUNT_NAMESPACE, COUNT_KEY, data);
    let _ = nvs.load_count();

    // Raw config blob.
    if let Ok(cfg) = postcard::from_bytes::<SystemConfig>(data) {
        if cfg.validate().is_ok() {
            nvs.save(&cfg).expect("valid config must persist");
            assert_eq!(nvs.load().expect("saved config must load"), cfg);
        } else {
            assert!(nvs.save(&cfg).is_err());
        }
    }
});
