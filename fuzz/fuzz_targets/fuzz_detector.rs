//! Fuzz target: detector + supervisor + counter pipeline
//!
//! Every 6 input bytes form one polling cycle:
//! `[inbound_cm_lo, inbound_cm_hi, outbound_cm_lo, outbound_cm_hi, dt_lo, dt_hi]`.
//! A distance of `0xFFFF` stands for a missing echo.  The first byte
//! picks capacity and reset policy.  Verifies:
//! - No panics under arbitrary sample streams
//! - The count never leaves `[0, capacity]`
//! - A crossing is only reported when a flag was armed at cycle start
//!
//! cargo fuzz run fuzz_detector

#![no_main]

use libfuzzer_sys::fuzz_target;
use peoplecounter::counting::detector::DirectionDetector;
use peoplecounter::counting::occupancy::OccupancyCounter;
use peoplecounter::counting::supervisor::FlagTimeoutSupervisor;
use peoplecounter::counting::{
    DirectionMapping, DistanceSample, NO_ECHO_CM, ResetPolicy, SensorId,
};

fuzz_target!(|data: &[u8]| {
    let Some((&head, rest)) = data.split_first() else {
        return;
    };

    let capacity = u16::from(head & 0x1F) + 1;
    let policy = if head & 0x20 == 0 {
        ResetPolicy::OnCompletion
    } else {
        ResetPolicy::UntilClear
    };
    let entry_first = if head & 0x40 == 0 {
        SensorId::Outbound
    } else {
        SensorId::Inbound
    };

    let mut detector = DirectionDetector::new(30, DirectionMapping::new(entry_first), policy);
    let mut supervisor = FlagTimeoutSupervisor::new(7000);
    let mut counter = OccupancyCounter::new(capacity);
    let mut now: u64 = 0;

    for chunk in rest.chunks_exact(6) {
        let cm = |lo: u8, hi: u8| match u16::from_le_bytes([lo, hi]) {
            0xFFFF => NO_ECHO_CM,
            v => u32::from(v),
        };
        now += u64::from(u16::from_le_bytes([chunk[4], chunk[5]]));

        supervisor.sweep(detector.flags_mut(), now);
        let any_armed_at_start = detector.flags().any_armed();

        let samples = [
            DistanceSample::new(SensorId::Inbound, cm(chunk[0], chunk[1]), now),
            DistanceSample::new(SensorId::Outbound, cm(chunk[2], chunk[3]), now),
        ];
        if let Some(crossing) = detector.observe(&samples) {
            assert!(any_armed_at_start, "crossing without a prior armed flag");
            counter.apply(&crossing);
        }

        assert!(counter.count() <= counter.capacity());
    }
});
