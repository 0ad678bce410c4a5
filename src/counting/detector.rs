//! Direction detector.
//!
//! Called once per polling cycle with one sample per sensor.  The decision
//! for this cycle is made against the flag state as it stood when the
//! cycle began, so two sensors turning close in the same cycle arm
//! together and complete nothing.

use log::debug;

use super::{CrossingEvent, DirectionMapping, DistanceSample, FlagBank, ResetPolicy, SensorId};

pub struct DirectionDetector {
    threshold_cm: u32,
    mapping: DirectionMapping,
    policy: ResetPolicy,
    bank: FlagBank,
}

impl DirectionDetector {
    pub fn new(threshold_cm: u32, mapping: DirectionMapping, policy: ResetPolicy) -> Self {
        Self {
            threshold_cm,
            mapping,
            policy,
            bank: FlagBank::default(),
        }
    }

    /// Whether a sample counts as someone standing in front of the sensor.
    pub fn is_close(&self, sample: &DistanceSample) -> bool {
        !sample.is_no_echo() && sample.distance_cm < self.threshold_cm
    }

    /// Feed one cycle's samples, indexed by [`SensorId::index`].
    ///
    /// Returns the completed crossing, if any.  At most one crossing can
    /// complete per cycle: it needs the completing sensor unarmed and its
    /// companion armed, which cannot hold for both sensors at once.
    pub fn observe(&mut self, samples: &[DistanceSample; 2]) -> Option<CrossingEvent> {
        if self.bank.is_latched() {
            self.release_if_clear(samples);
            return None;
        }

        let armed_at_start = [
            self.bank.is_armed(SensorId::Inbound),
            self.bank.is_armed(SensorId::Outbound),
        ];
        let mut completed: Option<(SensorId, u64)> = None;

        for sensor in SensorId::ALL {
            let sample = &samples[sensor.index()];
            if !self.is_close(sample) || self.bank.is_armed(sensor) {
                continue;
            }
            self.bank.arm(sensor, sample.timestamp_ms);
            debug!(
                "detector: {} armed at {}ms ({}cm)",
                sensor.label(),
                sample.timestamp_ms,
                sample.distance_cm
            );
            if armed_at_start[sensor.other().index()] {
                completed = Some((sensor, sample.timestamp_ms));
            }
        }

        let (completed_by, at_ms) = completed?;
        let direction = self.mapping.direction_completed_by(completed_by);

        match self.policy {
            ResetPolicy::OnCompletion => self.bank.clear_all(),
            ResetPolicy::UntilClear => self.bank.latch(),
        }

        debug!(
            "detector: crossing {:?} completed by {} ({:?})",
            direction,
            completed_by.label(),
            self.policy
        );

        Some(CrossingEvent {
            direction,
            completed_by,
            at_ms,
        })
    }

    pub fn flags(&self) -> &FlagBank {
        &self.bank
    }

    /// Mutable access for the timeout supervisor.
    pub fn flags_mut(&mut self) -> &mut FlagBank {
        &mut self.bank
    }

    pub fn policy(&self) -> ResetPolicy {
        self.policy
    }

    fn release_if_clear(&mut self, samples: &[DistanceSample; 2]) {
        if samples.iter().any(|s| self.is_close(s)) {
            return;
        }
        self.bank.clear_all();
        debug!("detector: both sensors clear, flags released");
    }
}
