/// A scheduled change on a [`GainParam`] timeline. Times are graph seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamEvent {
    SetValue { time: f64, value: f32 },
    LinearRamp { time: f64, value: f32 },
}

impl ParamEvent {
    pub fn time(&self) -> f64 {
        match *self {
            ParamEvent::SetValue { time, .. } | ParamEvent::LinearRamp { time, .. } => time,
        }
    }

    pub fn value(&self) -> f32 {
        match *self {
            ParamEvent::SetValue { value, .. } | ParamEvent::LinearRamp { value, .. } => value,
        }
    }
}

/// Sample-accurate gain automation.
///
/// Events are kept sorted by time; events sharing a time keep insertion order.
/// A `LinearRamp` interpolates from the preceding event's value and time, so a
/// ramp that is the first event simply holds the initial value until it is reached.
#[derive(Debug, Clone)]
pub struct GainParam {
    initial: f32,
    events: Vec<ParamEvent>,
}

impl GainParam {
    pub fn new(initial: f32) -> Self {
        Self {
            initial,
            events: Vec::new(),
        }
    }

    pub fn set_value_at_time(&mut self, value: f32, time: f64) -> &mut Self {
        self.insert(ParamEvent::SetValue { time, value });
        self
    }

    pub fn linear_ramp_to_value_at_time(&mut self, value: f32, time: f64) -> &mut Self {
        self.insert(ParamEvent::LinearRamp { time, value });
        self
    }

    /// Drop every event at or after `time` and hold the value the timeline had there.
    pub fn cancel_and_hold_at_time(&mut self, time: f64) -> &mut Self {
        let held = self.value_at(time);
        self.events.retain(|e| e.time() < time);
        self.insert(ParamEvent::SetValue { time, value: held });
        self
    }

    pub fn value_at(&self, time: f64) -> f32 {
        let mut prev: Option<(f64, f32)> = None;
        for event in &self.events {
            if event.time() > time {
                return match (*event, prev) {
                    (ParamEvent::LinearRamp { time: end, value }, Some((start, from))) => {
                        let frac = ((time - start) / (end - start)) as f32;
                        from + (value - from) * frac
                    }
                    (_, Some((_, held))) => held,
                    (_, None) => self.initial,
                };
            }
            prev = Some((event.time(), event.value()));
        }
        prev.map_or(self.initial, |(_, v)| v)
    }

    fn insert(&mut self, event: ParamEvent) {
        let idx = self.events.partition_point(|e| e.time() <= event.time());
        self.events.insert(idx, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_initial_value_without_events() {
        let p = GainParam::new(0.7);
        assert_eq!(p.value_at(0.0), 0.7);
        assert_eq!(p.value_at(100.0), 0.7);
    }

    #[test]
    fn linear_ramp_interpolates_from_previous_event() {
        let mut p = GainParam::new(1.0);
        p.set_value_at_time(1.0, 1.0)
            .linear_ramp_to_value_at_time(0.0, 2.0);
        assert_eq!(p.value_at(0.5), 1.0);
        assert_eq!(p.value_at(1.0), 1.0);
        assert!((p.value_at(1.5) - 0.5).abs() < 1e-6);
        assert!((p.value_at(1.75) - 0.25).abs() < 1e-6);
        assert_eq!(p.value_at(2.0), 0.0);
        assert_eq!(p.value_at(3.0), 0.0);
    }

    #[test]
    fn out_of_order_inserts_are_sorted() {
        let mut p = GainParam::new(0.0);
        p.linear_ramp_to_value_at_time(0.0, 2.0);
        p.set_value_at_time(1.0, 1.0);
        assert_eq!(p.value_at(0.5), 0.0);
        assert!((p.value_at(1.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn cancel_and_hold_freezes_mid_ramp() {
        let mut p = GainParam::new(1.0);
        p.set_value_at_time(1.0, 0.0)
            .linear_ramp_to_value_at_time(0.0, 1.0);
        p.cancel_and_hold_at_time(0.5);
        assert!((p.value_at(0.5) - 0.5).abs() < 1e-6);
        assert!((p.value_at(4.0) - 0.5).abs() < 1e-6);
    }
}
