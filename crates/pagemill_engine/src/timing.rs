use std::time::Duration;

/// A single named pipeline step and how long it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingStep {
    pub name: &'static str,
    pub duration: Duration,
}

/// Append-only record of pipeline steps.
///
/// Step order equals execution order and is reproduced verbatim in
/// frontmatter output; steps are never reordered or dropped once recorded.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Timings {
    steps: Vec<TimingStep>,
}

impl Timings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &'static str, duration: Duration) {
        self.steps.push(TimingStep { name, duration });
    }

    pub fn steps(&self) -> &[TimingStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Timings;
    use std::time::Duration;

    #[test]
    fn steps_keep_insertion_order() {
        let mut timings = Timings::new();
        timings.record("fetch", Duration::from_millis(120));
        timings.record("convert", Duration::from_millis(8));
        timings.record("total", Duration::from_millis(130));

        let names: Vec<&str> = timings.steps().iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["fetch", "convert", "total"]);
    }
}
