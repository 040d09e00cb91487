//! Telemetry contributions.
//!
//! A contribution writes keys into the invocation's property bag. All
//! contributions run on every invocation, before validation, so rejected
//! invocations are still counted.

use std::sync::Arc;

use graphctl_types::{ArgumentBag, TelemetryProperties};

pub type TelemetryContribution = Arc<dyn Fn(&ArgumentBag, &mut TelemetryProperties) + Send + Sync>;

/// Records, for each named option, whether the invocation supplied it.
pub fn presence(options: &'static [&'static str]) -> TelemetryContribution {
    Arc::new(move |args: &ArgumentBag, properties: &mut TelemetryProperties| {
        for option in options {
            properties.insert(*option, args.is_set(option));
        }
    })
}

/// Records the value of an option, or `default` when it was not supplied.
pub fn value_or(option: &'static str, default: &'static str) -> TelemetryContribution {
    Arc::new(move |args: &ArgumentBag, properties: &mut TelemetryProperties| {
        properties.insert(option, args.get_str(option).unwrap_or(default));
    })
}

#[derive(Clone, Default)]
pub struct TelemetryRegistry {
    contributions: Vec<TelemetryContribution>,
}

impl TelemetryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, contribution: TelemetryContribution) {
        self.contributions.push(contribution);
    }

    pub fn len(&self) -> usize {
        self.contributions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }

    /// Apply every contribution in registration order to a fresh bag.
    pub fn collect(&self, args: &ArgumentBag) -> TelemetryProperties {
        let mut properties = TelemetryProperties::new();
        for contribution in &self.contributions {
            contribution(args, &mut properties);
        }
        properties
    }
}
