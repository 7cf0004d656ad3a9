use chrono::{Local, NaiveDate};
use rand::Rng;
use std::cell::Cell;

/// Source of App Service Plan names.
pub trait PlanNamer {
    fn next_name(&self) -> String;
}

/// `<prefix>-<yyyy>-<MM>-<dd>-<random>` with a random suffix below 100000.
///
/// The date is fixed when the namer is built so every plan of a run carries the same stamp.
#[derive(Debug, Clone)]
pub struct DatedPlanNamer {
    prefix: String,
    date: NaiveDate,
}

impl DatedPlanNamer {
    pub const DEFAULT_PREFIX: &'static str = "Migration-ASP";
    const SUFFIX_BOUND: u32 = 100_000;

    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_date(prefix, Local::now().date_naive())
    }

    pub fn with_date(prefix: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            prefix: prefix.into(),
            date,
        }
    }

    fn stamp(&self) -> String {
        format!("{}-{}", self.prefix, self.date.format("%Y-%m-%d"))
    }
}

impl Default for DatedPlanNamer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PREFIX)
    }
}

impl PlanNamer for DatedPlanNamer {
    fn next_name(&self) -> String {
        let suffix = rand::rng().random_range(0..Self::SUFFIX_BOUND);
        format!("{}-{}", self.stamp(), suffix)
    }
}

/// Deterministic `<prefix>-1`, `<prefix>-2`, ... names.
#[derive(Debug)]
pub struct SequentialPlanNamer {
    prefix: String,
    next: Cell<u64>,
}

impl SequentialPlanNamer {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: Cell::new(1),
        }
    }
}

impl PlanNamer for SequentialPlanNamer {
    fn next_name(&self) -> String {
        let n = self.next.get();
        self.next.set(n + 1);
        format!("{}-{}", self.prefix, n)
    }
}
