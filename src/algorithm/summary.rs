//! Headline totals
//!
//! Scalar figures shown above the charts: overall head counts per population
//! type and the outflow breakdown for a single focus country.

use std::fmt;

use serde::Serialize;

use crate::config::FocusCountry;
use crate::models::{MigrationRecord, PopulationType};

/// Outflow from the focus country
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusBreakdown {
    /// The focus country
    pub country: String,
    /// Everyone whose country of origin is the focus country
    pub total_from: i64,
    /// Hosted inside the focus country itself
    pub internally_displaced: i64,
    /// Hosted in each configured neighbour, in configured order
    pub hosted_in: Vec<(String, i64)>,
}

/// Summary totals handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryTotals {
    pub total_migrants: i64,
    pub total_refugees: i64,
    pub total_asylum_seekers: i64,
    pub focus: FocusBreakdown,
}

impl SummaryTotals {
    /// Compute all totals in one pass over the records
    ///
    /// Rows with Individuals ≤ 0 are ignored throughout.
    #[must_use]
    pub fn from_records(records: &[MigrationRecord], focus: &FocusCountry) -> Self {
        let mut totals = Self {
            total_migrants: 0,
            total_refugees: 0,
            total_asylum_seekers: 0,
            focus: FocusBreakdown {
                country: focus.country.clone(),
                total_from: 0,
                internally_displaced: 0,
                hosted_in: focus.neighbours.iter().map(|n| (n.clone(), 0)).collect(),
            },
        };

        for record in records.iter().filter(|r| r.counts()) {
            let n = record.individuals;
            add(&mut totals.total_migrants, n);
            match record.population_type {
                PopulationType::Refugees => add(&mut totals.total_refugees, n),
                PopulationType::AsylumSeekers => add(&mut totals.total_asylum_seekers, n),
                PopulationType::Other(_) => {}
            }

            if record.country_of_origin != focus.country {
                continue;
            }
            add(&mut totals.focus.total_from, n);
            if record.country == focus.country {
                add(&mut totals.focus.internally_displaced, n);
            }
            for (neighbour, hosted) in &mut totals.focus.hosted_in {
                if *neighbour == record.country {
                    add(hosted, n);
                }
            }
        }

        totals
    }

    /// Hosted count for one neighbour, if it is configured
    #[must_use]
    pub fn hosted_in(&self, neighbour: &str) -> Option<i64> {
        self.focus
            .hosted_in
            .iter()
            .find(|(name, _)| name == neighbour)
            .map(|(_, n)| *n)
    }
}

fn add(total: &mut i64, n: i64) {
    *total = total.saturating_add(n);
}

impl fmt::Display for SummaryTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Migration Summary:")?;
        writeln!(f, "  Total Refugees and Asylum Seekers: {}", self.total_migrants)?;
        writeln!(f, "  Total Refugees: {}", self.total_refugees)?;
        writeln!(f, "  Total Asylum Seekers: {}", self.total_asylum_seekers)?;
        writeln!(f, "\nState of {}:", self.focus.country)?;
        writeln!(f, "  Total Migrants from {}: {}", self.focus.country, self.focus.total_from)?;
        for (neighbour, n) in &self.focus.hosted_in {
            writeln!(f, "  Hosted in {neighbour}: {n}")?;
        }
        writeln!(f, "  Displaced internally: {}", self.focus.internally_displaced)?;
        Ok(())
    }
}
