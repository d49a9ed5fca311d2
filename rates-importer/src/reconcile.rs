//! Reconciliation between freshly fetched and previously stored rates.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rates_types::ExchangeRate;

/// Decides what to persist given the fetched batch and the latest stored
/// records.
///
/// `StampAsOf` reproduces the behaviour of the system this importer replaces:
/// every fetched record is re-dated to the as-of date and the latest stored
/// set is ignored entirely. No merge, no dedup, no gap filling. It remains the
/// default for behavioural parity; the as-of date is injected rather than
/// hardcoded so runs are reproducible in tests.
///
/// `CarryForward` is the opt-in replacement policy: fetched values win on
/// dates present in both sets, and every calendar day between the last stored
/// date and the as-of date without a fetched value is filled by carrying the
/// latest known per-quote values forward. Stored records are never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilePolicy {
    StampAsOf { as_of: NaiveDate },
    CarryForward { as_of: NaiveDate },
}

impl ReconcilePolicy {
    pub fn reconcile(
        &self,
        new_rates: Vec<ExchangeRate>,
        latest_in_db: &[ExchangeRate],
    ) -> Vec<ExchangeRate> {
        match *self {
            ReconcilePolicy::StampAsOf { as_of } => stamp_as_of(new_rates, as_of),
            ReconcilePolicy::CarryForward { as_of } => {
                carry_forward(new_rates, latest_in_db, as_of)
            }
        }
    }
}

fn stamp_as_of(new_rates: Vec<ExchangeRate>, as_of: NaiveDate) -> Vec<ExchangeRate> {
    new_rates
        .into_iter()
        .map(|mut rate| {
            rate.date = as_of;
            rate
        })
        .collect()
}

fn carry_forward(
    new_rates: Vec<ExchangeRate>,
    latest_in_db: &[ExchangeRate],
    as_of: NaiveDate,
) -> Vec<ExchangeRate> {
    // Fetched values win; merge same-date batches preferring later entries.
    let mut by_date: BTreeMap<NaiveDate, ExchangeRate> = BTreeMap::new();
    for rate in new_rates {
        by_date
            .entry(rate.date)
            .and_modify(|existing| existing.rates.extend(rate.rates.clone()))
            .or_insert(rate);
    }

    // The carried snapshot is the most recent stored value per quote currency.
    if let Some(template) = latest_in_db.last() {
        let mut snapshot: BTreeMap<String, f64> = BTreeMap::new();
        let mut last_stored = template.date;
        for stored in latest_in_db {
            snapshot.extend(stored.rates.iter().map(|(q, r)| (q.clone(), *r)));
            last_stored = last_stored.max(stored.date);
        }

        let mut day = last_stored.succ_opt();
        while let Some(d) = day {
            if d > as_of {
                break;
            }
            by_date.entry(d).or_insert_with(|| {
                ExchangeRate::new(
                    template.source,
                    template.base_currency.clone(),
                    d,
                    snapshot.clone(),
                )
            });
            day = d.succ_opt();
        }
    }

    by_date.into_values().collect()
}
