//! Pick the winning candidate and address it the way the presentation layer
//! expects.

use log::warn;
use scenic_core::CandidateRoute;
use scenic_scorer::{ScoredCandidate, ScoredPool};

use crate::SelectionError;

/// How the presentation layer should pick up the selected route.
///
/// Providers commonly expose one canonical route object plus indexed
/// alternatives rather than a free-standing pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectableRoute {
    /// The canonical profile's primary route.
    Canonical,
    /// The alternative at this index, counted from zero after the primary
    /// route.
    Alternative(usize),
    /// The canonical profile returned nothing; hand the route over by value.
    ByValue,
}

/// The outcome of one selection request.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Winning candidate and its score.
    pub winner: ScoredCandidate,
    /// How to address the winner.
    pub target: SelectableRoute,
}

/// Return the entry with the strictly greatest composite score.
///
/// Ties go to the entry appearing first in the pool. Entries with a NaN
/// composite are skipped.
///
/// # Errors
/// Returns [`SelectionError::NoCandidatesAvailable`] when the pool has no
/// comparable entries.
pub fn select_best(pool: &ScoredPool) -> Result<&ScoredCandidate, SelectionError> {
    let mut best: Option<&ScoredCandidate> = None;
    for entry in pool.entries() {
        let value = entry.score.value();
        if value.is_nan() {
            warn!(
                "skipping candidate {} #{} with a NaN score",
                entry.route.provenance.profile, entry.route.provenance.index
            );
            continue;
        }
        if best.is_none_or(|current| value > current.score.value()) {
            best = Some(entry);
        }
    }
    best.ok_or_else(|| SelectionError::empty_pool(pool.excluded().len()))
}

/// Map `selected` onto the canonical profile's results.
///
/// `canonical` holds the canonical profile's candidates in provider order.
/// A candidate is located first by provenance and then, for candidates from
/// other profiles, by [`CandidateRoute::follows_same_path`].
///
/// # Errors
/// Returns [`SelectionError::AlternativeIndexUnresolvable`] when `selected`
/// matches none of `canonical`.
pub fn try_resolve_selectable_index(
    selected: &CandidateRoute,
    canonical: &[CandidateRoute],
) -> Result<SelectableRoute, SelectionError> {
    if canonical.is_empty() {
        return Ok(SelectableRoute::ByValue);
    }
    let position = canonical
        .iter()
        .position(|route| route.provenance == selected.provenance)
        .or_else(|| {
            canonical
                .iter()
                .position(|route| route.follows_same_path(selected))
        });
    match position.map(|index| index.checked_sub(1)) {
        Some(None) => Ok(SelectableRoute::Canonical),
        Some(Some(alternative)) => Ok(SelectableRoute::Alternative(alternative)),
        None => Err(SelectionError::AlternativeIndexUnresolvable {
            profile: selected.provenance.profile.clone(),
            index: selected.provenance.index,
        }),
    }
}

/// Like [`try_resolve_selectable_index`], falling back to
/// [`SelectableRoute::Canonical`] when the winner cannot be addressed.
#[must_use]
pub fn resolve_selectable_index(
    selected: &CandidateRoute,
    canonical: &[CandidateRoute],
) -> SelectableRoute {
    try_resolve_selectable_index(selected, canonical).unwrap_or_else(|err| {
        warn!("{err}; using the canonical primary route");
        SelectableRoute::Canonical
    })
}

/// Select the best entry of `pool` and address it against `canonical`.
///
/// When the winner cannot be addressed, the canonical primary route's pool
/// entry is returned instead. If the primary was not scored either, the
/// winner is handed over [`SelectableRoute::ByValue`].
///
/// # Errors
/// Returns [`SelectionError::NoCandidatesAvailable`] when the pool has no
/// comparable entries.
pub fn select_route(
    pool: &ScoredPool,
    canonical: &[CandidateRoute],
) -> Result<Selection, SelectionError> {
    let best = select_best(pool)?;
    match try_resolve_selectable_index(&best.route, canonical) {
        Ok(target) => Ok(Selection {
            winner: best.clone(),
            target,
        }),
        Err(err) => {
            warn!("{err}; using the canonical primary route");
            let primary = canonical.first().and_then(|primary| {
                pool.entries()
                    .iter()
                    .find(|entry| entry.route.provenance == primary.provenance)
            });
            Ok(primary.map_or_else(
                || Selection {
                    winner: best.clone(),
                    target: SelectableRoute::ByValue,
                },
                |entry| Selection {
                    winner: entry.clone(),
                    target: SelectableRoute::Canonical,
                },
            ))
        }
    }
}
