//! Tunable weights and keyword lists for the scenic composite.
#![forbid(unsafe_code)]

/// Weights applied by the default scenic composite.
///
/// The defaults reproduce the shipped formula:
/// `(road_change × 0.4 + turn × 0.2 + road_variety × 0.2)
/// × (1 − same_road) × (1 − main_road)`, with each main-road step costing
/// `0.1` and turn density saturating at `0.5` turns per kilometre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenicWeights {
    /// Multiplier on the road-change sub-score.
    pub road_change: f64,
    /// Multiplier on the turn sub-score.
    pub turn: f64,
    /// Multiplier on the road-variety sub-score.
    pub road_variety: f64,
    /// Penalty added per step whose road name matches a main-road keyword.
    pub main_road_step_penalty: f64,
    /// Turn density, in turns per kilometre, at which the turn sub-score
    /// saturates at `1.0`.
    pub turn_saturation_per_km: f64,
}

impl Default for ScenicWeights {
    fn default() -> Self {
        Self {
            road_change: 0.4_f64,
            turn: 0.2_f64,
            road_variety: 0.2_f64,
            main_road_step_penalty: 0.1_f64,
            turn_saturation_per_km: 0.5_f64,
        }
    }
}

/// Substrings marking a road name as a main road.
///
/// Matching is case-sensitive and checks for containment, so `"Pacific
/// Coast Highway"` matches `"Highway"` while `"highway 1"` does not.
///
/// # Examples
/// ```
/// use scenic_scorer::MainRoadKeywords;
///
/// let keywords = MainRoadKeywords::default();
/// assert!(keywords.matches("Garden State Parkway"));
/// assert!(!keywords.matches("Old Mill Lane"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainRoadKeywords {
    keywords: Vec<String>,
}

impl Default for MainRoadKeywords {
    fn default() -> Self {
        Self::new(["Highway", "Expressway", "Freeway", "Turnpike", "Parkway"])
    }
}

impl MainRoadKeywords {
    /// Construct a keyword list.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `road_name` contains any keyword.
    #[must_use]
    pub fn matches(&self, road_name: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| road_name.contains(keyword.as_str()))
    }

    /// The configured keywords.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.keywords
    }
}
