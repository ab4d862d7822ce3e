//! Candidate URL generation.
//!
//! Turns a [`NormalizedInput`] into an ordered, deduplicated list of URLs
//! that might serve the machine-readable API description, grouped into
//! priority tiers. Generation is pure: no I/O, no failure.
//!
//! ## Tiers
//!
//! | Tier | Name | Contents |
//! |------|------|----------|
//! | 0 | literal | the normalized input itself |
//! | 1 | immediate suffix | `{path}-json` |
//! | 2 | path variations | suffixes, query variants, sibling spec files |
//! | 3 | same level | conventional locations under the parent path |
//! | 4 | root well-known | conventional absolute paths on the origin |
//! | 5 | ancestors | spec file names at every ancestor of the path |
//!
//! A URL appears once, in the earliest tier that produces it.
//!
//! ```rust
//! use specfind_core::candidates::{CandidatePlan, Catalog, Tier};
//! use specfind_core::input::normalize;
//!
//! let input = normalize("https://api.example.com/docs")?;
//! let plan = CandidatePlan::build(&input, &Catalog::default());
//!
//! let owned: Vec<_> = plan.iter().take(2).collect();
//! let first: Vec<_> = owned.iter().map(|c| (c.tier, c.url.as_str())).collect();
//! assert_eq!(first, vec![
//!     (Tier::Literal, "https://api.example.com/docs"),
//!     (Tier::ImmediateSuffix, "https://api.example.com/docs-json"),
//! ]);
//! # Ok::<(), specfind_core::Error>(())
//! ```

use crate::input::NormalizedInput;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Suffixes appended directly to the input path.
const PATH_SUFFIXES: &[&str] = &["-json", ".json", "/json", "-json.json"];

/// Query strings that ask a documentation endpoint for its JSON form.
const QUERY_VARIANTS: &[&str] = &["?format=json", "?output=json", "?type=json"];

/// Suffixes applied to the last path segment, re-rooted under its parent.
const SEGMENT_SUFFIXES: &[&str] = &["-json", ".json"];

/// File names substituted for the last segment when the path has a parent.
const SIBLING_FILES: &[&str] = &[
    "swagger.json",
    "api-docs.json",
    "openapi.json",
    "docs-json",
    "docs.json",
];

/// Suffixes applied to the parent path itself.
const PARENT_SUFFIXES: &[&str] = &["-json", ".json"];

/// Conventional locations relative to the path's parent.
const SAME_LEVEL_PATTERNS: &[&str] = &[
    "/swagger.json",
    "/api-docs.json",
    "/openapi.json",
    "/v2/api-docs",
    "/v3/api-docs",
    "/swagger/v1/swagger.json",
    "/swagger/v2/swagger.json",
    "/swagger/v3/swagger.json",
];

/// Conventional absolute locations on the origin.
const ROOT_PATTERNS: &[&str] = &[
    "/swagger.json",
    "/api-docs.json",
    "/openapi.json",
    "/v2/swagger.json",
    "/v3/swagger.json",
    "/v1/swagger.json",
    "/api-docs",
    "/v2/api-docs",
    "/v3/api-docs",
    "/swagger/v1/swagger.json",
    "/swagger/v2/swagger.json",
    "/swagger/v3/swagger.json",
    "/api/swagger.json",
    "/api/v1/swagger.json",
    "/api/v2/swagger.json",
    "/api/v3/swagger.json",
    "/api/openapi.json",
];

/// Spec file names tried at every ancestor of the path.
const ANCESTOR_FILES: &[&str] = &["swagger.json", "api-docs.json", "openapi.json"];

/// Priority group of candidates. Lower tiers are probed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// The normalized input URL itself.
    Literal,
    /// `{path}-json`, the most common convention.
    ImmediateSuffix,
    /// Suffix, query and sibling-file variations of the path.
    PathVariations,
    /// Conventional spec locations under the parent path.
    SameLevel,
    /// Conventional spec locations on the bare origin.
    RootWellKnown,
    /// Spec file names at each ancestor of the path.
    Ancestors,
}

/// How many probes of a tier may be in flight at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concurrency {
    /// One probe at a time.
    Sequential,
    /// Every candidate of the tier at once.
    Unbounded,
    /// At most this many at once.
    Bounded(usize),
}

impl Concurrency {
    /// Number of in-flight probes for a tier of `len` candidates.
    #[must_use]
    pub fn width(self, len: usize) -> usize {
        match self {
            Self::Sequential => 1,
            Self::Unbounded => len.max(1),
            Self::Bounded(width) => width.max(1),
        }
    }
}

impl Tier {
    /// All tiers in probe order.
    pub const ALL: [Self; 6] = [
        Self::Literal,
        Self::ImmediateSuffix,
        Self::PathVariations,
        Self::SameLevel,
        Self::RootWellKnown,
        Self::Ancestors,
    ];

    /// Numeric priority, 0 being the highest.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Literal => 0,
            Self::ImmediateSuffix => 1,
            Self::PathVariations => 2,
            Self::SameLevel => 3,
            Self::RootWellKnown => 4,
            Self::Ancestors => 5,
        }
    }

    /// Short human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Literal => "literal",
            Self::ImmediateSuffix => "immediate suffix",
            Self::PathVariations => "path variations",
            Self::SameLevel => "same level",
            Self::RootWellKnown => "root well-known",
            Self::Ancestors => "ancestors",
        }
    }

    /// Probe concurrency for this tier. `batch_width` bounds tiers 4 and 5.
    #[must_use]
    pub const fn concurrency(self, batch_width: usize) -> Concurrency {
        match self {
            Self::Literal | Self::ImmediateSuffix => Concurrency::Sequential,
            Self::PathVariations | Self::SameLevel => Concurrency::Unbounded,
            Self::RootWellKnown | Self::Ancestors => Concurrency::Bounded(batch_width),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tier {} ({})", self.index(), self.label())
    }
}

/// A URL to probe and the tier it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Fully qualified URL.
    pub url: String,
    /// Priority group.
    pub tier: Tier,
}

/// The catalog of conventional spec locations.
///
/// The built-in tables are data, not logic; [`Catalog::with_extra_root_paths`]
/// extends tier 4 without touching the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    root_paths: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            root_paths: ROOT_PATTERNS.iter().map(|p| (*p).to_string()).collect(),
        }
    }
}

impl Catalog {
    /// Append extra absolute paths to the root well-known tier.
    ///
    /// Paths without a leading `/` get one; blank entries are ignored.
    #[must_use]
    pub fn with_extra_root_paths<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for path in extra {
            let path = path.as_ref().trim();
            if path.is_empty() {
                continue;
            }
            if path.starts_with('/') {
                self.root_paths.push(path.to_string());
            } else {
                self.root_paths.push(format!("/{path}"));
            }
        }
        self
    }

    /// Absolute paths probed on the bare origin.
    #[must_use]
    pub fn root_paths(&self) -> &[String] {
        &self.root_paths
    }
}

/// The candidates of one tier, in probe order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierCandidates {
    /// The tier these candidates belong to.
    pub tier: Tier,
    /// Candidate URLs.
    pub urls: Vec<String>,
}

/// Ordered, deduplicated candidates for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePlan {
    tiers: Vec<TierCandidates>,
}

impl CandidatePlan {
    /// Generate the plan for `input`.
    #[must_use]
    pub fn build(input: &NormalizedInput, catalog: &Catalog) -> Self {
        let origin = input.origin();
        let base = origin.base();
        let path = origin.path();
        let segments = origin.segments();
        let parent = origin.parent_path();

        let mut builder = PlanBuilder::default();

        builder.push(Tier::Literal, input.literal().to_string());

        if !origin.is_root() {
            builder.push(Tier::ImmediateSuffix, format!("{base}{path}-json"));

            for suffix in PATH_SUFFIXES.iter().chain(QUERY_VARIANTS) {
                builder.push(Tier::PathVariations, format!("{base}{path}{suffix}"));
            }
            if let Some(last) = segments.last() {
                for suffix in SEGMENT_SUFFIXES {
                    builder.push(Tier::PathVariations, format!("{base}{parent}/{last}{suffix}"));
                }
            }
            if !parent.is_empty() {
                for file in SIBLING_FILES {
                    builder.push(Tier::PathVariations, format!("{base}{parent}/{file}"));
                }
                for suffix in PARENT_SUFFIXES {
                    builder.push(Tier::PathVariations, format!("{base}{parent}{suffix}"));
                }
            }

            for pattern in SAME_LEVEL_PATTERNS {
                builder.push(Tier::SameLevel, format!("{base}{parent}{pattern}"));
            }
        }

        for pattern in catalog.root_paths() {
            builder.push(Tier::RootWellKnown, format!("{base}{pattern}"));
        }

        for ancestor in origin.ancestors() {
            for file in ANCESTOR_FILES {
                builder.push(Tier::Ancestors, format!("{base}{ancestor}/{file}"));
            }
        }

        builder.finish()
    }

    /// Tiers in probe order. Every tier is present, possibly empty.
    #[must_use]
    pub fn tiers(&self) -> &[TierCandidates] {
        &self.tiers
    }

    /// All candidates flattened in priority order.
    pub fn iter(&self) -> impl Iterator<Item = Candidate> + '_ {
        self.tiers.iter().flat_map(|group| {
            group.urls.iter().map(move |url| Candidate {
                url: url.clone(),
                tier: group.tier,
            })
        })
    }

    /// Candidates of a single tier.
    #[must_use]
    pub fn urls(&self, tier: Tier) -> &[String] {
        self.tiers
            .iter()
            .find(|group| group.tier == tier)
            .map_or(&[][..], |group| group.urls.as_slice())
    }

    /// Total number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.iter().map(|group| group.urls.len()).sum()
    }

    /// Whether the plan holds no candidates. Never true for a plan built
    /// from a valid input, since the literal is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
struct PlanBuilder {
    seen: HashSet<String>,
    tiers: Vec<TierCandidates>,
}

impl PlanBuilder {
    fn push(&mut self, tier: Tier, url: String) {
        if !self.seen.insert(url.clone()) {
            return;
        }
        match self.tiers.iter_mut().find(|group| group.tier == tier) {
            Some(group) => group.urls.push(url),
            None => self.tiers.push(TierCandidates {
                tier,
                urls: vec![url],
            }),
        }
    }

    fn finish(mut self) -> CandidatePlan {
        let tiers = Tier::ALL
            .iter()
            .map(|tier| {
                let position = self.tiers.iter().position(|group| group.tier == *tier);
                position.map_or_else(
                    || TierCandidates {
                        tier: *tier,
                        urls: Vec::new(),
                    },
                    |index| self.tiers.swap_remove(index),
                )
            })
            .collect();
        CandidatePlan { tiers }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::input::normalize;
    use proptest::prelude::*;

    fn plan_for(raw: &str) -> CandidatePlan {
        CandidatePlan::build(&normalize(raw).unwrap(), &Catalog::default())
    }

    #[test]
    fn test_literal_then_immediate_suffix() {
        let plan = plan_for("https://example.com/api/docs");
        assert_eq!(plan.urls(Tier::Literal), ["https://example.com/api/docs"]);
        assert_eq!(
            plan.urls(Tier::ImmediateSuffix),
            ["https://example.com/api/docs-json"]
        );
    }

    #[test]
    fn test_path_variations_for_nested_path() {
        let plan = plan_for("https://example.com/api/docs");
        let expected = [
            "https://example.com/api/docs.json",
            "https://example.com/api/docs/json",
            "https://example.com/api/docs-json.json",
            "https://example.com/api/docs?format=json",
            "https://example.com/api/docs?output=json",
            "https://example.com/api/docs?type=json",
            "https://example.com/api/swagger.json",
            "https://example.com/api/api-docs.json",
            "https://example.com/api/openapi.json",
            "https://example.com/api/docs-json",
            "https://example.com/api/docs.json",
            "https://example.com/api-json",
            "https://example.com/api.json",
        ];
        // `/api/docs-json` and `/api/docs.json` were claimed by earlier entries
        let expected: Vec<&str> = {
            let mut seen = HashSet::new();
            seen.insert("https://example.com/api/docs-json");
            expected.into_iter().filter(|u| seen.insert(*u)).collect()
        };
        assert_eq!(plan.urls(Tier::PathVariations), expected.as_slice());
    }

    #[test]
    fn test_same_level_uses_parent() {
        let plan = plan_for("https://example.com/api/docs");
        let same_level = plan.urls(Tier::SameLevel);
        // the first three were already produced as sibling files in tier 2
        assert_eq!(
            same_level,
            [
                "https://example.com/api/v2/api-docs",
                "https://example.com/api/v3/api-docs",
                "https://example.com/api/swagger/v1/swagger.json",
                "https://example.com/api/swagger/v2/swagger.json",
                "https://example.com/api/swagger/v3/swagger.json",
            ]
        );
    }

    #[test]
    fn test_root_input_only_has_literal_and_root_patterns() {
        let plan = plan_for("https://example.com");
        assert_eq!(plan.urls(Tier::Literal), ["https://example.com"]);
        assert!(plan.urls(Tier::ImmediateSuffix).is_empty());
        assert!(plan.urls(Tier::PathVariations).is_empty());
        assert!(plan.urls(Tier::SameLevel).is_empty());
        assert_eq!(plan.urls(Tier::RootWellKnown).len(), ROOT_PATTERNS.len());
        assert!(plan.urls(Tier::Ancestors).is_empty());
    }

    #[test]
    fn test_single_segment_same_level_claims_root_files() {
        let plan = plan_for("https://example.com/docs");
        assert!(
            plan.urls(Tier::SameLevel)
                .contains(&"https://example.com/swagger.json".to_string())
        );
        assert!(
            !plan
                .urls(Tier::RootWellKnown)
                .contains(&"https://example.com/swagger.json".to_string())
        );
        // every ancestor file at the root was already claimed
        assert!(plan.urls(Tier::Ancestors).is_empty());
    }

    #[test]
    fn test_ancestor_walk_reaches_intermediate_levels() {
        let plan = plan_for("https://example.com/a/b/c/d");
        let ancestors = plan.urls(Tier::Ancestors);
        assert_eq!(
            ancestors,
            [
                "https://example.com/a/b/swagger.json",
                "https://example.com/a/b/api-docs.json",
                "https://example.com/a/b/openapi.json",
                "https://example.com/a/swagger.json",
                "https://example.com/a/api-docs.json",
                "https://example.com/a/openapi.json",
            ]
        );
        assert!(plan.iter().all(|c| !c.url["https://".len()..].contains("//")));
    }

    #[test]
    fn test_extra_root_paths_extend_tier_four() {
        let catalog = Catalog::default().with_extra_root_paths(["internal/spec.json", " ", "/x"]);
        let plan = CandidatePlan::build(&normalize("https://example.com").unwrap(), &catalog);
        let root = plan.urls(Tier::RootWellKnown);
        assert_eq!(root.len(), ROOT_PATTERNS.len() + 2);
        assert!(root.contains(&"https://example.com/internal/spec.json".to_string()));
        assert!(root.contains(&"https://example.com/x".to_string()));
    }

    #[test]
    fn test_port_is_preserved_in_candidates() {
        let plan = plan_for("http://localhost:8080/docs");
        assert!(plan.iter().all(|c| c.url.starts_with("http://localhost:8080")));
    }

    #[test]
    fn test_tier_concurrency() {
        assert_eq!(Tier::Literal.concurrency(5), Concurrency::Sequential);
        assert_eq!(Tier::ImmediateSuffix.concurrency(5), Concurrency::Sequential);
        assert_eq!(Tier::PathVariations.concurrency(5), Concurrency::Unbounded);
        assert_eq!(Tier::SameLevel.concurrency(5), Concurrency::Unbounded);
        assert_eq!(Tier::RootWellKnown.concurrency(5), Concurrency::Bounded(5));
        assert_eq!(Tier::Ancestors.concurrency(3), Concurrency::Bounded(3));
        assert_eq!(Concurrency::Unbounded.width(9), 9);
        assert_eq!(Concurrency::Bounded(0).width(9), 1);
    }

    #[test]
    fn test_iter_is_in_tier_order() {
        let plan = plan_for("https://example.com/x/y/z");
        let tiers: Vec<Tier> = plan.iter().map(|c| c.tier).collect();
        let mut sorted = tiers.clone();
        sorted.sort();
        assert_eq!(tiers, sorted);
        assert_eq!(plan.iter().count(), plan.len());
    }

    proptest! {
        #[test]
        fn prop_plan_has_no_duplicates(segments in prop::collection::vec("[a-z0-9_-]{1,8}", 0..6)) {
            let raw = format!("https://example.com/{}", segments.join("/"));
            let plan = plan_for(&raw);
            let mut seen = HashSet::new();
            for candidate in plan.iter() {
                prop_assert!(seen.insert(candidate.url.clone()), "duplicate {}", candidate.url);
            }
        }

        #[test]
        fn prop_json_suffix_no_later_than_tier_one(segments in prop::collection::vec("[a-z0-9_]{1,8}", 1..6)) {
            let raw = format!("https://example.com/{}", segments.join("/"));
            let plan = plan_for(&raw);
            let target = format!("{raw}-json");
            let found = plan.iter().find(|c| c.url == target);
            prop_assert!(found.is_some());
            prop_assert!(found.unwrap().tier <= Tier::ImmediateSuffix);
        }

        #[test]
        fn prop_literal_is_first(segments in prop::collection::vec("[a-z0-9]{1,8}", 0..4)) {
            let raw = format!("https://example.com/{}", segments.join("/"));
            let input = normalize(&raw).unwrap();
            let plan = CandidatePlan::build(&input, &Catalog::default());
            let first = plan.iter().next().unwrap();
            prop_assert_eq!(first.tier, Tier::Literal);
            prop_assert_eq!(first.url, input.literal().to_string());
        }
    }
}
