// Copyright 2025 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.
//
// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

use crate::runtime::features::{DroppableFeatures, FeatureSets};
use crate::runtime::registry::RuntimeProfile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Compatibility of one table with one runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// All reader features are supported by the runtime
    pub read_supported: bool,

    /// All writer features are supported by the runtime
    pub write_supported: bool,

    /// Only set when reading is unsupported: whether dropping the droppable
    /// features would make the table readable
    pub read_supported_after_dropping: Option<bool>,

    /// Only set when writing is unsupported: whether dropping the droppable
    /// features would make the table writable
    pub write_supported_after_dropping: Option<bool>,

    /// Reader features the runtime does not support, in declaration order
    pub blocking_reader_features: Vec<String>,

    /// Writer features the runtime does not support, in declaration order
    pub blocking_writer_features: Vec<String>,
}

/// Outcome of checking one direction (read or write).
struct DirectionCheck {
    supported: bool,
    supported_after_dropping: Option<bool>,
    blocking: Vec<String>,
}

fn check_direction(
    features: &[String],
    supported: &BTreeSet<String>,
    droppable: &[String],
) -> DirectionCheck {
    let blocking: Vec<String> = features
        .iter()
        .filter(|f| !supported.contains(f.as_str()))
        .cloned()
        .collect();

    if blocking.is_empty() {
        return DirectionCheck {
            supported: true,
            supported_after_dropping: None,
            blocking,
        };
    }

    // Everything not supported must be droppable.
    let after_dropping = blocking.iter().all(|f| droppable.contains(f));

    DirectionCheck {
        supported: false,
        supported_after_dropping: Some(after_dropping),
        blocking,
    }
}

/// Evaluate a table's features against a runtime profile.
///
/// This is a pure function: the same inputs always produce the same verdict.
///
/// # Arguments
///
/// * `features` - The table's classified reader and writer features
/// * `profile` - The runtime to check against
/// * `droppable` - Features assumed removable from the table
///
/// # Returns
///
/// The `Verdict` for both directions. The "after dropping" answers are only
/// present for a direction that is not already supported.
///
/// # Examples
///
/// ```
/// use lake_compat::check::evaluator::evaluate;
/// use lake_compat::runtime::{resolve, DroppableFeatures, FeatureSets};
///
/// let profile = resolve("1.2").unwrap();
/// let features = FeatureSets::new(
///     vec!["deletionVectors".to_string()],
///     vec!["appendOnly".to_string(), "v2Checkpoint".to_string()],
/// );
///
/// let verdict = evaluate(&features, &profile, &DroppableFeatures::default());
/// assert!(verdict.read_supported);
/// assert!(!verdict.write_supported);
/// assert_eq!(verdict.write_supported_after_dropping, Some(true));
/// assert_eq!(verdict.blocking_writer_features, vec!["v2Checkpoint"]);
/// ```
pub fn evaluate(
    features: &FeatureSets,
    profile: &RuntimeProfile,
    droppable: &DroppableFeatures,
) -> Verdict {
    let read = check_direction(
        &features.reader_features,
        &profile.supported_reader_features,
        droppable.for_reader(),
    );
    let write = check_direction(
        &features.writer_features,
        &profile.supported_writer_features,
        droppable.for_writer(),
    );

    Verdict {
        read_supported: read.supported,
        write_supported: write.supported,
        read_supported_after_dropping: read.supported_after_dropping,
        write_supported_after_dropping: write.supported_after_dropping,
        blocking_reader_features: read.blocking,
        blocking_writer_features: write.blocking,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::registry::{known_versions, resolve};

    fn strings(features: &[&str]) -> Vec<String> {
        features.iter().map(|f| f.to_string()).collect()
    }

    fn sets(reader: &[&str], writer: &[&str]) -> FeatureSets {
        FeatureSets::new(strings(reader), strings(writer))
    }

    #[test]
    fn test_runtime_1_2_scenario() {
        let profile = resolve("1.2").unwrap();
        let features = sets(&["deletionVectors"], &["appendOnly", "v2Checkpoint"]);

        let verdict = evaluate(&features, &profile, &DroppableFeatures::default());

        assert!(verdict.read_supported);
        assert!(!verdict.write_supported);
        assert_eq!(verdict.read_supported_after_dropping, None);
        assert_eq!(verdict.write_supported_after_dropping, Some(true));
        assert!(verdict.blocking_reader_features.is_empty());
        assert_eq!(verdict.blocking_writer_features, vec!["v2Checkpoint"]);
    }

    #[test]
    fn test_runtime_1_3_scenario() {
        let profile = resolve("1.3").unwrap();
        let features = sets(&["deletionVectors"], &["appendOnly", "v2Checkpoint"]);

        let verdict = evaluate(&features, &profile, &DroppableFeatures::default());

        assert!(verdict.read_supported);
        assert!(verdict.write_supported);
        assert_eq!(verdict.read_supported_after_dropping, None);
        assert_eq!(verdict.write_supported_after_dropping, None);
        assert!(verdict.blocking_reader_features.is_empty());
        assert!(verdict.blocking_writer_features.is_empty());
    }

    #[test]
    fn test_no_features_is_fully_supported() {
        for version in known_versions() {
            let profile = resolve(version).unwrap();
            let verdict = evaluate(&FeatureSets::default(), &profile, &DroppableFeatures::default());

            assert!(verdict.read_supported);
            assert!(verdict.write_supported);
            assert_eq!(verdict.read_supported_after_dropping, None);
            assert_eq!(verdict.write_supported_after_dropping, None);
        }
    }

    #[test]
    fn test_not_droppable_blocker() {
        let profile = resolve("1.3").unwrap();
        let features = sets(&["columnMapping"], &["rowTracking", "v2Checkpoint", "liquid"]);

        let verdict = evaluate(&features, &profile, &DroppableFeatures::default());

        assert!(verdict.read_supported);
        assert!(!verdict.write_supported);
        assert_eq!(verdict.write_supported_after_dropping, Some(false));
        assert_eq!(verdict.blocking_writer_features, vec!["rowTracking", "liquid"]);
    }

    #[test]
    fn test_read_blocked_but_droppable() {
        let profile = resolve("1.2").unwrap();
        let features = sets(
            &["columnMapping", "v2Checkpoint"],
            &["columnMapping", "v2Checkpoint"],
        );

        let verdict = evaluate(&features, &profile, &DroppableFeatures::default());

        assert!(!verdict.read_supported);
        assert_eq!(verdict.read_supported_after_dropping, Some(true));
        assert_eq!(verdict.blocking_reader_features, vec!["v2Checkpoint"]);
        assert!(!verdict.write_supported);
        assert_eq!(verdict.write_supported_after_dropping, Some(true));
    }

    #[test]
    fn test_blocking_preserves_declaration_order() {
        let profile = resolve("1.2").unwrap();
        let features = sets(
            &[],
            &["liquid", "appendOnly", "rowTracking", "identityColumns", "invariants"],
        );

        let verdict = evaluate(&features, &profile, &DroppableFeatures::default());

        assert_eq!(
            verdict.blocking_writer_features,
            vec!["liquid", "rowTracking", "identityColumns"]
        );
    }

    #[test]
    fn test_direction_specific_droppable() {
        let profile = resolve("1.2").unwrap();
        let features = sets(&["v2Checkpoint"], &["v2Checkpoint"]);
        let droppable = DroppableFeatures::split(&["v2Checkpoint"], &[]);

        let verdict = evaluate(&features, &profile, &droppable);

        assert_eq!(verdict.read_supported_after_dropping, Some(true));
        assert_eq!(verdict.write_supported_after_dropping, Some(false));
    }

    #[test]
    fn test_subset_law_against_every_profile() {
        let candidates = [
            sets(&[], &[]),
            sets(&["deletionVectors"], &["deletionVectors"]),
            sets(&["timestampNtz", "v2Checkpoint"], &["domainMetadata"]),
            sets(&["columnMapping"], &["clustering", "appendOnly"]),
            sets(&["v2Checkpoint", "deletionVectors"], &["icebergCompatV1"]),
        ];
        let droppable = DroppableFeatures::default();

        for version in known_versions() {
            let profile = resolve(version).unwrap();
            for features in &candidates {
                let verdict = evaluate(features, &profile, &droppable);

                let reader_subset = features
                    .reader_features
                    .iter()
                    .all(|f| profile.supports_reader(f));
                let writer_subset = features
                    .writer_features
                    .iter()
                    .all(|f| profile.supports_writer(f));

                assert_eq!(verdict.read_supported, reader_subset);
                assert_eq!(verdict.write_supported, writer_subset);
                assert_eq!(
                    verdict.read_supported_after_dropping.is_some(),
                    !verdict.read_supported
                );
                assert_eq!(
                    verdict.write_supported_after_dropping.is_some(),
                    !verdict.write_supported
                );
                assert_eq!(
                    verdict.blocking_reader_features.is_empty(),
                    verdict.read_supported
                );
                assert_eq!(
                    verdict.blocking_writer_features.is_empty(),
                    verdict.write_supported
                );

                if let Some(after) = verdict.write_supported_after_dropping {
                    let expected = features.writer_features.iter().all(|f| {
                        profile.supports_writer(f) || droppable.for_writer().contains(f)
                    });
                    assert_eq!(after, expected);
                }
            }
        }
    }
}
