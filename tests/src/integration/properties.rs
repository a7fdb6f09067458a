//! # Property Tests
//!
//! Randomized checks of the matching invariants:
//!
//! - key expansion yields as many distinct identifiers as the rolling period
//! - clustering partitions its input into ordered, non-overlapping encounters
//! - the representative has the minimum attenuation of its encounter
//! - metadata validation is a pure function of its input

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use ec_01_exposure_matching::{
        EncounterClusterer, KeyExpander, MatchedObservation, MetadataStatus, MetadataValidator,
        ValidatedObservation,
    };
    use proptest::prelude::*;
    use shared_types::{
        DiagnosisKey, EncryptedMetadata, IntervalNumber, Observation, RollingProximityId,
    };

    use crate::fixtures::{metadata_v1, Broadcaster};

    fn sample(timestamp: i64, attenuation: i32, log_position: usize) -> ValidatedObservation {
        ValidatedObservation {
            matched: MatchedObservation {
                observation: Observation {
                    rpi: RollingProximityId([0; 16]),
                    metadata: EncryptedMetadata([0; 4]),
                    rssi: -(attenuation as i16),
                    timestamp,
                },
                interval: IntervalNumber::from_timestamp(timestamp),
                log_position,
            },
            decrypted: metadata_v1(0),
            tx_power: 0,
            attenuation,
            status: MetadataStatus::Valid,
        }
    }

    fn samples() -> impl Strategy<Value = Vec<ValidatedObservation>> {
        prop::collection::vec((0i64..3_600, 20i32..100), 0..60).prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(position, (t, att))| sample(1_600_000_000 + t, att, position))
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_expansion_yields_distinct_identifiers(
            material in prop::array::uniform16(any::<u8>()),
            start in 0u32..3_000_000,
            period in 1u32..=144,
        ) {
            let key = DiagnosisKey::new(material.to_vec(), start, period);
            let expander = KeyExpander::new(&key).unwrap();

            let ids: Vec<_> = expander.identifiers().collect();
            prop_assert_eq!(ids.len(), period as usize);
            let distinct: HashSet<_> = ids.iter().map(|(_, rpi)| *rpi).collect();
            prop_assert_eq!(distinct.len(), period as usize);
            prop_assert_eq!(ids[0].0, IntervalNumber(start));
        }
    }

    proptest! {
        #[test]
        fn prop_clustering_partitions_input(input in samples(), gap in 1i64..120) {
            let encounters = EncounterClusterer::new(gap).cluster(input.clone());

            let mut positions: Vec<usize> = encounters
                .iter()
                .flat_map(|e| e.samples().iter().map(|s| s.log_position()))
                .collect();
            positions.sort_unstable();
            prop_assert_eq!(positions, (0..input.len()).collect::<Vec<_>>());

            for pair in encounters.windows(2) {
                prop_assert!(pair[1].start() - pair[0].end() >= gap);
            }
            for encounter in &encounters {
                prop_assert!(!encounter.is_empty());
                for step in encounter.samples().windows(2) {
                    prop_assert!(step[1].timestamp() >= step[0].timestamp());
                    prop_assert!(step[1].timestamp() - step[0].timestamp() < gap);
                }
            }
        }

        #[test]
        fn prop_representative_has_minimum_attenuation(input in samples()) {
            for encounter in EncounterClusterer::default().cluster(input) {
                let representative = encounter.representative();
                prop_assert_eq!(representative.attenuation, encounter.min_attenuation());
                // First sample with the minimum wins ties.
                let first_min = encounter
                    .samples()
                    .iter()
                    .position(|s| s.attenuation == encounter.min_attenuation());
                prop_assert_eq!(Some(encounter.representative_index()), first_min);
                prop_assert_eq!(encounter.others().count(), encounter.len() - 1);
            }
        }

        #[test]
        fn prop_validation_is_pure(
            seed in any::<u8>(),
            offset in 0i64..600,
            rssi in -110i16..-20,
            plain in prop::array::uniform4(any::<u8>()),
        ) {
            let key = DiagnosisKey::new(vec![seed; 16], 1_000, 144);
            let expander = KeyExpander::new(&key).unwrap();
            let observation = Broadcaster::new(&key).sighting(1_050, offset, rssi, plain);
            let matched = MatchedObservation {
                observation,
                interval: IntervalNumber(1_050),
                log_position: 0,
            };

            let validator = MetadataValidator::default();
            let first = validator.validate_observation(expander.metadata_key(), &matched);
            let second = validator.validate_observation(expander.metadata_key(), &matched);
            prop_assert_eq!(first, second);
            prop_assert_eq!(first.decrypted, plain);
            prop_assert_eq!(first.tx_power, plain[1] as i8);
            prop_assert_eq!(first.attenuation, i32::from(plain[1] as i8) - i32::from(rssi));
            let expected_valid = plain[0] == 0x40 && plain[2] == 0 && plain[3] == 0;
            prop_assert_eq!(first.is_valid(), expected_valid);
        }
    }
}
