//! Tests for the rescue course rulesets
//!
//! Covers a full scored run, wire round-trips and best-run ranking.

use tally_core::{
    aggregate_scores, sort_ranking, AttemptOutcome, AttemptTally, CodecError, MaxRank,
    RescueRuleset, RescueScore, Ruleset, Standings, ValidationError,
};

mod scoring {
    use super::*;

    #[test]
    fn tier_one_scenario() {
        let ruleset = RescueRuleset::by_difficulty(1, None).unwrap();
        let mut score = ruleset.create_score();
        score.set_time(123).unwrap();
        score
            .set_outcome("viiva_punainen", AttemptOutcome::FirstSuccess)
            .unwrap();
        score
            .set_tally("viiva_palat", AttemptTally::new(0, 0, 1))
            .unwrap();

        assert_eq!(score.points(), 30);
        assert_eq!(score.time(), 123);
        assert_eq!(score.to_string(), "30p, 02:03");
        assert!(ruleset.validate(&score).is_ok());
    }

    #[test]
    fn retry_scores_half_weight() {
        let ruleset = RescueRuleset::by_difficulty(3, None).unwrap();
        let mut score = ruleset.create_score();
        // Rescue lift is worth 20, retry halves it
        score
            .set_outcome("uhri_pelastus", AttemptOutcome::RetrySuccess)
            .unwrap();
        score
            .set_outcome("uhri_nosto", AttemptOutcome::FirstSuccess)
            .unwrap();
        assert_eq!(score.points(), 20);
    }

    #[test]
    fn elapsed_time_never_scores() {
        let ruleset = RescueRuleset::by_difficulty(1, None).unwrap();
        let mut score = ruleset.create_score();
        score.set_time(599).unwrap();
        assert_eq!(score.points(), 0);
    }

    #[test]
    fn time_limit_enforced() {
        let ruleset = RescueRuleset::by_difficulty(2, Some(300)).unwrap();
        let mut score = ruleset.create_score();
        score.set_time(360).unwrap();
        assert!(matches!(
            ruleset.validate(&score),
            Err(ValidationError::TimeOverMax { time: 360, max: 300 })
        ));
    }
}

mod codec {
    use super::*;

    #[test]
    fn tier_one_wire_layout() {
        let ruleset = RescueRuleset::by_difficulty(1, None).unwrap();
        let mut score = ruleset.create_score();
        score.set_time(123).unwrap();
        score
            .set_outcome("viiva_punainen", AttemptOutcome::FirstSuccess)
            .unwrap();
        score
            .set_tally("viiva_palat", AttemptTally::new(1, 0, 2))
            .unwrap();

        let data = ruleset.encode(&score).unwrap();
        // time(2) + punainen(1) + palat(3) + kippi(3) + 4 victim outcomes(4)
        assert_eq!(data.len(), 13);
        assert_eq!(&data[..6], &[0x00, 0x7B, 0x02, 0x01, 0x00, 0x02]);

        let decoded = ruleset.decode(&data).unwrap();
        assert_eq!(decoded.inner(), score.inner());
    }

    #[test]
    fn trailing_bytes_rejected() {
        let ruleset = RescueRuleset::by_difficulty(1, None).unwrap();
        let mut data = ruleset.encode(&ruleset.create_score()).unwrap();
        data.push(0xFF);
        assert_eq!(
            ruleset.decode(&data),
            Err(CodecError::TrailingBytes { remaining: 1 })
        );
    }

    #[test]
    fn truncated_blob_rejected() {
        let ruleset = RescueRuleset::by_difficulty(1, None).unwrap();
        let data = ruleset.encode(&ruleset.create_score()).unwrap();
        assert!(matches!(
            ruleset.decode(&data[..data.len() - 1]),
            Err(CodecError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn unmapped_outcome_byte_rejected() {
        let ruleset = RescueRuleset::by_difficulty(1, None).unwrap();
        let mut data = ruleset.encode(&ruleset.create_score()).unwrap();
        // Third byte is viiva_punainen's outcome
        data[2] = 9;
        assert!(matches!(
            ruleset.decode(&data),
            Err(CodecError::UnmappedByte { byte: 9, .. })
        ));
    }
}

mod ranking {
    use super::*;

    fn run(ruleset: &RescueRuleset, points_cats: &[&str], time: u32) -> RescueScore {
        let mut score = ruleset.create_score();
        score.set_time(time).unwrap();
        for cat in points_cats {
            score
                .set_outcome(cat, AttemptOutcome::FirstSuccess)
                .unwrap();
        }
        score
    }

    #[test]
    fn best_run_ranking() {
        let ruleset = RescueRuleset::by_difficulty(1, None).unwrap();

        // a: 30 points; b and c: 20 points with b faster; d: 10 points;
        // e: never played
        let scores = vec![
            (
                "a".to_string(),
                Some(run(&ruleset, &["viiva_punainen", "uhri_alue"], 300)),
            ),
            (
                "a".to_string(),
                Some(run(&ruleset, &["uhri_alue"], 100)),
            ),
            (
                "b".to_string(),
                Some(run(&ruleset, &["uhri_alue", "uhri_ulos"], 100)),
            ),
            (
                "c".to_string(),
                Some(run(&ruleset, &["uhri_alue", "uhri_ulos"], 150)),
            ),
            ("d".to_string(), Some(run(&ruleset, &["uhri_alue"], 50))),
            ("d".to_string(), None),
            ("e".to_string(), None),
        ];

        let ranks = aggregate_scores(scores, MaxRank::from_scores);
        let order: Vec<String> = sort_ranking(&ranks)
            .into_iter()
            .map(|(team, _)| team)
            .collect();
        assert_eq!(order, ["a", "b", "c", "d", "e"]);

        assert_eq!(ranks["a"].to_string(), "30p, 05:00");
        assert_eq!(ranks["e"].to_string(), "-");
    }

    #[test]
    fn equal_points_and_time_share_placement() {
        let ruleset = RescueRuleset::by_difficulty(1, None).unwrap();

        // Same total and time through different obstacles
        let mut first = ruleset.create_score();
        first.set_time(100).unwrap();
        first
            .set_outcome("uhri_alue", AttemptOutcome::FirstSuccess)
            .unwrap();

        let mut second = ruleset.create_score();
        second.set_time(100).unwrap();
        second
            .set_outcome("uhri_ulos", AttemptOutcome::FirstSuccess)
            .unwrap();

        assert_eq!(first.cmp(&second), std::cmp::Ordering::Equal);
        assert_eq!(first, second);
        assert_ne!(first.inner(), second.inner());

        let scores = vec![
            ("a".to_string(), Some(first)),
            ("b".to_string(), Some(second)),
        ];
        let ranks = aggregate_scores(scores, MaxRank::from_scores);
        let standings = Standings::from_sorted(sort_ranking(&ranks));
        let numbers: Vec<usize> = standings.entries.iter().map(|e| e.number).collect();
        assert_eq!(numbers, vec![1, 1]);
    }
}
