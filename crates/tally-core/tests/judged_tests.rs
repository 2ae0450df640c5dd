//! Tests for the judged performance rulesets

use tally_core::{
    aggregate_scores, sort_ranking, CodecError, JudgedRuleset, MaxRank, Ruleset, Standings,
    ValidationError,
};

mod scoring {
    use super::*;

    #[test]
    fn interview_points_sum() {
        let ruleset = JudgedRuleset::interview();
        let mut score = ruleset.create_score();
        score.set("suun_oma", 5).unwrap();
        score.set("suun_vaikeus", 0).unwrap();
        score.set("ohty_vaikeus", 4).unwrap();
        assert_eq!(score.points(), 9);
        assert!(ruleset.validate(&score).is_ok());
    }

    #[test]
    fn full_marks_hit_table_totals() {
        for (ruleset, expected) in [
            (JudgedRuleset::interview(), 30),
            (JudgedRuleset::performance(), 50),
        ] {
            let mut score = ruleset.create_score();
            for cat in ruleset.schema().categories().to_vec() {
                let max = match cat.kind {
                    tally_core::CategoryKind::Bounded { max } => max,
                    _ => unreachable!("judged schemas hold bounded categories only"),
                };
                score.set(cat.name, max).unwrap();
            }
            assert_eq!(score.points(), expected);
            assert_eq!(ruleset.max_points(), expected);
            assert!(ruleset.validate(&score).is_ok());
        }
    }

    #[test]
    fn over_max_category_rejected() {
        let ruleset = JudgedRuleset::performance();
        let mut score = ruleset.create_score();
        score.set("ltvs_aika", 3).unwrap();
        assert!(matches!(
            ruleset.validate(&score),
            Err(ValidationError::Category {
                category: "ltvs_aika",
                ..
            })
        ));
    }
}

mod codec {
    use super::*;

    #[test]
    fn one_byte_per_category_round_trip() {
        let ruleset = JudgedRuleset::interview();
        let mut score = ruleset.create_score();
        score.set("esip_esiintyminen", 3).unwrap();
        score.set("suun_tasapaino", 1).unwrap();

        let data = ruleset.encode(&score).unwrap();
        assert_eq!(data.len(), 11);
        assert_eq!(data[0], 3);

        assert_eq!(ruleset.decode(&data).unwrap().inner(), score.inner());
    }

    #[test]
    fn trailing_bytes_rejected() {
        let ruleset = JudgedRuleset::performance();
        let mut data = ruleset.encode(&ruleset.create_score()).unwrap();
        data.push(0);
        assert_eq!(
            ruleset.decode(&data),
            Err(CodecError::TrailingBytes { remaining: 1 })
        );
    }

    #[test]
    fn truncated_blob_rejected() {
        let ruleset = JudgedRuleset::interview();
        let data = ruleset.encode(&ruleset.create_score()).unwrap();
        assert!(matches!(
            ruleset.decode(&data[..10]),
            Err(CodecError::UnexpectedEnd { .. })
        ));
    }
}

mod ranking {
    use super::*;

    #[test]
    fn best_performance_ranking() {
        let ruleset = JudgedRuleset::performance();

        let mut strong = ruleset.create_score();
        strong.set("hvps_pisteet", 5).unwrap();
        strong.set("rvsj_vaihtelevuus", 4).unwrap();

        let mut weak = ruleset.create_score();
        weak.set("hvps_pisteet", 2).unwrap();

        let scores = vec![
            ("a".to_string(), Some(weak.clone())),
            ("a".to_string(), Some(strong)),
            ("b".to_string(), Some(weak)),
        ];

        let ranks = aggregate_scores(scores, MaxRank::from_scores);
        let sorted = sort_ranking(&ranks);
        assert_eq!(sorted[0].0, "a");
        assert_eq!(ranks["a"].to_string(), "9p");
        assert_eq!(ranks["b"].to_string(), "2p");
    }

    #[test]
    fn equal_totals_share_placement() {
        let ruleset = JudgedRuleset::interview();

        // Same total through different categories
        let mut first = ruleset.create_score();
        first.set("suun_oma", 3).unwrap();
        let mut second = ruleset.create_score();
        second.set("esip_esiintyminen", 3).unwrap();

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
