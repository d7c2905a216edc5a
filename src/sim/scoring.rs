//! Score and level progression
//!
//! Level-up is derived from the score: it fires when the new score is an
//! exact multiple of five food items' worth at the current level. Because
//! the per-food value changes with the level, some levels are never left
//! this way (level 2 climbs in steps of 20 from 75 and never hits a
//! multiple of 100).

use crate::settings::Settings;

/// Result of crediting one food item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FedResult {
    pub points: u64,
    pub score: u64,
    pub level: u32,
    pub leveled_up: bool,
}

/// Credit one food item at `level` and decide whether the level advances
pub fn credit_food(score: u64, level: u32, settings: &Settings) -> FedResult {
    let points = settings.points_per_food(level);
    let score = score + points;
    // Zero-point food (possible from a hand-edited settings file) never levels up
    let leveled_up = points > 0 && score % (5 * points) == 0 && level < settings.max_level;
    FedResult {
        points,
        score,
        level: if leveled_up { level + 1 } else { level },
        leveled_up,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_food() {
        let r = credit_food(0, 1, &Settings::default());
        assert_eq!(r.points, 15);
        assert_eq!(r.score, 15);
        assert!(!r.leveled_up);
        assert_eq!(r.level, 1);
    }

    #[test]
    fn test_fifth_food_levels_up_once() {
        let settings = Settings::default();
        let mut score = 0;
        let mut level = 1;
        let mut level_ups = 0;
        for _ in 0..5 {
            let r = credit_food(score, level, &settings);
            score = r.score;
            level = r.level;
            if r.leveled_up {
                level_ups += 1;
            }
        }
        assert_eq!(score, 75);
        assert_eq!(level, 2);
        assert_eq!(level_ups, 1);

        // Next food is worth 20 at level 2: 95 is not a multiple of 100
        let r = credit_food(score, level, &settings);
        assert_eq!(r.score, 95);
        assert!(!r.leveled_up);
    }

    #[test]
    fn test_zero_point_food_does_not_level() {
        let settings: Settings =
            serde_json::from_str(r#"{"base_score": 0, "level_bonus_factor": 0}"#).unwrap();
        let r = credit_food(0, 1, &settings);
        assert_eq!(r.points, 0);
        assert_eq!(r.score, 0);
        assert_eq!(r.level, 1);
        assert!(!r.leveled_up);
    }

    #[test]
    fn test_level_two_never_advances() {
        let settings = Settings::default();
        let mut score = 75;
        for _ in 0..100 {
            let r = credit_food(score, 2, &settings);
            assert!(!r.leveled_up);
            score = r.score;
        }
    }

    #[test]
    fn test_max_level_caps() {
        let settings = Settings::default();
        // 60 per food at level 10; 240 + 60 = 300 = 5 * 60
        let r = credit_food(240, 10, &settings);
        assert_eq!(r.score, 300);
        assert!(!r.leveled_up);
        assert_eq!(r.level, 10);
    }

    #[test]
    fn test_exact_multiple_at_higher_level() {
        let settings = Settings::default();
        // 30 per food at level 4; 120 + 30 = 150 = 5 * 30
        let r = credit_food(120, 4, &settings);
        assert!(r.leveled_up);
        assert_eq!(r.level, 5);
    }
}
