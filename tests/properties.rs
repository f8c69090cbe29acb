//! Property tests for the simulation's standing guarantees

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use road_rush::consts::{
    COLLECTIBLE_MARGIN, DECELERATION, MAX_COLLECTIBLES, MAX_OBSTACLES, NITRO_BOOST, NITRO_MAX,
    NITRO_RECHARGE, OBSTACLE_MARGIN,
};
use road_rush::highscores::{HighScores, MAX_HIGH_SCORES};
use road_rush::input::Controls;
use road_rush::sim::car::{CAR_SKINS, Car};
use road_rush::sim::spawn::{update_collectibles, update_obstacles};
use road_rush::sim::state::Viewport;
use road_rush::sim::track::{DRAW_DISTANCE, Track};

const VIEW: Viewport = Viewport {
    width: 800.0,
    height: 600.0,
};

fn controls() -> impl Strategy<Value = Controls> {
    any::<(bool, bool, bool, bool, bool, bool)>().prop_map(
        |(forward, back, left, right, brake, boost)| Controls {
            forward,
            back,
            left,
            right,
            brake,
            boost,
        },
    )
}

proptest! {
    #[test]
    fn speed_stays_within_caps(
        max_speed in 8.0f32..=16.0,
        inputs in prop::collection::vec(controls(), 1..400),
    ) {
        let mut car = Car::new(VIEW, CAR_SKINS[0], max_speed);
        for c in &inputs {
            car.apply_controls(c);
            prop_assert!(car.speed <= max_speed * NITRO_BOOST + 1e-4);
            prop_assert!(car.speed >= -max_speed / 2.0 - 1e-4);
        }
    }

    #[test]
    fn nitro_stays_in_meter(inputs in prop::collection::vec(controls(), 1..400)) {
        let mut car = Car::new(VIEW, CAR_SKINS[0], 8.0);
        for c in &inputs {
            car.apply_controls(c);
            prop_assert!((0.0..=NITRO_MAX).contains(&car.nitro));
            if car.nitro_active {
                prop_assert!(c.forward && c.boost);
            }
        }
    }

    #[test]
    fn coasting_decays_geometrically(speed in -8.0f32..24.0, nitro in 0.0f32..=NITRO_MAX) {
        let mut car = Car::new(VIEW, CAR_SKINS[0], 16.0);
        car.speed = speed;
        car.nitro = nitro;
        car.apply_controls(&Controls::default());

        let expected = speed * (1.0 - DECELERATION);
        prop_assert!((car.speed - expected).abs() <= 1e-5 * speed.abs().max(1.0));
        prop_assert_eq!(car.nitro, (nitro + NITRO_RECHARGE).min(NITRO_MAX));
        prop_assert!(!car.nitro_active);
    }

    #[test]
    fn entities_respect_ceilings_and_culling(
        seed in any::<u64>(),
        spawn_chance in 0.0f32..=1.0,
        level in 1u32..=5,
        ticks in 1usize..400,
    ) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut obstacles = Vec::new();
        let mut collectibles = Vec::new();

        for _ in 0..ticks {
            update_obstacles(&mut obstacles, &mut rng, spawn_chance, level, VIEW);
            update_collectibles(&mut collectibles, &mut rng, spawn_chance, VIEW);

            prop_assert!(obstacles.len() <= MAX_OBSTACLES);
            prop_assert!(collectibles.len() <= MAX_COLLECTIBLES);
            for o in &obstacles {
                prop_assert!(o.pos.y <= VIEW.height + OBSTACLE_MARGIN);
            }
            for c in &collectibles {
                prop_assert!(c.pos.y <= VIEW.height + COLLECTIBLE_MARGIN);
            }
        }
    }

    #[test]
    fn visible_segments_are_on_screen_and_ordered(
        curve in 0.5f32..=2.0,
        x in -5000.0f32..5000.0,
        z in 0.0f32..1_000_000.0,
    ) {
        let mut track = Track::new(curve);
        track.advance(x);
        track.travel(z);

        let visible = track.visible(VIEW);
        prop_assert!(visible.len() <= DRAW_DISTANCE);
        for pair in visible.windows(2) {
            prop_assert!(pair[0].n < pair[1].n);
        }
        for seg in &visible {
            prop_assert!(seg.far.y < VIEW.height);
            prop_assert!(seg.near.scale > 0.0 && seg.far.scale > 0.0);
        }
    }

    #[test]
    fn high_scores_stay_ranked(scores in prop::collection::vec(0u64..10_000, 0..40)) {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let mut board = HighScores::new();

        for &score in &scores {
            let before_last = board.entries.last().map(|e| e.score);
            let full = board.entries.len() == MAX_HIGH_SCORES;

            match board.add_record_at(score, 1, at) {
                Some(rank) => {
                    prop_assert!((1..=MAX_HIGH_SCORES).contains(&rank));
                    prop_assert_eq!(board.entries[rank - 1].score, score);
                }
                None => {
                    prop_assert!(full);
                    prop_assert!(Some(score) <= before_last);
                }
            }

            prop_assert!(board.entries.len() <= MAX_HIGH_SCORES);
            for pair in board.entries.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
            }
        }
    }
}
