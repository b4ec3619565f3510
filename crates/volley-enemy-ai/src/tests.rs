#[cfg(test)]
mod tests {
    use glam::DVec3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use volley_core::components::{ArcherState, EnemyBehavior, MeleeState};
    use volley_core::config::GameConfig;
    use volley_core::constants::DT;
    use volley_core::enums::{ArcherPhase, EnemyArchetype, MeleePhase};

    use crate::fsm::{evaluate, EnemyContext, EnemyIntent, EnemyUpdate};
    use crate::profiles::{get_profile, initial_behavior, EnemyBehaviorProfile};

    fn step(
        behavior: EnemyBehavior,
        position: DVec3,
        hero: DVec3,
        profile: &EnemyBehaviorProfile,
        rng: &mut ChaCha8Rng,
    ) -> EnemyUpdate {
        let ctx = EnemyContext {
            behavior,
            position,
            hero_position: hero,
            dt: DT,
        };
        evaluate(&ctx, profile, rng)
    }

    fn melee_phase(b: &EnemyBehavior) -> MeleePhase {
        match b {
            EnemyBehavior::Melee(s) => s.phase,
            _ => panic!("not a melee behaviour"),
        }
    }

    #[test]
    fn test_profiles_follow_config() {
        let mut config = GameConfig::default();
        config.melee.lunge_speed = 14.0;
        let archer = get_profile(EnemyArchetype::Archer, &config);
        let melee = get_profile(EnemyArchetype::Melee, &config);
        assert_eq!(archer.max_hp, config.archer.hp);
        assert_eq!(archer.move_speed, 2.2);
        assert_eq!(melee.lunge_speed, 14.0);
        assert_eq!(melee.charge_cooldown_secs, 3.0);
    }

    #[test]
    fn test_initial_archer_direction_is_unit() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        match initial_behavior(EnemyArchetype::Archer, &mut rng) {
            EnemyBehavior::Archer(s) => {
                assert!((s.roam_dir.length() - 1.0).abs() < 1e-9);
                assert_eq!(s.roam_dir.y, 0.0);
                assert_eq!(s.phase, ArcherPhase::Roam);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    /// Chase 3.0 s, telegraph 0.7 s, lunge 0.25 s, cooldown 0.35 s, chase.
    #[test]
    fn test_melee_cycle_timing() {
        let config = GameConfig::default();
        let profile = get_profile(EnemyArchetype::Melee, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut behavior = EnemyBehavior::Melee(MeleeState::default());
        let mut position = DVec3::new(0.0, 0.0, -4.0);
        let hero = DVec3::new(0.0, 0.0, 6.0);

        let mut transitions: Vec<(u32, MeleePhase)> = Vec::new();
        let mut telegraph_signals = 0;
        for tick in 1..=200u32 {
            let update = step(behavior, position, hero, &profile, &mut rng);
            position += update.displacement;
            if update.phase_changed {
                transitions.push((tick, melee_phase(&update.behavior)));
            }
            if let Some(EnemyIntent::Telegraph { duration }) = update.intent {
                assert!((duration - 0.7).abs() < 1e-12);
                telegraph_signals += 1;
            }
            behavior = update.behavior;
        }

        assert_eq!(
            &transitions[..4],
            &[
                (120, MeleePhase::Telegraph),
                (148, MeleePhase::Lunge),
                (158, MeleePhase::Cooldown),
                (172, MeleePhase::Chase),
            ]
        );
        assert_eq!(telegraph_signals, 1);
    }

    #[test]
    fn test_melee_stands_still_while_telegraphing() {
        let config = GameConfig::default();
        let profile = get_profile(EnemyArchetype::Melee, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let behavior = EnemyBehavior::Melee(MeleeState {
            phase: MeleePhase::Telegraph,
            timer: 0.0,
            lunge_dir: DVec3::ZERO,
        });
        let update = step(behavior, DVec3::ZERO, DVec3::new(0.0, 0.0, 5.0), &profile, &mut rng);
        assert_eq!(update.displacement, DVec3::ZERO);
    }

    /// The lunge keeps the direction captured at telegraph end even if the hero moves.
    #[test]
    fn test_melee_lunge_direction_locked() {
        let config = GameConfig::default();
        let profile = get_profile(EnemyArchetype::Melee, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let behavior = EnemyBehavior::Melee(MeleeState {
            phase: MeleePhase::Telegraph,
            timer: 0.7,
            lunge_dir: DVec3::ZERO,
        });
        let update = step(behavior, DVec3::ZERO, DVec3::new(3.0, 0.0, 4.0), &profile, &mut rng);
        assert_eq!(melee_phase(&update.behavior), MeleePhase::Lunge);

        let update = step(
            update.behavior,
            DVec3::ZERO,
            DVec3::new(-10.0, 0.0, 0.0),
            &profile,
            &mut rng,
        );
        let expected = DVec3::new(0.6, 0.0, 0.8) * 10.0 * DT;
        assert!((update.displacement - expected).length() < 1e-9);
    }

    /// Exactly one shot per roam/hold cycle, aimed at the hero snapshot.
    #[test]
    fn test_archer_single_shot_per_cycle() {
        let config = GameConfig::default();
        let profile = get_profile(EnemyArchetype::Archer, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut behavior = initial_behavior(EnemyArchetype::Archer, &mut rng);
        let mut position = DVec3::new(2.0, 0.0, -4.0);
        let hero = DVec3::new(0.0, 0.0, 6.0);

        let mut shot_ticks = Vec::new();
        for tick in 1..=300u32 {
            let update = step(behavior, position, hero, &profile, &mut rng);
            position += update.displacement;
            if let Some(EnemyIntent::Shoot { target }) = update.intent {
                assert_eq!(target, hero);
                assert_eq!(update.displacement, DVec3::ZERO);
                shot_ticks.push(tick);
            }
            behavior = update.behavior;
        }
        // 2.0 s roam + 0.5 s hold = 100 ticks per cycle
        assert_eq!(shot_ticks, vec![81, 181, 281]);
    }

    #[test]
    fn test_archer_picks_new_direction_each_cycle() {
        let config = GameConfig::default();
        let profile = get_profile(EnemyArchetype::Archer, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let first_dir = DVec3::X;
        let mut behavior = EnemyBehavior::Archer(ArcherState {
            roam_dir: first_dir,
            ..ArcherState::default()
        });
        for _ in 0..100 {
            behavior = step(behavior, DVec3::ZERO, DVec3::Z, &profile, &mut rng).behavior;
        }
        match behavior {
            EnemyBehavior::Archer(s) => {
                assert_eq!(s.phase, ArcherPhase::Roam);
                assert_eq!(s.timer, 0.0);
                assert!(!s.shot_fired);
                assert_ne!(s.roam_dir, first_dir);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
