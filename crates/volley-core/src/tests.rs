#[cfg(test)]
mod tests {
    use glam::DVec3;

    use crate::commands::PlayerCommand;
    use crate::config::{GameConfig, SpawnDescriptor};
    use crate::enums::*;
    use crate::error::{ConfigError, SpawnError};
    use crate::events::{DamageTarget, EventKind, GameEvent};
    use crate::state::ArenaSnapshot;
    use crate::types::*;

    #[test]
    fn test_archetype_parse() {
        assert_eq!("archer".parse::<EnemyArchetype>(), Ok(EnemyArchetype::Archer));
        assert_eq!("melee".parse::<EnemyArchetype>(), Ok(EnemyArchetype::Melee));
        assert_eq!(
            "dragon".parse::<EnemyArchetype>(),
            Err(SpawnError::UnknownArchetype("dragon".to_string()))
        );
        assert_eq!(EnemyArchetype::Melee.to_string(), "melee");
    }

    #[test]
    fn test_archetype_serde_matches_parse() {
        for v in [EnemyArchetype::Archer, EnemyArchetype::Melee] {
            let json = serde_json::to_string(&v).unwrap();
            assert_eq!(json, format!("\"{}\"", v.as_str()));
            let back: EnemyArchetype = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    /// Events are internally tagged with snake_case names.
    #[test]
    fn test_event_tagging() {
        let event = GameEvent::WaveCleared { wave: 2 };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"wave_cleared\""), "{json}");

        let event = GameEvent::ShowDamageNumber {
            target: DamageTarget::Enemy(ActorId(7)),
            amount: 40,
            color: crate::constants::COLOR_HIT,
            y_offset: 2.0,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }

    #[test]
    fn test_event_kind() {
        assert_eq!(GameEvent::PlayerDied.kind(), EventKind::PlayerDied);
        assert_eq!(
            GameEvent::BoostAutoselect {
                key: "multishot".into()
            }
            .kind(),
            EventKind::BoostAutoselect
        );
        assert_eq!(
            GameEvent::EnemyKilled {
                enemy: ActorId(1),
                archetype: EnemyArchetype::Archer,
                position: DVec3::ZERO,
            }
            .kind(),
            EventKind::EnemyKilled
        );
    }

    #[test]
    fn test_player_command_serde() {
        let commands = vec![
            PlayerCommand::Tap,
            PlayerCommand::SetMovement {
                speed: 6.0,
                facing: 1.2,
            },
            PlayerCommand::SelectBoost { key: "fire".into() },
        ];
        for cmd in &commands {
            let json = serde_json::to_string(cmd).unwrap();
            let back: PlayerCommand = serde_json::from_str(&json).unwrap();
            assert_eq!(*cmd, back);
        }
    }

    #[test]
    fn test_snapshot_default_serializes() {
        let snap = ArenaSnapshot::default();
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"phase\":\"Intro\""));
    }

    // ---- Config ----

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        config.validate().unwrap();
        assert_eq!(config.wave(1).unwrap().enemies.len(), 3);
        assert!(config.has_next_wave(1));
        assert!(!config.has_next_wave(2));
        assert!(config.wave(3).is_none());
    }

    #[test]
    fn test_config_preset_fallback() {
        let config = GameConfig::default();
        assert_eq!(config.preset("fire").unwrap().payload, PayloadMode::Burn);
        assert_eq!(config.preset("nonexistent").unwrap().payload, PayloadMode::Single);
    }

    /// Partial JSON overrides only the named fields.
    #[test]
    fn test_config_from_partial_json() {
        let json = r#"{
            "hero": { "max_hp": 500 },
            "waves": { "1": { "enemies": [ { "type": "melee", "position": [1.0, 0.0, -2.0] } ] } }
        }"#;
        let config = GameConfig::from_json(json).unwrap();
        assert_eq!(config.hero.max_hp, 500);
        assert_eq!(config.hero.move_speed, crate::constants::HERO_MOVE_SPEED);
        let wave = config.wave(1).unwrap();
        assert_eq!(wave.enemies, vec![SpawnDescriptor::new("melee", 1.0, -2.0)]);
        assert!(config.wave(2).is_none());
    }

    #[test]
    fn test_config_errors() {
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "default_preset": "laser" }"#),
            Err(ConfigError::MissingDefaultPreset(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "hero": { "max_hp": 0 } }"#),
            Err(ConfigError::InvalidValue { .. })
        ));
        match GameConfig::from_json(r#"{ "hero": { "move_speed": -1.0 } }"#) {
            Err(ConfigError::InvalidValue { field, value }) => {
                assert_eq!(field, "hero.move_speed");
                assert_eq!(value, -1.0);
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
        assert!(matches!(
            GameConfig::from_json(r#"{ "archer": { "arrow_speed": 0.0 } }"#),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "melee": { "lunge_secs": -0.5 } }"#),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "encounter": { "resume_delay_secs": -1.0 } }"#),
            Err(ConfigError::InvalidValue { .. })
        ));

        let mut config = GameConfig::default();
        config.melee.move_speed = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
        // Zero is a legal speed: the archer simply stands still.
        assert!(GameConfig::from_json(r#"{ "archer": { "move_speed": 0.0 } }"#).is_ok());
    }

    // ---- Geometry ----

    #[test]
    fn test_rotate_about_y_matches_yaw() {
        let fwd = yaw_forward(0.0);
        let rotated = rotate_about_y(fwd, 0.3);
        let expected = yaw_forward(0.3);
        assert!((rotated - expected).length() < 1e-12);
    }

    #[test]
    fn test_planar_direction() {
        let d = planar_direction(DVec3::new(0.0, 5.0, 0.0), DVec3::new(3.0, 0.0, 4.0)).unwrap();
        assert!((d - DVec3::new(0.6, 0.0, 0.8)).length() < 1e-12);
        assert!(planar_direction(DVec3::ZERO, DVec3::new(0.0, 3.0, 0.0)).is_none());
    }

    #[test]
    fn test_bounds() {
        let bounds = ArenaBounds::default();
        assert!(bounds.contains(DVec3::new(0.0, 0.0, 6.0)));
        assert!(!bounds.contains(DVec3::new(6.0, 0.0, 0.0)));
        let clamped = bounds.clamp(DVec3::new(-9.0, 1.0, 20.0));
        assert_eq!(clamped, DVec3::new(-5.5, 1.0, 12.3));
    }

    #[test]
    fn test_sim_time_advance() {
        let mut t = SimTime::default();
        for _ in 0..40 {
            t.advance();
        }
        assert_eq!(t.tick, 40);
        assert!((t.elapsed_secs - 1.0).abs() < 1e-9);
    }
}
