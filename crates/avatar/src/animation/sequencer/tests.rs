use crate::catalog::StaticAsset;

use super::*;

fn sequencer(clips: &[(&str, f64)]) -> Sequencer {
    let asset = clips
        .iter()
        .fold(StaticAsset::new(), |asset, (name, duration)| asset.with_clip(*name, *duration));
    let catalog = AssetCatalog::scan(&asset).unwrap();
    Sequencer::new(&catalog, &AvatarConfig::default(), false)
}

fn standard() -> Sequencer {
    sequencer(&[("Idle", 2.0), ("Walk", 1.5), ("Wave", 1.0)])
}

fn weight(sequencer: &Sequencer, clip: &str) -> f32 {
    let key = sequencer.mixer().key(clip).unwrap();
    sequencer.mixer().get(key).unwrap().weight()
}

fn active(sequencer: &Sequencer, role: ChannelRole) -> Option<String> {
    sequencer.channel(role).active_clip
}

#[test]
fn start_fades_in_idle() {
    let mut sequencer = standard();

    let snapshot = sequencer.channel(ChannelRole::Continuous);
    assert_eq!(snapshot.active_clip.as_deref(), Some("Idle"));
    assert_eq!(snapshot.fade_state, FadeState::FadingIn);
    assert_eq!(
        sequencer.channel(ChannelRole::Transient).fade_state,
        FadeState::Empty
    );

    sequencer.update(0.25, &SequencerInputs::default());
    assert!((weight(&sequencer, "Idle") - 0.5).abs() < 1e-6);

    sequencer.update(0.25, &SequencerInputs::default());
    assert_eq!(
        sequencer.channel(ChannelRole::Continuous).fade_state,
        FadeState::Playing
    );
}

#[test]
fn idle_falls_back_to_first_clip() {
    let sequencer = sequencer(&[("Dance", 1.0), ("Walk", 1.0)]);
    assert_eq!(
        active(&sequencer, ChannelRole::Continuous).as_deref(),
        Some("Dance")
    );
}

#[test]
fn no_clips_is_inert() {
    let mut sequencer = sequencer(&[]);
    let inputs = SequencerInputs {
        animation: Some("Walk"),
        gesture: Some("wave"),
        is_talking: true,
        ..Default::default()
    };

    let events = sequencer.update(0.1, &inputs);
    assert_eq!(events, SequencerEvents::default());
    assert!(sequencer.clip_weights().is_empty());
    assert_eq!(
        sequencer.channel(ChannelRole::Continuous).fade_state,
        FadeState::Empty
    );
}

#[test]
fn unresolvable_request_keeps_current_clip() {
    let mut sequencer = sequencer(&[("Idle", 2.0), ("Walk", 1.0)]);
    sequencer.update(0.5, &SequencerInputs::default());

    let inputs = SequencerInputs {
        animation: Some("Run"),
        ..Default::default()
    };
    sequencer.update(0.1, &inputs);

    let snapshot = sequencer.channel(ChannelRole::Continuous);
    assert_eq!(snapshot.active_clip.as_deref(), Some("Idle"));
    assert_eq!(snapshot.requested_symbol.as_deref(), Some("Run"));
    assert_eq!(snapshot.fade_state, FadeState::Playing);
    assert_eq!(weight(&sequencer, "Idle"), 1.0);
}

#[test]
fn crossfades_to_requested_clip() {
    let mut sequencer = standard();
    sequencer.update(0.5, &SequencerInputs::default());

    let inputs = SequencerInputs {
        animation: Some("walk"),
        ..Default::default()
    };
    sequencer.update(0.15, &inputs);

    assert_eq!(active(&sequencer, ChannelRole::Continuous).as_deref(), Some("Walk"));
    assert!((weight(&sequencer, "Walk") - 0.5).abs() < 1e-6);
    assert!((weight(&sequencer, "Idle") - 0.5).abs() < 1e-6);

    sequencer.update(0.15, &inputs);
    let weights = sequencer.clip_weights();
    assert_eq!(weights.len(), 1);
    assert_eq!(weights[0].clip, "Walk");
    assert_eq!(weights[0].weight, 1.0);
}

#[test]
fn repeated_requests_are_idempotent() {
    let mut sequencer = standard();
    let walk = SequencerInputs {
        animation: Some("Walk"),
        ..Default::default()
    };

    sequencer.update(0.5, &walk);
    sequencer.update(0.5, &walk);
    let time = sequencer.clip_weights()[0].time;
    assert_eq!(
        sequencer.channel(ChannelRole::Continuous).fade_state,
        FadeState::Playing
    );

    // a different symbol that resolves to the same clip does not restart it
    let lower = SequencerInputs {
        animation: Some("walk"),
        ..Default::default()
    };
    sequencer.update(0.25, &lower);

    let weights = sequencer.clip_weights();
    assert_eq!(weights.len(), 1);
    assert!((weights[0].time - (time + 0.25)).abs() < 1e-9);
    assert_eq!(
        sequencer.channel(ChannelRole::Continuous).fade_state,
        FadeState::Playing
    );
}

#[test]
fn talking_overrides_and_restores() {
    let mut sequencer = sequencer(&[("idle_01", 2.0), ("talk_loop", 1.0)]);
    assert_eq!(
        active(&sequencer, ChannelRole::Continuous).as_deref(),
        Some("idle_01")
    );

    let talking = SequencerInputs {
        is_talking: true,
        ..Default::default()
    };
    sequencer.update(0.1, &talking);
    assert!(sequencer.is_talking());
    assert_eq!(
        active(&sequencer, ChannelRole::Continuous).as_deref(),
        Some("talk_loop")
    );

    sequencer.update(0.5, &talking);
    sequencer.update(0.1, &SequencerInputs::default());
    assert!(!sequencer.is_talking());
    assert_eq!(
        active(&sequencer, ChannelRole::Continuous).as_deref(),
        Some("idle_01")
    );
}

#[test]
fn request_during_talk_is_resumed_after() {
    let mut sequencer = sequencer(&[("Idle", 2.0), ("Walk", 1.0), ("Talk", 1.0)]);
    let talking_walk = SequencerInputs {
        animation: Some("Walk"),
        is_talking: true,
        ..Default::default()
    };
    sequencer.update(0.1, &talking_walk);
    assert_eq!(active(&sequencer, ChannelRole::Continuous).as_deref(), Some("Talk"));

    let walk = SequencerInputs {
        animation: Some("Walk"),
        ..Default::default()
    };
    sequencer.update(0.1, &walk);
    assert_eq!(active(&sequencer, ChannelRole::Continuous).as_deref(), Some("Walk"));
}

#[test]
fn missing_talk_clip_is_a_noop() {
    let mut sequencer = standard();
    sequencer.update(
        0.1,
        &SequencerInputs {
            is_talking: true,
            ..Default::default()
        },
    );
    assert!(!sequencer.is_talking());
    assert_eq!(active(&sequencer, ChannelRole::Continuous).as_deref(), Some("Idle"));
}

#[test]
fn gesture_dips_and_restores_continuous() {
    let mut sequencer = standard();
    sequencer.update(0.5, &SequencerInputs::default());

    let wave = SequencerInputs {
        gesture: Some("wave"),
        ..Default::default()
    };

    sequencer.update(0.125, &wave);
    assert_eq!(active(&sequencer, ChannelRole::Transient).as_deref(), Some("Wave"));
    assert_eq!(
        sequencer.channel(ChannelRole::Transient).fade_state,
        FadeState::FadingIn
    );
    assert_eq!(
        sequencer.channel(ChannelRole::Continuous).fade_state,
        FadeState::FadingOut
    );

    sequencer.update(0.125, &wave);
    assert_eq!(
        sequencer.channel(ChannelRole::Continuous).fade_state,
        FadeState::Empty
    );

    // wave is 1s long, the first two frames covered 0.25s of it
    for _ in 0..5 {
        assert_eq!(sequencer.update(0.125, &wave), SequencerEvents::default());
    }
    let events = sequencer.update(0.125, &wave);
    assert_eq!(events.gesture_completed.as_deref(), Some("wave"));

    let continuous = sequencer.channel(ChannelRole::Continuous);
    assert_eq!(continuous.active_clip.as_deref(), Some("Idle"));
    assert_eq!(continuous.fade_state, FadeState::FadingIn);
    let transient = sequencer.channel(ChannelRole::Transient);
    assert_eq!(transient.active_clip, None);
    assert_eq!(transient.fade_state, FadeState::FadingOut);

    // restored over 0.3s
    sequencer.update(0.15, &wave);
    assert!((weight(&sequencer, "Idle") - 0.5).abs() < 1e-6);
    sequencer.update(0.15, &wave);
    assert_eq!(weight(&sequencer, "Idle"), 1.0);
    assert_eq!(
        sequencer.channel(ChannelRole::Transient).fade_state,
        FadeState::Empty
    );

    // the same gesture symbol held does not replay
    assert_eq!(sequencer.update(2.0, &wave), SequencerEvents::default());
}

#[test]
fn gesture_restores_non_idle_clip() {
    let mut sequencer = standard();
    let walk = SequencerInputs {
        animation: Some("Walk"),
        ..Default::default()
    };
    sequencer.update(0.5, &walk);

    let walk_wave = SequencerInputs {
        gesture: Some("Wave"),
        ..walk
    };
    sequencer.update(0.5, &walk_wave);
    let events = sequencer.update(0.5, &walk_wave);

    assert_eq!(events.gesture_completed.as_deref(), Some("Wave"));
    assert_eq!(active(&sequencer, ChannelRole::Continuous).as_deref(), Some("Walk"));
}

#[test]
fn request_during_gesture_becomes_restore_target() {
    let mut sequencer = standard();
    let wave = SequencerInputs {
        gesture: Some("Wave"),
        ..Default::default()
    };
    sequencer.update(0.5, &wave);

    let walk_wave = SequencerInputs {
        animation: Some("Walk"),
        ..wave
    };
    sequencer.update(0.25, &walk_wave);
    assert_eq!(active(&sequencer, ChannelRole::Continuous), None);

    sequencer.update(0.25, &walk_wave);
    assert_eq!(active(&sequencer, ChannelRole::Continuous).as_deref(), Some("Walk"));
}

#[test]
fn new_gesture_preempts_running_one() {
    let mut sequencer = sequencer(&[("Idle", 2.0), ("Wave", 1.0), ("Nod", 1.0)]);
    sequencer.update(
        0.25,
        &SequencerInputs {
            gesture: Some("Wave"),
            ..Default::default()
        },
    );
    sequencer.update(
        0.1,
        &SequencerInputs {
            gesture: Some("Nod"),
            ..Default::default()
        },
    );

    let transient = sequencer.channel(ChannelRole::Transient);
    assert_eq!(transient.active_clip.as_deref(), Some("Nod"));
    assert_eq!(transient.requested_symbol.as_deref(), Some("Nod"));
    assert!(weight(&sequencer, "Wave") < 1.0);
}

#[test]
fn gesture_ignored_while_talking() {
    let mut sequencer = sequencer(&[("Idle", 2.0), ("Talk", 1.0), ("Wave", 1.0)]);
    sequencer.update(
        0.1,
        &SequencerInputs {
            gesture: Some("Wave"),
            is_talking: true,
            ..Default::default()
        },
    );

    assert_eq!(active(&sequencer, ChannelRole::Transient), None);
    assert_eq!(active(&sequencer, ChannelRole::Continuous).as_deref(), Some("Talk"));
}

#[test]
fn speed_only_scales_the_continuous_clip() {
    let mut sequencer = standard();
    let fast = SequencerInputs {
        speed: 2.0,
        ..Default::default()
    };
    sequencer.update(0.1, &fast);
    assert_eq!(sequencer.clip_weights()[0].speed, 2.0);

    sequencer.update(
        0.1,
        &SequencerInputs {
            gesture: Some("Wave"),
            ..fast
        },
    );
    let wave = sequencer
        .clip_weights()
        .into_iter()
        .find(|weight| weight.clip == "Wave")
        .unwrap();
    assert_eq!(wave.speed, 1.0);
}

fn clip_speed(sequencer: &Sequencer, clip: &str) -> Option<f64> {
    sequencer
        .clip_weights()
        .into_iter()
        .find(|weight| weight.clip == clip)
        .map(|weight| weight.speed)
}

#[test]
fn talk_crossfades_at_normal_speed() {
    let mut sequencer = sequencer(&[("Idle", 2.0), ("Talk", 1.0)]);
    let fast = SequencerInputs {
        speed: 2.0,
        ..Default::default()
    };
    sequencer.update(0.5, &fast);
    assert_eq!(clip_speed(&sequencer, "Idle"), Some(2.0));

    let talking = SequencerInputs {
        is_talking: true,
        ..fast
    };
    sequencer.update(0.15, &talking);
    assert_eq!(active(&sequencer, ChannelRole::Continuous).as_deref(), Some("Talk"));
    assert!((weight(&sequencer, "Talk") - 0.5).abs() < 1e-6);
    assert!((weight(&sequencer, "Idle") - 0.5).abs() < 1e-6);
    assert_eq!(clip_speed(&sequencer, "Talk"), Some(1.0));

    sequencer.update(0.15, &talking);
    assert_eq!(weight(&sequencer, "Talk"), 1.0);
    assert_eq!(clip_speed(&sequencer, "Talk"), Some(1.0));
    assert_eq!(clip_speed(&sequencer, "Idle"), None);

    sequencer.update(0.3, &fast);
    assert_eq!(active(&sequencer, ChannelRole::Continuous).as_deref(), Some("Idle"));
    assert_eq!(clip_speed(&sequencer, "Idle"), Some(2.0));
}

#[test]
fn unusable_speed_plays_at_normal_rate() {
    let mut sequencer = standard();

    for speed in [-1.0, 0.0, f64::NAN, f64::INFINITY] {
        sequencer.update(
            0.1,
            &SequencerInputs {
                speed,
                ..Default::default()
            },
        );
        assert_eq!(clip_speed(&sequencer, "Idle"), Some(1.0));
    }

    let idle = sequencer.mixer().key("Idle").unwrap();
    assert!(sequencer.mixer().get(idle).unwrap().player.local_time() >= 0.0);
}

#[test]
fn talking_cuts_gesture_and_restores_base() {
    let mut sequencer = sequencer(&[("Idle", 2.0), ("Talk", 1.0), ("Wave", 1.0)]);
    sequencer.update(0.5, &SequencerInputs::default());

    let wave = SequencerInputs {
        gesture: Some("Wave"),
        ..Default::default()
    };
    sequencer.update(0.1, &wave);
    assert_eq!(active(&sequencer, ChannelRole::Transient).as_deref(), Some("Wave"));

    let talking = SequencerInputs {
        is_talking: true,
        ..wave
    };
    let events = sequencer.update(0.1, &talking);
    assert_eq!(events.gesture_completed, None);
    assert_eq!(active(&sequencer, ChannelRole::Transient), None);
    assert_eq!(active(&sequencer, ChannelRole::Continuous).as_deref(), Some("Talk"));

    let events = sequencer.update(0.5, &talking);
    assert_eq!(events.gesture_completed, None);
    assert_eq!(clip_speed(&sequencer, "Wave"), None);
    assert_eq!(
        sequencer.channel(ChannelRole::Transient).fade_state,
        FadeState::Empty
    );

    let events = sequencer.update(0.1, &wave);
    assert_eq!(events.gesture_completed, None);
    assert!(!sequencer.is_talking());
    assert_eq!(active(&sequencer, ChannelRole::Continuous).as_deref(), Some("Idle"));

    sequencer.update(0.5, &wave);
    let weights = sequencer.clip_weights();
    assert_eq!(weights.len(), 1);
    assert_eq!(weights[0].clip, "Idle");
    assert_eq!(weights[0].weight, 1.0);
}

#[test]
fn expression_can_drive_a_clip() {
    let mut sequencer = sequencer(&[("Idle", 2.0), ("Happy_Dance", 1.0)]);
    sequencer.update(0.5, &SequencerInputs::default());

    sequencer.update(
        0.1,
        &SequencerInputs {
            expression: Some("happy"),
            ..Default::default()
        },
    );

    let continuous = sequencer.channel(ChannelRole::Continuous);
    assert_eq!(continuous.active_clip.as_deref(), Some("Happy_Dance"));
    assert_eq!(continuous.requested_symbol.as_deref(), Some("happy"));
    // outgoing over 0.2s rather than the 0.3s crossfade
    assert!((weight(&sequencer, "Idle") - 0.5).abs() < 1e-6);
}

#[test]
fn expression_without_clip_leaves_animation_alone() {
    let mut sequencer = standard();
    sequencer.update(
        0.1,
        &SequencerInputs {
            expression: Some("sad"),
            ..Default::default()
        },
    );
    let continuous = sequencer.channel(ChannelRole::Continuous);
    assert_eq!(continuous.active_clip.as_deref(), Some("Idle"));
    assert_eq!(continuous.requested_symbol.as_deref(), Some("idle"));
}

#[test]
fn channels_stay_exclusive() {
    let mut sequencer = sequencer(&[
        ("Idle", 2.0),
        ("Walk", 1.0),
        ("Run", 0.8),
        ("Wave", 0.6),
        ("Nod", 0.4),
        ("Talk", 1.0),
    ]);

    let animations = [None, Some("Idle"), Some("Walk"), Some("Run"), Some("Swim")];
    let gestures = [None, Some("Wave"), Some("Nod"), Some("Bow")];

    let mut state = 0x2545_f491_4f6c_dd1du64;
    let mut next = |n: usize| {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % n as u64) as usize
    };

    for _ in 0..500 {
        let inputs = SequencerInputs {
            animation: animations[next(animations.len())],
            gesture: gestures[next(gestures.len())],
            is_talking: next(6) == 0,
            speed: 1.0,
            expression: None,
        };
        sequencer.update(0.05 + next(10) as f64 * 0.02, &inputs);

        let mixer = sequencer.mixer();
        let steady = sequencer
            .clip_weights()
            .iter()
            .filter_map(|weight| mixer.get(mixer.key(&weight.clip)?))
            .filter(|action| !action.is_fading_out())
            .count();
        assert!(steady <= 2, "{steady} clips not fading out");

        for role in [ChannelRole::Continuous, ChannelRole::Transient] {
            if let Some(clip) = sequencer.channel(role).active_clip {
                let action = mixer.get(mixer.key(&clip).unwrap()).unwrap();
                assert!(action.is_enabled(), "{role} clip {clip} is disabled");
            }
        }
    }
}
