use std::sync::Arc;

use approx::assert_relative_eq;
use gestik_gesture_core::{
    ChannelTrack, EmotionTrack, Gesture, GestureError, GesturePlayer, LivePose, LocomotionTrack,
    OverflowPolicy, PlayerConfig, SpeedLimits, TickOutcome, Trajectory,
};

fn motion(channel: &str, positions: Vec<f32>, times: Vec<f32>) -> ChannelTrack {
    ChannelTrack::Motion(
        Trajectory::new(channel, positions, times, SpeedLimits::default(), false).unwrap(),
    )
}

/// A half-second lift gesture.
fn quick_gesture(name: &str) -> Arc<Gesture> {
    Arc::new(
        Gesture::new(name)
            .with_channel("lift", motion("lift", vec![1.0], vec![0.5]))
            .unwrap(),
    )
}

fn live() -> LivePose {
    LivePose::default()
}

/// it should treat a tick with nothing queued as a no-op
#[test]
fn idle_tick_is_noop() {
    let mut player = GesturePlayer::new(PlayerConfig::default());
    assert_eq!(player.tick(0.02, &live()).unwrap(), TickOutcome::Idle);
    assert_eq!(player.tick(0.02, &live()).unwrap(), TickOutcome::Idle);
    assert!(!player.is_playing());
    assert_eq!(player.config(), [0.0; 4]);
}

/// it should play queued gestures in FIFO order through the full lifecycle
#[test]
fn fifo_order_and_lifecycle() {
    let mut player = GesturePlayer::new(PlayerConfig::default());
    player.play(quick_gesture("first")).unwrap();
    player.play(quick_gesture("second")).unwrap();
    assert_eq!(player.pending_len(), 2);

    assert_eq!(
        player.tick(0.2, &live()).unwrap(),
        TickOutcome::Started {
            gesture: "first".into()
        }
    );
    assert!(player.is_playing());

    assert!(matches!(
        player.tick(0.2, &live()).unwrap(),
        TickOutcome::Frame(_)
    ));
    assert!(matches!(
        player.tick(0.2, &live()).unwrap(),
        TickOutcome::Frame(_)
    ));
    assert_eq!(
        player.tick(0.2, &live()).unwrap(),
        TickOutcome::Finished {
            gesture: "first".into()
        }
    );
    assert!(!player.is_playing());

    assert_eq!(
        player.tick(0.2, &live()).unwrap(),
        TickOutcome::Started {
            gesture: "second".into()
        }
    );
}

/// it should raise the playback flags while framing and clear them on finish
#[test]
fn flags_follow_playback() {
    let mut player = GesturePlayer::new(PlayerConfig::default());
    player.play(quick_gesture("wave")).unwrap();

    player.tick(0.2, &live()).unwrap(); // started
    assert!(!player.animation_running());

    player.tick(0.2, &live()).unwrap(); // first frame
    assert!(player.animation_running());
    assert!(player.vocalize());

    player.tick(0.2, &live()).unwrap();
    player.tick(0.2, &live()).unwrap(); // finished
    assert!(!player.animation_running());
    assert!(!player.vocalize());
}

/// it should restore ambient emotion levels once the gesture retires
#[test]
fn emotion_restored_after_finish() {
    let gesture = Arc::new(
        Gesture::new("cheer")
            .with_channel("lift", motion("lift", vec![1.0], vec![0.5]))
            .unwrap()
            .with_channel("valence", ChannelTrack::Emotion(EmotionTrack::new(0.9)))
            .unwrap(),
    );
    let mut player = GesturePlayer::new(PlayerConfig::default());
    player.play(gesture).unwrap();

    let ambient = LivePose {
        emotion: [0.5, 0.4],
        ..LivePose::default()
    };
    player.tick(0.2, &ambient).unwrap(); // started
    player.tick(0.2, &ambient).unwrap(); // frame
    assert_relative_eq!(player.emotion()[0], 0.9, epsilon = 1e-6);
    assert_relative_eq!(player.emotion()[1], 0.4, epsilon = 1e-6);

    player.tick(0.2, &ambient).unwrap();
    player.tick(0.2, &ambient).unwrap(); // finished
    assert_eq!(player.emotion(), [0.5, 0.4]);
}

/// it should seed motion from the live pose, not a canned rest pose
#[test]
fn starts_from_live_pose() {
    let gesture = Arc::new(
        Gesture::new("raise")
            .with_channel("lift", motion("lift", vec![1.0], vec![1.0]))
            .unwrap(),
    );
    let mut player = GesturePlayer::new(PlayerConfig::default());
    player.play(gesture).unwrap();

    let pose = LivePose {
        kinematic: [0.0, 0.5, 0.0, 0.0],
        ..LivePose::default()
    };
    player.tick(0.1, &pose).unwrap(); // started, seeded at lift=0.5
    match player.tick(0.5, &pose).unwrap() {
        TickOutcome::Frame(frame) => {
            // halfway from 0.5 to 1.0
            assert_relative_eq!(frame.kinematic[1], 0.75, epsilon = 1e-5);
        }
        other => panic!("expected a frame, got {other:?}"),
    }
}

/// it should reject new gestures at capacity under the Reject policy
#[test]
fn overflow_reject_refuses() {
    let mut player = GesturePlayer::new(PlayerConfig {
        queue_capacity: 1,
        overflow: OverflowPolicy::Reject,
    });
    player.play(quick_gesture("a")).unwrap();
    let err = player.play(quick_gesture("b")).unwrap_err();
    assert!(matches!(err, GestureError::QueueFull { capacity: 1 }));
    assert_eq!(player.pending_len(), 1);
}

/// it should evict the oldest pending gesture under DropOldest
#[test]
fn overflow_drop_oldest_evicts() {
    let mut player = GesturePlayer::new(PlayerConfig {
        queue_capacity: 1,
        overflow: OverflowPolicy::DropOldest,
    });
    player.play(quick_gesture("stale")).unwrap();
    player.play(quick_gesture("fresh")).unwrap();
    assert_eq!(player.pending_len(), 1);

    assert_eq!(
        player.tick(0.1, &live()).unwrap(),
        TickOutcome::Started {
            gesture: "fresh".into()
        }
    );
}

/// it should surface a start failure and stay Idle with the queue intact
#[test]
fn failed_start_keeps_player_idle() {
    let bad = Arc::new(
        Gesture::new("snap")
            .with_channel("yaw", motion("yaw", vec![5.0], vec![0.0]))
            .unwrap(),
    );
    let mut player = GesturePlayer::new(PlayerConfig::default());
    player.play(bad).unwrap();
    player.play(quick_gesture("good")).unwrap();

    assert!(player.tick(0.1, &live()).is_err());
    assert!(!player.is_playing());

    // the bad gesture was dropped; the next tick starts the good one
    assert_eq!(
        player.tick(0.1, &live()).unwrap(),
        TickOutcome::Started {
            gesture: "good".into()
        }
    );
}

/// it should clean up like a natural finish when cancelled mid-flight
#[test]
fn cancel_restores_ambient_state() {
    let gesture = Arc::new(
        Gesture::new("long")
            .with_channel("lift", motion("lift", vec![1.0], vec![10.0]))
            .unwrap()
            .with_channel("arousal", ChannelTrack::Emotion(EmotionTrack::new(0.9)))
            .unwrap(),
    );
    let mut player = GesturePlayer::new(PlayerConfig::default());
    player.play(gesture).unwrap();

    let ambient = LivePose {
        emotion: [0.5, 0.5],
        ..LivePose::default()
    };
    player.tick(0.1, &ambient).unwrap();
    player.tick(0.1, &ambient).unwrap();
    assert!(player.animation_running());

    player.cancel();
    assert!(!player.is_playing());
    assert!(!player.animation_running());
    assert_eq!(player.emotion(), [0.5, 0.5]);
    assert_eq!(player.cmd_vel(), [0.0, 0.0]);
}

/// it should zero the locomotion command when a driving gesture retires
#[test]
fn cmd_vel_zeroed_after_finish() {
    let gesture = Arc::new(
        Gesture::new("scoot")
            .with_channel(
                "x_vel",
                ChannelTrack::Locomotion(
                    LocomotionTrack::new("x_vel", vec![0.4, 0.0], vec![0.5, 1.0]).unwrap(),
                ),
            )
            .unwrap(),
    );
    let mut player = GesturePlayer::new(PlayerConfig::default());
    player.play(gesture).unwrap();

    player.tick(0.3, &live()).unwrap(); // started
    player.tick(0.3, &live()).unwrap(); // t=0.3, implicit zero command
    match player.tick(0.3, &live()).unwrap() {
        TickOutcome::Frame(frame) => {
            assert_relative_eq!(frame.locomotion[0], 0.4, epsilon = 1e-6)
        }
        other => panic!("expected a frame, got {other:?}"),
    }
    assert_eq!(player.cmd_vel(), [0.4, 0.0]);

    player.tick(0.3, &live()).unwrap(); // t=0.9, still inside the schedule
    assert!(matches!(
        player.tick(0.3, &live()).unwrap(),
        TickOutcome::Finished { .. }
    ));
    assert_eq!(player.cmd_vel(), [0.0, 0.0]);
}
