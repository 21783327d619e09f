use starship_commander::bus::*;
use starship_commander::entities::EntityId;

/// Handlers append to this so ordering is observable.
type Log = Vec<String>;

// ── Delivery ──────────────────────────────────────────────────────────────────

#[test]
fn handlers_run_in_subscription_order() {
    let mut bus: EventBus<Log> = EventBus::new();
    bus.subscribe(Topic::HeroFire, |_, log: &mut Log, _| log.push("first".into()));
    bus.subscribe(Topic::HeroFire, |_, log: &mut Log, _| log.push("second".into()));
    bus.subscribe(Topic::HeroFire, |_, log: &mut Log, _| log.push("third".into()));

    let mut log = Log::new();
    let delivered = bus.publish(&mut log, Message::HeroFire);

    assert_eq!(delivered, 3);
    assert_eq!(log, vec!["first", "second", "third"]);
}

#[test]
fn publish_without_subscribers_is_a_no_op() {
    let mut bus: EventBus<Log> = EventBus::new();
    bus.subscribe(Topic::HeroFire, |_, log: &mut Log, _| log.push("fire".into()));

    let mut log = Log::new();
    assert_eq!(bus.publish(&mut log, Message::GamePause), 0);
    assert!(log.is_empty());
}

#[test]
fn only_matching_topic_is_delivered() {
    let mut bus: EventBus<Log> = EventBus::new();
    bus.subscribe(Topic::GameEndWin, |_, log: &mut Log, _| log.push("win".into()));
    bus.subscribe(Topic::GameEndLoss, |_, log: &mut Log, _| log.push("loss".into()));

    let mut log = Log::new();
    bus.publish(&mut log, Message::GameEndLoss);
    assert_eq!(log, vec!["loss"]);
}

#[test]
fn handler_sees_payload() {
    let mut bus: EventBus<Log> = EventBus::new();
    bus.subscribe(Topic::CollisionProjectileEnemy, |msg, log: &mut Log, _| {
        if let Message::CollisionProjectileEnemy { projectile, enemy } = msg {
            log.push(format!("{}->{}", projectile.0, enemy.0));
        }
    });

    let mut log = Log::new();
    bus.publish(
        &mut log,
        Message::CollisionProjectileEnemy {
            projectile: EntityId(4),
            enemy: EntityId(9),
        },
    );
    assert_eq!(log, vec!["4->9"]);
}

#[test]
fn follow_up_messages_are_delivered_before_publish_returns() {
    let mut bus: EventBus<Log> = EventBus::new();
    bus.subscribe(Topic::CollisionEnemyPlayer, |_, log: &mut Log, out| {
        log.push("hit".into());
        out.publish(Message::GameEndLoss);
    });
    bus.subscribe(Topic::CollisionEnemyPlayer, |_, log: &mut Log, _| {
        log.push("hit-2".into());
    });
    bus.subscribe(Topic::GameEndLoss, |_, log: &mut Log, _| log.push("loss".into()));

    let mut log = Log::new();
    let delivered = bus.publish(
        &mut log,
        Message::CollisionEnemyPlayer { enemy: EntityId(1) },
    );

    // The follow-up waits for the current message's handlers to finish.
    assert_eq!(log, vec!["hit", "hit-2", "loss"]);
    assert_eq!(delivered, 3);
}

#[test]
fn handlers_keep_their_own_state() {
    let mut bus: EventBus<Log> = EventBus::new();
    let mut calls = 0;
    bus.subscribe(Topic::KeyUp, move |_, log: &mut Log, _| {
        calls += 1;
        log.push(calls.to_string());
    });

    let mut log = Log::new();
    bus.publish(&mut log, Message::KeyUp);
    bus.publish(&mut log, Message::KeyUp);
    assert_eq!(log, vec!["1", "2"]);
}

// ── Registration ──────────────────────────────────────────────────────────────

#[test]
fn subscriber_count_tracks_registrations() {
    let mut bus: EventBus<Log> = EventBus::new();
    assert_eq!(bus.subscriber_count(Topic::GameStart), 0);
    bus.subscribe(Topic::GameStart, |_, _: &mut Log, _| {});
    bus.subscribe(Topic::GameStart, |_, _: &mut Log, _| {});
    assert_eq!(bus.subscriber_count(Topic::GameStart), 2);
    assert_eq!(bus.subscriber_count(Topic::GamePause), 0);
}

#[test]
fn message_topics_and_names() {
    assert_eq!(Message::HeroFire.topic(), Topic::HeroFire);
    assert_eq!(
        Message::EnemyOutOfBounds { enemy: EntityId(0) }.topic(),
        Topic::EnemyOutOfBounds
    );
    assert_eq!(Topic::GameEndLoss.name(), "GAME_END_LOSS");
    assert_eq!(Topic::HeroSpeedLeft.name(), "HERO_MOVING_LEFT");
}
