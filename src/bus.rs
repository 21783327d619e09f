/// Publish/subscribe message bus.
///
/// Handlers are registered per `Topic` and invoked in subscription order,
/// synchronously, with a mutable reference to the shared context `C`.
/// A handler that needs to raise another message pushes it onto the
/// `Outbox`; queued messages are delivered (FIFO) before `publish` returns,
/// so follow-ups land in the same tick as their cause.
use std::collections::{HashMap, VecDeque};

use crate::entities::EntityId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topic {
    EnemyOutOfBounds,
    HeroSpeedLeft,
    HeroSpeedRight,
    HeroSpeedZero,
    HeroFire,
    GameEndLoss,
    GameEndWin,
    CollisionProjectileEnemy,
    CollisionEnemyPlayer,
    KeyUp,
    KeyDown,
    GameStart,
    GamePause,
    AssetsReady,
    TitleClick,
}

impl Topic {
    pub fn name(&self) -> &'static str {
        match self {
            Topic::EnemyOutOfBounds => "ENEMY_OUT_OF_BOUNDS",
            Topic::HeroSpeedLeft => "HERO_MOVING_LEFT",
            Topic::HeroSpeedRight => "HERO_MOVING_RIGHT",
            Topic::HeroSpeedZero => "HERO_SPEED_ZERO",
            Topic::HeroFire => "HERO_FIRE",
            Topic::GameEndLoss => "GAME_END_LOSS",
            Topic::GameEndWin => "GAME_END_WIN",
            Topic::CollisionProjectileEnemy => "COLLISION_ENEMY_PROJECTILE",
            Topic::CollisionEnemyPlayer => "COLLISION_ENEMY_PLAYER",
            Topic::KeyUp => "KEY_EVENT_UP",
            Topic::KeyDown => "KEY_EVENT_DOWN",
            Topic::GameStart => "GAME_START",
            Topic::GamePause => "GAME_PAUSE",
            Topic::AssetsReady => "ASSETS_READY",
            Topic::TitleClick => "TITLE_CLICK",
        }
    }
}

/// A message and its payload.  Entities travel as ids; handlers resolve
/// them against the context.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    EnemyOutOfBounds { enemy: EntityId },
    HeroSpeedLeft,
    HeroSpeedRight,
    HeroSpeedZero,
    HeroFire,
    GameEndLoss,
    GameEndWin,
    CollisionProjectileEnemy { projectile: EntityId, enemy: EntityId },
    CollisionEnemyPlayer { enemy: EntityId },
    KeyUp,
    KeyDown,
    GameStart,
    GamePause,
    AssetsReady,
    TitleClick,
}

impl Message {
    pub fn topic(&self) -> Topic {
        match self {
            Message::EnemyOutOfBounds { .. } => Topic::EnemyOutOfBounds,
            Message::HeroSpeedLeft => Topic::HeroSpeedLeft,
            Message::HeroSpeedRight => Topic::HeroSpeedRight,
            Message::HeroSpeedZero => Topic::HeroSpeedZero,
            Message::HeroFire => Topic::HeroFire,
            Message::GameEndLoss => Topic::GameEndLoss,
            Message::GameEndWin => Topic::GameEndWin,
            Message::CollisionProjectileEnemy { .. } => Topic::CollisionProjectileEnemy,
            Message::CollisionEnemyPlayer { .. } => Topic::CollisionEnemyPlayer,
            Message::KeyUp => Topic::KeyUp,
            Message::KeyDown => Topic::KeyDown,
            Message::GameStart => Topic::GameStart,
            Message::GamePause => Topic::GamePause,
            Message::AssetsReady => Topic::AssetsReady,
            Message::TitleClick => Topic::TitleClick,
        }
    }
}

/// Messages raised from inside a handler.
#[derive(Debug, Default)]
pub struct Outbox {
    queued: VecDeque<Message>,
}

impl Outbox {
    pub fn publish(&mut self, message: Message) {
        self.queued.push_back(message);
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }
}

pub type Handler<C> = Box<dyn FnMut(&Message, &mut C, &mut Outbox)>;

pub struct EventBus<C> {
    listeners: HashMap<Topic, Vec<Handler<C>>>,
}

impl<C> Default for EventBus<C> {
    fn default() -> Self {
        EventBus {
            listeners: HashMap::new(),
        }
    }
}

impl<C> EventBus<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, topic: Topic, handler: F)
    where
        F: FnMut(&Message, &mut C, &mut Outbox) + 'static,
    {
        self.listeners
            .entry(topic)
            .or_default()
            .push(Box::new(handler));
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.listeners.get(&topic).map_or(0, Vec::len)
    }

    /// Deliver `message` and everything its handlers raise.  Returns the
    /// number of handler invocations; zero means nobody was listening.
    pub fn publish(&mut self, ctx: &mut C, message: Message) -> usize {
        let mut outbox = Outbox::default();
        outbox.publish(message);

        let mut delivered = 0;
        while let Some(message) = outbox.queued.pop_front() {
            if let Some(handlers) = self.listeners.get_mut(&message.topic()) {
                for handler in handlers.iter_mut() {
                    handler(&message, ctx, &mut outbox);
                    delivered += 1;
                }
            }
        }
        delivered
    }
}
