/// The bus and the session context, wired together.
use crate::assets::Assets;
use crate::bus::{EventBus, Message, Outbox, Topic};
use crate::compute;
use crate::display;
use crate::handlers;
use crate::session::{GameState, Phase};
use crate::surface::Surface;

pub struct Game {
    pub state: GameState,
    bus: EventBus<GameState>,
}

impl Game {
    /// A game on a `width`×`height` field with every handler installed.
    pub fn new(width: i32, height: i32) -> Game {
        let mut bus = EventBus::new();
        handlers::install(&mut bus);
        Game {
            state: compute::init_state(width, height),
            bus,
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn publish(&mut self, message: Message) -> usize {
        self.bus.publish(&mut self.state, message)
    }

    /// Add an extra subscriber after the game handlers.
    pub fn subscribe<F>(&mut self, topic: Topic, handler: F)
    where
        F: FnMut(&Message, &mut GameState, &mut Outbox) + 'static,
    {
        self.bus.subscribe(topic, handler);
    }

    /// Update half of a render tick: the collision & state pass, skipped
    /// while paused.  Returns whether the pass ran.
    pub fn update(&mut self) -> bool {
        match self.state.phase() {
            Phase::Playing => {
                compute::tick(&mut self.state, &mut self.bus);
                true
            }
            _ => false,
        }
    }

    /// One fixed-interval render tick: draw the scene, then update.
    pub fn render_tick<S: Surface>(&mut self, surface: &mut S, assets: &Assets) -> bool {
        display::render(surface, &self.state, assets);
        self.update()
    }
}
