//! Controller — owns the whole control core and runs one tick at a time.

use std::collections::BTreeMap;

use domotik_domain::device::DeviceDescriptor;
use domotik_domain::error::{DomotikError, NotFoundError};
use domotik_domain::id::{DeviceId, RuleId};
use domotik_domain::reading::Reading;
use domotik_domain::rule::{ActionKind, Rule};
use domotik_domain::time::Millis;

use crate::cache::ReadingCache;
use crate::ports::{Board, Clock};
use crate::registry::{AggregateStatus, DeviceRegistry};
use crate::rule_engine::RuleEngine;

/// What happened during one [`Controller::advance`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub now: Millis,
    /// Readings written to (or evicted from) the cache.
    pub readings: usize,
    pub activated: Vec<RuleId>,
    pub deactivated: Vec<RuleId>,
}

/// Single-threaded control loop state.
///
/// Each tick performs, in order: sensor polling into the cache, rule
/// evaluation, then actuator timer and pattern advancement.
pub struct Controller<B, C> {
    board: B,
    clock: C,
    registry: DeviceRegistry,
    cache: ReadingCache,
    engine: RuleEngine,
}

impl<B, C> Controller<B, C>
where
    B: Board,
    C: Clock,
{
    /// Build the registry and load the rules.
    ///
    /// # Errors
    ///
    /// Returns a validation error for invalid descriptors or rules, or the
    /// board's error if a pin cannot be opened.
    pub fn new(
        descriptors: &[DeviceDescriptor],
        rules: Vec<Rule>,
        mut board: B,
        clock: C,
    ) -> Result<Self, DomotikError> {
        let registry = DeviceRegistry::build(descriptors, &mut board, clock.now_ms())?;
        let engine = RuleEngine::new(rules)?;
        Ok(Self {
            board,
            clock,
            registry,
            cache: ReadingCache::new(),
            engine,
        })
    }

    /// Run one tick.
    pub fn advance(&mut self) -> TickReport {
        let now = self.clock.now_ms();
        let readings = self.registry.poll(now, &mut self.cache);
        let evaluation = self.engine.evaluate(&self.cache, &mut self.registry, now);
        self.registry.advance_actuators(now);

        TickReport {
            now,
            readings,
            activated: evaluation.activated,
            deactivated: evaluation.deactivated,
        }
    }

    /// Currently trusted readings, by sensor id.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<DeviceId, Reading> {
        self.cache.snapshot()
    }

    /// Apply a manual command to one actuator and return its new state.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] if no actuator has this id.
    #[tracing::instrument(skip(self))]
    pub fn command(&mut self, actuator_id: &str, kind: ActionKind) -> Result<bool, NotFoundError> {
        let now = self.clock.now_ms();
        self.registry.command(actuator_id, kind, now)
    }

    #[must_use]
    pub fn aggregate_status(&self) -> AggregateStatus {
        self.registry.aggregate_status()
    }

    /// Replace every device and rule.
    ///
    /// The new registry is built before anything is swapped. No pin is
    /// driven until every device has been opened, so on error the running
    /// configuration and its output levels stay in place.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Controller::new`].
    pub fn reload(
        &mut self,
        descriptors: &[DeviceDescriptor],
        rules: Vec<Rule>,
    ) -> Result<(), DomotikError> {
        let now = self.clock.now_ms();
        let engine = RuleEngine::new(rules)?;
        let registry = DeviceRegistry::build(descriptors, &mut self.board, now)?;
        self.registry = registry;
        self.engine = engine;
        self.cache.clear();
        tracing::info!("configuration reloaded");
        Ok(())
    }

    #[must_use]
    pub fn uptime(&self) -> Millis {
        self.clock.now_ms()
    }

    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    #[must_use]
    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    #[must_use]
    pub fn cache(&self) -> &ReadingCache {
        &self.cache
    }
}
