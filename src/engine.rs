use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;
use std::rc::Rc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cache::CleanCache;
use crate::compile::RuleCompilation;
use crate::error::SUPERSEDED_CLASSIFICATION;
use crate::evaluate;
use crate::operation::{OperationController, Tick};
use crate::{
    CompiledRule, ConfigError, EngineConfig, EngineError, Item, MatchEvent, ReportItem,
};

/// Message carried by operations cancelled because the engine was torn down.
pub const TORN_DOWN_MESSAGE: &str = "Engine torn down";

/// Cooperative classification engine.
///
/// Owns the live rule set and the clean cache. Rule updates and
/// classifications run as tick-driven operations on the current thread: the
/// futures returned here make progress only while polled, typically from a
/// tokio current-thread runtime or `LocalSet`. At most one rule update and one
/// classification are alive at a time; starting another supersedes the old
/// one.
///
/// ```
/// use itemsieve::{Engine, Item, RuleSpec};
///
/// # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
/// let engine = Engine::default();
/// engine.set_rules(vec![RuleSpec::glob("*.tmp")]).await.unwrap();
///
/// let report = engine
///     .classify_report(vec![Item::new("a", "x.tmp"), Item::new("b", "x.txt")])
///     .await
///     .unwrap();
/// assert_eq!(report[0].matches()[0].label(), "*.tmp");
/// assert!(report[1].is_clean());
/// assert!(engine.is_cached("b"));
/// # });
/// ```
pub struct Engine {
    config: EngineConfig,
    state: Rc<RefCell<State>>,
    compiler: OperationController,
    classifier: OperationController,
}

struct State {
    rules: Rc<[CompiledRule]>,
    cache: CleanCache,
    subscribers: Vec<mpsc::UnboundedSender<MatchEvent>>,
    torn_down: bool,
}

impl State {
    fn publish(&mut self, rules: Rc<[CompiledRule]>) {
        self.rules = rules;
        self.cache.clear();
    }

    fn emit(&mut self, event: MatchEvent) {
        debug!(key = %event.key, verdict = %event.verdict, "match");
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl Engine {
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `config` fails validation.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: EngineConfig) -> Self {
        let state = State {
            rules: Rc::from(Vec::new()),
            cache: CleanCache::with_capacity(config.cache_capacity),
            subscribers: Vec::new(),
            torn_down: false,
        };
        Self {
            config,
            state: Rc::new(RefCell::new(state)),
            compiler: OperationController::new("rule-compilation", || EngineError::Superseded),
            classifier: OperationController::new("classification", || {
                EngineError::Cancelled(SUPERSEDED_CLASSIFICATION.to_owned())
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Snapshot of the live rule set.
    #[must_use]
    pub fn rules(&self) -> Rc<[CompiledRule]> {
        Rc::clone(&self.state.borrow().rules)
    }

    #[must_use]
    pub fn is_cached(&self, key: &str) -> bool {
        self.state.borrow().cache.contains(key)
    }

    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.state.borrow().cache.len()
    }

    /// Whether a rule update or classification is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.compiler.is_active() || self.classifier.is_active()
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.state.borrow().torn_down
    }

    fn ensure_live(&self) -> Result<(), EngineError> {
        if self.is_torn_down() {
            return Err(EngineError::TornDown);
        }
        Ok(())
    }

    /// Receive every match emitted by streaming classifications.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TornDown`] after [`teardown`](Self::teardown).
    pub fn subscribe(&self) -> Result<mpsc::UnboundedReceiver<MatchEvent>, EngineError> {
        self.ensure_live()?;
        let (tx, rx) = mpsc::unbounded_channel();
        self.state.borrow_mut().subscribers.push(tx);
        Ok(rx)
    }

    /// Replace the live rule set.
    ///
    /// On call, any rule update still validating is superseded (its future
    /// fails with [`EngineError::Superseded`]) and the live rule set and
    /// clean cache are emptied. The specifications are then compiled one per
    /// tick; the new rule set is published, and the cache cleared again, only
    /// once every one of them compiled. On a validation failure the live rule
    /// set stays empty.
    pub fn set_rules<I>(
        &self,
        specs: I,
    ) -> impl Future<Output = Result<(), EngineError>> + use<I>
    where
        I: IntoIterator,
        I::Item: Into<serde_json::Value>,
    {
        let specs: Vec<serde_json::Value> = specs.into_iter().map(Into::into).collect();
        let started = self.ensure_live().map(|()| {
            let total = specs.len();
            let state = Rc::clone(&self.state);
            let mut compilation = RuleCompilation::new(specs);
            let op = self.compiler.start(
                self.config.compile_interval(),
                move |tick: &mut Tick<()>| {
                    if let Some(rules) = compilation.step()? {
                        info!(rules = rules.len(), "publishing rule set");
                        state.borrow_mut().publish(rules);
                        tick.complete(());
                    }
                    Ok(())
                },
            );
            self.state.borrow_mut().publish(Rc::from(Vec::new()));
            debug!(specs = total, "validating rule update");
            op
        });
        async move { started?.await }
    }

    /// Classify `items` one per tick, pushing matches to subscribers.
    ///
    /// Items already known clean are skipped. The first matching rule wins
    /// for each item; items matching nothing are cached as clean. Supersedes
    /// any running classification.
    pub fn classify_streaming(
        &self,
        items: Vec<Item>,
    ) -> impl Future<Output = Result<(), EngineError>> + use<> {
        let started = self.ensure_live().map(|()| {
            let state = Rc::clone(&self.state);
            let mut pending = VecDeque::from(items);
            debug!(items = pending.len(), "streaming classification");
            self.classifier.start(
                self.config.stream_interval(),
                move |tick: &mut Tick<()>| {
                    if let Some(item) = pending.pop_front() {
                        let mut state = state.borrow_mut();
                        let state = &mut *state;
                        if let Some(verdict) =
                            evaluate::classify_first(&state.rules, &mut state.cache, &item)
                        {
                            state.emit(MatchEvent {
                                key: item.key,
                                verdict,
                            });
                        }
                    }
                    if pending.is_empty() {
                        tick.complete(());
                    }
                    Ok(())
                },
            )
        });
        async move { started?.await }
    }

    /// Classify `items` in chunks and resolve with one row per item.
    ///
    /// Every rule is evaluated for every item. Supersedes any running
    /// classification.
    pub fn classify_report(
        &self,
        items: Vec<Item>,
    ) -> impl Future<Output = Result<Vec<ReportItem>, EngineError>> + use<> {
        let started = self.ensure_live().map(|()| {
            let state = Rc::clone(&self.state);
            let chunk = self.config.report_chunk_size;
            let mut report = Vec::with_capacity(items.len());
            let mut pending = VecDeque::from(items);
            debug!(items = pending.len(), chunk, "batch classification");
            self.classifier.start(
                self.config.report_interval(),
                move |tick: &mut Tick<Vec<ReportItem>>| {
                    let mut state = state.borrow_mut();
                    let state = &mut *state;
                    let take = chunk.min(pending.len());
                    for item in pending.drain(..take) {
                        report.push(evaluate::classify_all(&state.rules, &mut state.cache, item));
                    }
                    if pending.is_empty() {
                        tick.complete(std::mem::take(&mut report));
                    }
                    Ok(())
                },
            )
        });
        async move { started?.await }
    }

    /// Abort the running classification and any rule update still
    /// validating. Returns whether anything was aborted.
    pub fn abort(&self, message: Option<&str>) -> bool {
        if self.is_torn_down() {
            return false;
        }
        let classification = self.classifier.abort(message);
        let compilation = self.compiler.abort(message);
        classification || compilation
    }

    /// Cancel in-flight work, drop rules, cache and subscribers, and make
    /// every later call fail with [`EngineError::TornDown`].
    pub fn teardown(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.torn_down {
                return;
            }
            state.torn_down = true;
            state.publish(Rc::from(Vec::new()));
            state.subscribers.clear();
        }
        let reason = EngineError::Cancelled(TORN_DOWN_MESSAGE.to_owned());
        self.classifier.cancel_with(reason.clone());
        self.compiler.cancel_with(reason);
        info!("engine torn down");
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.teardown();
    }
}
