use std::rc::Rc;
use std::vec;

use serde_json::Value;
use tracing::trace;

use crate::{CompiledRule, EngineError};

/// Incremental compilation of a batch of rule specifications.
///
/// Each [`step`](Self::step) validates and compiles one specification into a
/// private buffer. The finished rule set is only handed out once every
/// specification compiled; a failure discards the buffer.
pub(crate) struct RuleCompilation {
    pending: std::iter::Enumerate<vec::IntoIter<Value>>,
    compiled: Vec<CompiledRule>,
}

impl RuleCompilation {
    pub(crate) fn new(specs: Vec<Value>) -> Self {
        let compiled = Vec::with_capacity(specs.len());
        Self {
            pending: specs.into_iter().enumerate(),
            compiled,
        }
    }

    /// Compile the next specification.
    ///
    /// Returns `Ok(Some(rules))` once the whole batch is compiled (immediately
    /// for an empty batch) and `Ok(None)` while specifications remain.
    pub(crate) fn step(&mut self) -> Result<Option<Rc<[CompiledRule]>>, EngineError> {
        if let Some((index, spec)) = self.pending.next() {
            let rule = CompiledRule::compile(&spec).map_err(|source| {
                self.compiled.clear();
                EngineError::Validation { index, source }
            })?;
            trace!(index, label = rule.label(), "compiled rule");
            self.compiled.push(rule);
        }

        if self.pending.len() > 0 {
            return Ok(None);
        }
        Ok(Some(std::mem::take(&mut self.compiled).into()))
    }
}
