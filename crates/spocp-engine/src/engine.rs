//! The decision engine: rule ingestion, and the indexed/linear query
//! dispatch that must always agree.

use spocp_core::{leq, parse, Element, ParseError};
use spocp_store::{IndexStats, RuleStore};

use crate::controller::AdaptiveController;

/// Owns the rule store and the adaptive strategy decision. Not internally
/// synchronized — callers sharing an engine across threads guard it with
/// a single readers-writer lock (see `spocp-net`'s frontends).
#[derive(Debug, Default)]
pub struct DecisionEngine {
    store: RuleStore,
    controller: AdaptiveController,
    indexing_flag: bool,
    override_flag: Option<bool>,
}

impl DecisionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_controller(controller: AdaptiveController) -> Self {
        Self {
            controller,
            ..Self::default()
        }
    }

    /// Parse `text` as canonical form and add it as a rule. On a parse
    /// failure the store is left unchanged.
    pub fn add_rule_text(&mut self, text: &[u8]) -> Result<(), ParseError> {
        let element = parse(text)?;
        self.add_rule(element);
        Ok(())
    }

    pub fn add_rule(&mut self, element: Element) -> usize {
        let index = self.store.add(element);
        log::debug!("rule #{index} added, {} rule(s) total", self.store.len());
        let next_flag = self.controller.recompute(&self.store.stats());
        if next_flag != self.indexing_flag {
            log::info!(
                "adaptive controller switching indexing {}",
                if next_flag { "on" } else { "off" }
            );
        }
        self.indexing_flag = next_flag;
        self.override_flag = None;
        index
    }

    /// Forces the indexing strategy until the next `add_rule`, which
    /// recomputes the flag from statistics and clears the override.
    pub fn force_indexing(&mut self, enabled: bool) {
        log::info!("indexing strategy forced {}", if enabled { "on" } else { "off" });
        self.override_flag = Some(enabled);
    }

    pub fn is_indexing_active(&self) -> bool {
        self.override_flag.unwrap_or(self.indexing_flag)
    }

    pub fn clear(&mut self) {
        log::info!("clearing store, {} rule(s) dropped", self.store.len());
        self.store.clear();
        self.indexing_flag = false;
        self.override_flag = None;
    }

    pub fn rule_count(&self) -> usize {
        self.store.len()
    }

    pub fn index_stats(&self) -> IndexStats {
        self.store.stats()
    }

    /// True iff some stored rule `r` satisfies `leq(query, r)`.
    pub fn query(&self, query: &Element) -> bool {
        if !self.is_indexing_active() {
            return self.store.rules().iter().any(|rule| leq(query, rule));
        }
        match query {
            Element::List(list) => {
                if self.store.iter_tag_bucket(&list.tag).any(|rule| leq(query, rule)) {
                    return true;
                }
                // Always also scan the atom bucket: a bare Wildcard or
                // top-level atom rule must remain reachable from a List
                // query under the indexed path too, so indexed and
                // linear strategies agree unconditionally.
                self.store.iter_atom_bucket().any(|rule| leq(query, rule))
            }
            _ => self.store.iter_atom_bucket().any(|rule| leq(query, rule)),
        }
    }

    /// All stored rules satisfied by `query`, in insertion order.
    pub fn find_matching(&self, query: &Element) -> Vec<Element> {
        self.store
            .rules()
            .iter()
            .filter(|rule| leq(query, rule))
            .cloned()
            .collect()
    }
}
