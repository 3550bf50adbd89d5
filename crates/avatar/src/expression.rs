//! Expression morph targets.
//!
//! An expression is binary: the morph target it resolves to is at full
//! influence and every other channel on every mesh is at zero. Only channels
//! whose influence changed since the previous frame are reported as writes.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::{
    catalog::{AssetCatalog, MorphChannel},
    debug::{LogSlot, UniqueLog},
    resolve::{resolve_aliased, ExpressionAliases},
};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MorphWrite {
    pub channel: MorphChannel,
    pub influence: f32,
}

/// Influence per morph channel, in catalog channel order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlendVector(IndexMap<MorphChannel, f32>);

impl BlendVector {
    pub fn new(channels: &[MorphChannel]) -> Self {
        Self(channels.iter().map(|channel| (*channel, 0.0)).collect())
    }

    pub fn get(&self, channel: MorphChannel) -> Option<f32> {
        self.0.get(&channel).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MorphChannel, f32)> + '_ {
        self.0.iter().map(|(channel, influence)| (*channel, *influence))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn clear(&mut self) {
        self.0.values_mut().for_each(|influence| *influence = 0.0);
    }

    fn set(&mut self, channel: MorphChannel, influence: f32) {
        if let Some(slot) = self.0.get_mut(&channel) {
            *slot = influence;
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExpressionBlender {
    targets: IndexMap<String, MorphChannel>,
    aliases: ExpressionAliases,
    // symbol -> resolved channel, misses included
    cache: HashMap<String, Option<MorphChannel>>,
    current: BlendVector,
    previous: Option<BlendVector>,
    log: UniqueLog,
    warn_on_miss: bool,
}

impl ExpressionBlender {
    pub fn new(catalog: &AssetCatalog, aliases: ExpressionAliases, warn_on_miss: bool) -> Self {
        Self {
            targets: catalog
                .morph_names()
                .filter_map(|name| Some((name.to_string(), catalog.morph_channel(name)?)))
                .collect(),
            aliases,
            cache: HashMap::new(),
            current: BlendVector::new(catalog.channels()),
            previous: None,
            log: UniqueLog::default(),
            warn_on_miss,
        }
    }

    /// Recomputes the blend vector for this frame's expression and returns
    /// the influences that differ from last frame. The first call reports
    /// every channel.
    pub fn update(&mut self, expression: Option<&str>) -> Vec<MorphWrite> {
        self.current.clear();

        match expression.map(str::trim).filter(|symbol| !symbol.is_empty()) {
            Some(symbol) => {
                let channel = self.resolve(symbol);
                if let Some(channel) = channel {
                    self.current.set(channel, 1.0);
                }

                let warn_on_miss = self.warn_on_miss;
                self.log.on_change(LogSlot::ExpressionMorph, symbol, || match channel {
                    Some(channel) => {
                        tracing::debug!("expression {symbol:?} -> morph {channel:?}");
                    }
                    None if warn_on_miss => {
                        tracing::warn!("no morph target for expression {symbol:?}");
                    }
                    None => {
                        tracing::debug!("no morph target for expression {symbol:?}");
                    }
                });
            }
            None => self.log.forget(LogSlot::ExpressionMorph),
        }

        let writes = match &self.previous {
            Some(previous) => self
                .current
                .iter()
                .filter(|(channel, influence)| previous.get(*channel) != Some(*influence))
                .map(|(channel, influence)| MorphWrite { channel, influence })
                .collect(),
            None => self
                .current
                .iter()
                .map(|(channel, influence)| MorphWrite { channel, influence })
                .collect(),
        };

        self.previous = Some(self.current.clone());

        writes
    }

    pub fn influences(&self) -> &BlendVector {
        &self.current
    }

    fn resolve(&mut self, symbol: &str) -> Option<MorphChannel> {
        if let Some(cached) = self.cache.get(symbol) {
            return *cached;
        }

        let channel = resolve_aliased(
            self.aliases.aliases_for(symbol),
            self.targets.keys().map(String::as_str),
        )
        .and_then(|name| self.targets.get(name).copied());

        self.cache.insert(symbol.to_string(), channel);
        channel
    }
}
