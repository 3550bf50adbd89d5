//! Symbolic name resolution.
//!
//! Requests like "wave" or "happy" are matched against whatever names the loaded
//! asset happens to expose. The fallback chain is, first match wins:
//!
//! 1. exact, case-sensitive
//! 2. exact, case-insensitive
//! 3. bidirectional lowercase substring, in candidate order
//! 4. [`ResolveMode::Default`] only: the first candidate
//!
//! A miss means the capability is absent. It is never an error.

use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    Strict,
    /// Falls back to the first candidate when nothing matches.
    Default,
}

/// Resolves `symbol` against `candidates`.
///
/// Blank symbols never match by name (they'd otherwise be a substring of
/// everything), but still take the first candidate in [`ResolveMode::Default`].
pub fn resolve<'a, I>(symbol: &str, candidates: I, mode: ResolveMode) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: Clone,
{
    let candidates = candidates.into_iter();
    let symbol = symbol.trim();

    if !symbol.is_empty() {
        if let Some(found) = resolve_by_name(symbol, candidates.clone()) {
            return Some(found);
        }
    }

    match mode {
        ResolveMode::Strict => None,
        ResolveMode::Default => candidates.clone().next(),
    }
}

/// Tries each alias in order, running the full name chain for one alias before
/// moving to the next.
pub fn resolve_aliased<'a, 'b, I>(
    aliases: impl IntoIterator<Item = &'b str>,
    candidates: I,
) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: Clone,
{
    let candidates = candidates.into_iter();
    aliases
        .into_iter()
        .find_map(|alias| resolve(alias, candidates.clone(), ResolveMode::Strict))
}

fn resolve_by_name<'a>(
    symbol: &str,
    candidates: impl Iterator<Item = &'a str> + Clone,
) -> Option<&'a str> {
    if let Some(found) = candidates.clone().find(|name| *name == symbol) {
        return Some(found);
    }

    let lower = symbol.to_lowercase();

    if let Some(found) = candidates
        .clone()
        .find(|name| name.to_lowercase() == lower)
    {
        return Some(found);
    }

    candidates.clone().find(|name| {
        let name = name.to_lowercase();
        !name.is_empty() && (name.contains(&lower) || lower.contains(&name))
    })
}

/// Expression symbol to the names tried for it, in order.
///
/// Keys are matched case-insensitively. Unknown symbols resolve as themselves.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ExpressionAliases(IndexMap<String, Vec<String>>);

impl ExpressionAliases {
    pub fn empty() -> Self {
        Self(IndexMap::new())
    }

    pub fn insert(&mut self, symbol: &str, aliases: impl IntoIterator<Item = impl Into<String>>) {
        self.0.insert(
            symbol.to_lowercase(),
            aliases.into_iter().map(Into::into).collect(),
        );
    }

    pub fn aliases_for<'a>(&'a self, symbol: &'a str) -> Vec<&'a str> {
        match self.0.get(&symbol.trim().to_lowercase()) {
            Some(aliases) => aliases.iter().map(String::as_str).collect(),
            None => vec![symbol],
        }
    }
}

impl Default for ExpressionAliases {
    fn default() -> Self {
        let mut aliases = Self::empty();
        aliases.insert("happy", ["happy", "smile", "joy", "cheerful"]);
        aliases.insert("sad", ["sad", "sorrow", "unhappy", "frown"]);
        aliases.insert("angry", ["angry", "mad", "furious", "rage"]);
        aliases.insert("surprised", ["surprised", "surprise", "shocked", "amazed"]);
        aliases.insert("excited", ["excited", "enthusiastic", "thrilled", "elated"]);
        aliases.insert("neutral", ["neutral", "default", "normal", "rest"]);
        aliases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIPS: [&str; 3] = ["Idle", "Walk", "Wave"];

    #[test]
    fn exact_beats_case_insensitive() {
        let names = ["idle", "Idle"];
        assert_eq!(
            resolve("Idle", names, ResolveMode::Strict),
            Some("Idle")
        );
        assert_eq!(
            resolve("IDLE", names, ResolveMode::Strict),
            Some("idle")
        );
    }

    #[test]
    fn case_insensitive_beats_substring() {
        let names = ["talk_loop", "Talk"];
        assert_eq!(resolve("talk", names, ResolveMode::Strict), Some("Talk"));
    }

    #[test]
    fn substring_is_bidirectional() {
        assert_eq!(
            resolve("Talk", ["idle_01", "talk_loop"], ResolveMode::Strict),
            Some("talk_loop")
        );
        // the candidate is contained in the symbol
        assert_eq!(
            resolve("waveHello", CLIPS, ResolveMode::Strict),
            Some("Wave")
        );
    }

    #[test]
    fn substring_takes_first_in_order() {
        assert_eq!(
            resolve("smile", ["smile_L", "smile_R"], ResolveMode::Strict),
            Some("smile_L")
        );
    }

    #[test]
    fn miss_is_none() {
        assert_eq!(resolve("Run", CLIPS, ResolveMode::Strict), None);
        assert_eq!(resolve("Run", [] as [&str; 0], ResolveMode::Default), None);
    }

    #[test]
    fn default_mode_falls_back_to_first() {
        assert_eq!(
            resolve("idle", ["Dance", "Walk"], ResolveMode::Default),
            Some("Dance")
        );
        assert_eq!(
            resolve("idle", ["Dance", "Walk"], ResolveMode::Strict),
            None
        );
    }

    #[test]
    fn blank_symbol_never_matches_by_name() {
        assert_eq!(resolve("", CLIPS, ResolveMode::Strict), None);
        assert_eq!(resolve("   ", CLIPS, ResolveMode::Strict), None);
        assert_eq!(resolve("", CLIPS, ResolveMode::Default), Some("Idle"));
    }

    #[test]
    fn empty_candidate_is_not_a_substring_hit() {
        assert_eq!(resolve("wave", ["", "Wave"], ResolveMode::Strict), Some("Wave"));
    }

    #[test]
    fn deterministic() {
        let names = ["smile_L", "smile_R", "joy", "Happy_Face"];
        let first = resolve("happy", names, ResolveMode::Strict);
        for _ in 0..10 {
            assert_eq!(resolve("happy", names, ResolveMode::Strict), first);
        }
        assert_eq!(first, Some("Happy_Face"));
    }

    #[test]
    fn aliases_are_tried_in_order() {
        let aliases = ExpressionAliases::default();
        let morphs = ["smile_L", "smile_R"];

        assert_eq!(
            resolve_aliased(aliases.aliases_for("happy"), morphs),
            Some("smile_L")
        );
        // "joy" would also hit, but "smile" comes first
        assert_eq!(
            resolve_aliased(aliases.aliases_for("Happy"), ["joy", "smile"]),
            Some("smile")
        );
    }

    #[test]
    fn unknown_expression_resolves_as_itself() {
        let aliases = ExpressionAliases::default();
        assert_eq!(aliases.aliases_for("wink"), vec!["wink"]);
        assert_eq!(
            resolve_aliased(aliases.aliases_for("wink"), ["blink", "Wink_L"]),
            Some("Wink_L")
        );
    }

    #[test]
    fn custom_aliases_override() {
        let mut aliases = ExpressionAliases::empty();
        aliases.insert("Happy", ["grin"]);
        assert_eq!(aliases.aliases_for("happy"), vec!["grin"]);
        assert_eq!(resolve_aliased(aliases.aliases_for("happy"), ["smile"]), None);
    }
}
