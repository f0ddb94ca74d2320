use crate::cache::CleanCache;
use crate::{CompiledRule, Item, MISSING_DISPLAY_PLACEHOLDER, Match, ReportItem};

fn verdict(rule: &CompiledRule) -> Match {
    Match::new(rule.kind().into(), rule.label())
}

/// The first rule, in order, matching `text`.
pub(crate) fn first_match(rules: &[CompiledRule], text: &str) -> Option<Match> {
    rules.iter().find(|r| r.matches(text)).map(verdict)
}

/// Every rule matching `text`, in rule order.
pub(crate) fn all_matches(rules: &[CompiledRule], text: &str) -> Vec<Match> {
    rules.iter().filter(|r| r.matches(text)).map(verdict).collect()
}

/// Streaming classification of one item.
///
/// Cached items are skipped. An item without a display value yields the lint
/// verdict and no rule runs. Otherwise the first matching rule wins; an item
/// that matches nothing is remembered as clean.
pub(crate) fn classify_first(
    rules: &[CompiledRule],
    cache: &mut CleanCache,
    item: &Item,
) -> Option<Match> {
    if cache.contains(&item.key) {
        return None;
    }
    let Some(display) = item.display_text() else {
        return Some(Match::missing_display());
    };
    let found = first_match(rules, display);
    if found.is_none() {
        cache.add(&item.key);
    }
    found
}

/// Batch classification of one item into a report row.
///
/// Unlike [`classify_first`] every rule is evaluated, and every item yields a
/// row: cached items report no matches, and items without a display value
/// report the lint verdict under [`MISSING_DISPLAY_PLACEHOLDER`].
pub(crate) fn classify_all(
    rules: &[CompiledRule],
    cache: &mut CleanCache,
    item: Item,
) -> ReportItem {
    let Item { key, display } = item;
    let display = display.filter(|d| !d.is_empty());

    if cache.contains(&key) {
        let display = display.unwrap_or_else(|| MISSING_DISPLAY_PLACEHOLDER.to_owned());
        return ReportItem::new(key, display, Vec::new());
    }
    let Some(display) = display else {
        return ReportItem::new(
            key,
            MISSING_DISPLAY_PLACEHOLDER,
            vec![Match::missing_display()],
        );
    };

    let matches = all_matches(rules, &display);
    if matches.is_empty() {
        cache.add(&key);
    }
    ReportItem::new(key, display, matches)
}
