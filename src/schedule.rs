//! Projection of the aggregated item list onto a day's schedule.
//!
//! Every lookup here is total: unknown days fall back to the default day,
//! out-of-range blocks resolve to an empty item, and missing fields drop the
//! corresponding line. The first applicable rule always wins.

use crate::models::{present, DayCode, FieldValue, Item, RenderedRecord};

static EMPTY_ITEM: Item = Item {
    title: None,
    artist: None,
    class_name: None,
    year: None,
    location: None,
};

const UNTITLED: &str = "Untitled";

/// Project `items` onto the schedule for `day`.
///
/// `day` is resolved leniently; anything unrecognized projects the default day.
pub fn project(day: &str, items: &[Item]) -> Vec<RenderedRecord> {
    project_day(DayCode::resolve(day), items)
}

/// Project `items` onto the schedule for an already-resolved day.
///
/// Produces exactly one record per schedule slot, in schedule order.
pub fn project_day(day: DayCode, items: &[Item]) -> Vec<RenderedRecord> {
    day.blocks()
        .iter()
        .enumerate()
        .map(|(idx, &block)| render_record(idx, resolve_block(items, block)))
        .collect()
}

/// Look up a 1-based block number, substituting the empty item when it is out of range.
pub fn resolve_block(items: &[Item], block: usize) -> &Item {
    block
        .checked_sub(1)
        .and_then(|index| items.get(index))
        .unwrap_or(&EMPTY_ITEM)
}

/// Render one slot. `idx` is the 0-based position within the day, not the block number.
pub fn render_record(idx: usize, item: &Item) -> RenderedRecord {
    let title = match present(&item.title) {
        Some(title) => format!("Block {}: {}", idx + 1, title),
        None => format!("Block {}: {}", idx + 1, UNTITLED),
    };

    // artist > class, year > location
    let lines = [
        first_present(&[("Artist", &item.artist), ("Class", &item.class_name)]),
        first_present(&[("Year", &item.year), ("Location", &item.location)]),
    ]
    .into_iter()
    .flatten()
    .collect();

    RenderedRecord { title, lines }
}

fn first_present(candidates: &[(&str, &Option<FieldValue>)]) -> Option<String> {
    candidates
        .iter()
        .find_map(|(label, field)| present(field).map(|value| format!("{}: {}", label, value)))
}
