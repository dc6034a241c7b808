use leptos::prelude::*;

use homestead_shared::{
    Attribute, LinearScale, NO_DATA_FILL, QuantileScale, RegionRow, colors::parse_hex, extent,
};

use crate::chart::{ChartLayout, bar_ranks, bar_rect};
use crate::transition::{
    BAR_DURATION_MS, BAR_STAGGER_MS, BarTween, FillTween, MAP_FILL_DURATION_MS, TransitionSet,
    kick_clock, now_ms,
};

/// Everything the switch needs, bundled the way event handlers receive it.
pub struct SwitchInput {
    pub rows: RwSignal<Vec<RegionRow>>,
    pub selected: RwSignal<Attribute>,
    pub y_scale: RwSignal<LinearScale>,
    pub title: RwSignal<String>,
    pub transitions: RwSignal<TransitionSet>,
    pub layout: ChartLayout,
}

/// Switch the displayed attribute. Both scales are rebuilt from the new
/// attribute's distribution and both views get tweens from their current
/// visual state to the new one; the axis domain and title follow, and the
/// clock is armed. The fresh `TransitionSet` supersedes any in-flight switch.
pub fn switch_attribute(new_attr: Attribute, input: SwitchInput) {
    let now = now_ms();
    let old_attr = input.selected.get_untracked();
    let old_y = input.y_scale.get_untracked();
    let inner_height = input.layout.inner_height();

    let (next, new_y) = input.rows.with_untracked(|rows| {
        input.transitions.with_untracked(|previous| {
            // Quantile breakpoints are attribute-specific, and so is the
            // axis domain; a missing extent (no valid values) keeps the
            // previous domain rather than collapsing the chart.
            let new_y = match extent(rows.iter().map(|r| r.value(new_attr))) {
                Some((min, max)) => LinearScale::new((min, max), (inner_height, 0.0)),
                None => old_y,
            };

            let mut next = TransitionSet::next_generation(previous);
            build_fill_tweens(&mut next, previous, rows, old_attr, new_attr, now);
            build_bar_tweens(
                &mut next,
                previous,
                rows,
                old_attr,
                &old_y,
                new_attr,
                &new_y,
                input.layout,
                now,
            );
            (next, new_y)
        })
    });

    input.selected.set(new_attr);
    input.y_scale.set(new_y);
    input.title.set(format!("{} Per State", new_attr.label()));
    input.transitions.set(next);
    kick_clock();
}

/// One fill tween per region key whose color actually changes, seeded from
/// the currently displayed color (mid-flight if a previous switch is still
/// running). Map regions and bars share keys and scales, so one tween per
/// key drives both; an unmatched feature stays on the sentinel fill and
/// never needs one.
fn build_fill_tweens(
    next: &mut TransitionSet,
    previous: &TransitionSet,
    rows: &[RegionRow],
    old_attr: Attribute,
    new_attr: Attribute,
    now: f64,
) {
    let old_scale = QuantileScale::from_values(rows.iter().map(|r| r.value(old_attr)));
    let new_scale = QuantileScale::from_values(rows.iter().map(|r| r.value(new_attr)));

    for row in rows {
        let old_css = match row.value(old_attr) {
            Some(v) => old_scale.color(v),
            None => NO_DATA_FILL,
        };
        let new_css = match row.value(new_attr) {
            Some(v) => new_scale.color(v),
            None => NO_DATA_FILL,
        };

        let to = parse_hex(new_css).unwrap_or((204, 204, 204));
        let from = previous
            .fill_rgb(&row.key, now)
            .or_else(|| parse_hex(old_css))
            .unwrap_or(to);
        if from == to {
            continue;
        }
        next.insert_fill(
            row.key.clone(),
            FillTween::new(from, to, now, MAP_FILL_DURATION_MS),
        );
    }
}

/// One geometry tween per bar, staggered by its new rank.
#[allow(clippy::too_many_arguments)]
fn build_bar_tweens(
    next: &mut TransitionSet,
    previous: &TransitionSet,
    rows: &[RegionRow],
    old_attr: Attribute,
    old_y: &LinearScale,
    new_attr: Attribute,
    new_y: &LinearScale,
    layout: ChartLayout,
    now: f64,
) {
    let n = rows.len();
    let old_ranks = bar_ranks(rows, old_attr);
    let new_ranks = bar_ranks(rows, new_attr);

    for (i, row) in rows.iter().enumerate() {
        let from = previous
            .bar_rect(&row.key, now)
            .unwrap_or_else(|| bar_rect(old_ranks[i], n, row.value(old_attr), layout, old_y));
        let to = bar_rect(new_ranks[i], n, row.value(new_attr), layout, new_y);
        if from == to {
            continue;
        }
        next.insert_bar(
            row.key.clone(),
            BarTween {
                from,
                to,
                start: now + new_ranks[i] as f64 * BAR_STAGGER_MS,
                duration: BAR_DURATION_MS,
            },
        );
    }
}
