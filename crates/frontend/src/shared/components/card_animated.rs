//! CardAnimated: Thaw Card with an appear animation.
//!
//! Used by the card layout of credential lists; pass an increasing
//! `delay_ms` for a stagger effect. The keyframes live in `style.css`
//! (`@keyframes card-appear`).

use leptos::prelude::*;
use thaw::Card;

/// Step between consecutive cards in a list, capped so long lists settle quickly
pub fn stagger_delay(index: usize) -> u32 {
    (index.min(10) as u32) * 40
}

#[component]
pub fn CardAnimated(
    /// Animation delay in milliseconds.
    #[prop(optional)]
    delay_ms: u32,
    /// Extra CSS classes for the card.
    #[prop(optional, into)]
    class: String,
    children: Children,
) -> impl IntoView {
    let style = format!("animation: card-appear 0.28s ease-out {}ms both;", delay_ms);

    view! {
        <Card class=class attr:style=style>
            {children()}
        </Card>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stagger_delay_is_capped() {
        assert_eq!(stagger_delay(0), 0);
        assert_eq!(stagger_delay(3), 120);
        assert_eq!(stagger_delay(50), 400);
    }
}
