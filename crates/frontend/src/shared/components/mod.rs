pub mod card_animated;
pub mod formatted_date;
pub mod pagination_controls;
pub mod ui;
