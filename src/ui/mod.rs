pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{error, header, info, item_detail, muted, quantity_label, section, success, warn};
pub use table::{item_table, ItemRow};
pub use theme::{theme, Theme};
