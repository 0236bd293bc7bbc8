use crate::client::Item;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct ItemRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Price")]
    pub price: String,
    #[tabled(rename = "Qty")]
    pub quantity: String,
    #[tabled(rename = "Supplier")]
    pub supplier: String,
}

impl From<&Item> for ItemRow {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            price: format!("{:.2}", item.price),
            quantity: if item.quantity == 0 {
                "sold out".to_string()
            } else {
                item.quantity.to_string()
            },
            supplier: item.supplier_name.clone(),
        }
    }
}

/// Render items as a rounded table; empty input renders nothing
pub fn item_table(items: &[Item]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let rows: Vec<ItemRow> = items.iter().map(ItemRow::from).collect();
    Table::new(&rows).with(Style::rounded()).to_string()
}
