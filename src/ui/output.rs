use crate::client::Item;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::BOX, text.style(theme().header.clone()));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().info.clone()),
        label.style(theme().dim.clone()),
        value
    );
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

pub fn muted(text: &str) -> String {
    text.style(theme().muted.clone()).to_string()
}

/// Quantity text, highlighted when the item has run out
pub fn quantity_label(quantity: i64) -> String {
    if quantity == 0 {
        "sold out".style(theme().out_of_stock.clone()).to_string()
    } else {
        quantity.to_string()
    }
}

pub fn item_detail(item: &Item) {
    header(&format!("#{} {}", item.id, item.name));
    println!(
        "  {} {}",
        Icons::TAG,
        format!("{:.2}", item.price).style(theme().price.clone())
    );
    println!("  {} {}", Icons::BOX, quantity_label(item.quantity));
    if let Some(image) = &item.image {
        println!("  {} {}", muted("image"), image);
    }
    section("Supplier");
    println!("  {} {}", Icons::PERSON, item.supplier_name);
    println!("  {} {}", Icons::PHONE, item.supplier_phone);
    println!("  {} {}", Icons::MAIL, item.supplier_mail);
}
