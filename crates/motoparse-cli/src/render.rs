//! Plain-text summaries of parse results for the terminal.

use std::fmt::Write as _;

use motoparse_core::{ParseResult, Product};

/// Characteristics shown before the list is cut short.
const CHARACTERISTICS_PREVIEW: usize = 3;

pub(crate) fn parse_result(result: &ParseResult) -> String {
    match result {
        ParseResult::Catalog {
            products,
            total_items,
        } => catalog(products, *total_items),
        ParseResult::Product { details } => product_details(details),
    }
}

fn catalog(products: &[Product], total_items: u64) -> String {
    let mut out = format!("Найдено товаров: {}", products.len());
    if total_items > 0 {
        let _ = write!(out, " (Всего: {total_items})");
    }
    out.push('\n');
    for (i, product) in products.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {}\t{}\t{}",
            i + 1,
            product.name,
            product.price,
            product.link
        );
    }
    out
}

fn product_details(product: &Product) -> String {
    let mut out = String::new();
    if product.site == "rollingmoto" {
        let _ = writeln!(out, "Бренд: {}", product.brand);
        let _ = writeln!(out, "Модель: {}", product.model);
        let _ = writeln!(out, "Год: {}", product.year);
    } else {
        let _ = writeln!(out, "Наименование: {}", product.name);
    }

    let _ = write!(out, "Цена: {}", product.price);
    if let Some(old_price) = &product.old_price {
        let _ = write!(out, " (было {old_price})");
    }
    if let Some(discount) = &product.discount {
        let _ = write!(out, " Скидка: {discount}");
    }
    if let Some(economy) = &product.economy {
        let _ = write!(out, " Экономия: {economy}");
    }
    out.push('\n');

    let description = if product.description.is_empty() {
        "Нет описания"
    } else {
        product.description.as_str()
    };
    let _ = writeln!(out, "Описание: {description}");

    if let Some(characteristics) = product.characteristics.as_ref().filter(|c| !c.is_empty()) {
        out.push_str("Характеристики:\n");
        for (key, value) in characteristics.iter().take(CHARACTERISTICS_PREVIEW) {
            let _ = writeln!(out, "  {key}: {value}");
        }
        let hidden = characteristics.len().saturating_sub(CHARACTERISTICS_PREVIEW);
        if hidden > 0 {
            let _ = writeln!(out, "  ... и еще {hidden}");
        }
    }

    let _ = writeln!(out, "Изображений: {}", product.images.len());
    let _ = writeln!(out, "Ссылка: {}", product.link);
    out
}
