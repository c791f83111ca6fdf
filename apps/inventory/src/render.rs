//! Plain-text rendering of each page for the terminal.

use std::fmt::Write as _;

use serde_json::Value;
use shared::{domain::LaptopRecord, draft::LaptopDraft};

use crate::controller::{
    DetailController, DetailView, FormController, FormView, ListController, PageError,
};

const LIST_HEADERS: [&str; 8] = [
    "ID",
    "Brand",
    "Model",
    "Price",
    "RAM",
    "Storage",
    "Available",
    "Stock",
];

/// Unknown keys kept out of the additional information block.
const DISPLAYED_KEYS: [&str; 3] = ["_id", "createdAt", "updatedAt"];

pub fn render_list(page: &ListController) -> String {
    let mut out = String::from("Laptop Management\n\n");
    if let Some(notice) = page.notice() {
        let _ = writeln!(out, "[ok] {}", notice.message());
    }
    push_error(&mut out, page.state().error());

    if page.state().loading() {
        out.push_str("Loading laptops...\n");
        return out;
    }

    let laptops = page.laptops();
    if laptops.is_empty() {
        out.push_str("No laptops found\nStart by adding your first laptop!\n");
        return out;
    }

    let rows: Vec<[String; 8]> = laptops.iter().map(list_row).collect();
    let mut widths = LIST_HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    push_row(&mut out, &LIST_HEADERS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn list_row(laptop: &LaptopRecord) -> [String; 8] {
    [
        laptop
            .display_id()
            .map(|id| id.to_string())
            .unwrap_or_default(),
        or_na(&laptop.brand),
        or_na(&laptop.model),
        price_text(laptop.price).unwrap_or_else(|| "N/A".into()),
        gigabytes(laptop.ram),
        gigabytes(laptop.storage),
        availability(laptop.is_available).to_string(),
        laptop.stock_quantity.to_string(),
    ]
}

fn push_row(out: &mut String, cells: &[String; 8], widths: &[usize; 8]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}

pub fn render_detail(page: &DetailController) -> String {
    let mut out = String::new();
    match page.view() {
        DetailView::Loading => out.push_str("Loading laptop details...\n"),
        DetailView::NotFound => push_not_found(&mut out),
        DetailView::Error(err) => {
            let _ = writeln!(out, "Error\n{}", err.message);
            out.push_str("Back to List: /laptops\n");
        }
        DetailView::Ready(laptop) => {
            out.push_str("Laptop Details\n\n");
            push_error(&mut out, page.state().error());
            push_card(&mut out, laptop);
            if let Some(route) = page.edit_route() {
                let _ = writeln!(out, "\nEdit This Laptop: {route}");
            }
            out.push_str("Back to List: /laptops\n");
        }
    }
    out
}

fn push_card(out: &mut String, laptop: &LaptopRecord) {
    let brand = non_empty(&laptop.brand).unwrap_or("Unknown Brand");
    let model = non_empty(&laptop.model).unwrap_or("Unknown Model");
    let _ = writeln!(out, "{brand} {model}");
    let _ = writeln!(out, "Status: {}", availability(laptop.is_available));
    if let Some(price) = price_text(laptop.price) {
        let _ = writeln!(out, "Price: {price}");
    }
    let _ = writeln!(out, "Stock Quantity: {}", laptop.stock_quantity);
    if let Some(id) = laptop.display_id() {
        let _ = writeln!(out, "ID: {id}");
    }

    out.push_str("\nSpecifications\n");
    let specs = [
        ("Processor", non_empty(&laptop.processor).map(str::to_string)),
        ("RAM", positive(laptop.ram).map(|ram| format!("{ram}GB"))),
        (
            "Storage",
            positive(laptop.storage).map(|storage| format!("{storage}GB")),
        ),
        ("GPU", non_empty(&laptop.gpu).map(str::to_string)),
        (
            "Operating System",
            non_empty(&laptop.operating_system).map(str::to_string),
        ),
        (
            "Screen Size",
            (laptop.screen_size > 0.0).then(|| format!("{} inches", laptop.screen_size)),
        ),
    ];
    for (label, value) in specs {
        if let Some(value) = value {
            let _ = writeln!(out, "  {label}: {value}");
        }
    }

    if let Some(description) = non_empty(&laptop.description) {
        let _ = writeln!(out, "\nDescription\n  {description}");
    }

    let additional = additional_fields(laptop);
    if !additional.is_empty() {
        out.push_str("\nAdditional Information\n");
        for (key, value) in additional {
            let _ = writeln!(out, "  {key}: {value}");
        }
    }
}

/// Unknown fields with a truthy value, keys capitalized.
pub fn additional_fields(laptop: &LaptopRecord) -> Vec<(String, String)> {
    laptop
        .extra
        .iter()
        .filter(|(key, value)| !DISPLAYED_KEYS.contains(&key.as_str()) && is_truthy(value))
        .map(|(key, value)| (capitalize(key), value_text(value)))
        .collect()
}

pub fn render_form(page: &FormController) -> String {
    let mut out = String::new();
    match page.view() {
        FormView::Loading => out.push_str("Loading laptop data...\n"),
        FormView::NotFound => push_not_found(&mut out),
        FormView::Ready(draft) => {
            let _ = writeln!(out, "{}\n", page.title());
            push_error(&mut out, page.state().error());
            push_draft(&mut out, draft);
            if page.state().is_mutating() {
                out.push_str("\nSaving...\n");
            }
        }
    }
    out
}

fn push_draft(out: &mut String, draft: &LaptopDraft) {
    let fields = [
        ("Brand *", draft.brand.as_str()),
        ("Model *", draft.model.as_str()),
        ("Price ($)", draft.price.as_str()),
        ("Processor", draft.processor.as_str()),
        ("RAM (GB)", draft.ram.as_str()),
        ("Storage (GB)", draft.storage.as_str()),
        ("GPU", draft.gpu.as_str()),
        ("Operating System", draft.operating_system.as_str()),
        ("Screen Size (inches)", draft.screen_size.as_str()),
        ("Stock Quantity", draft.stock_quantity.as_str()),
        ("Description", draft.description.as_str()),
    ];
    for (label, value) in fields {
        let _ = writeln!(out, "{label:<22}{value}");
    }
    let checkbox = if draft.is_available { "[x]" } else { "[ ]" };
    let _ = writeln!(out, "{:<22}{checkbox}", "Available for Sale");
}

fn push_error(out: &mut String, error: Option<&PageError>) {
    if let Some(error) = error {
        let _ = writeln!(out, "[error] {}", error.message);
    }
}

fn push_not_found(out: &mut String) {
    out.push_str("Laptop Not Found\nThe requested laptop could not be found.\n");
    out.push_str("Back to Laptop List: /laptops\n");
}

fn availability(available: bool) -> &'static str {
    if available {
        "Available"
    } else {
        "Not Available"
    }
}

fn price_text(price: f64) -> Option<String> {
    (price > 0.0).then(|| format!("${price:.2}"))
}

fn gigabytes(amount: u64) -> String {
    positive(amount)
        .map(|amount| format!("{amount}GB"))
        .unwrap_or_else(|| "N/A".into())
}

fn positive(amount: u64) -> Option<u64> {
    (amount > 0).then_some(amount)
}

fn non_empty(text: &str) -> Option<&str> {
    (!text.is_empty()).then_some(text)
}

fn or_na(text: &str) -> String {
    non_empty(text).unwrap_or("N/A").to_string()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
