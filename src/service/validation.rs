//! Order payload validation. Only `items` is read from the body; `user`, `created_at`,
//! `total_price` and any other keys are ignored.

use crate::error::AppError;
use serde_json::{Map, Value};

pub const DEFAULT_QUANTITY: i32 = 1;

/// One requested order line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemInput {
    pub product: i64,
    pub quantity: i32,
}

pub struct OrderValidator;

impl OrderValidator {
    /// Create and full update: `items` is required (it may be an empty list).
    pub fn validate_full(body: &Value) -> Result<Vec<ItemInput>, AppError> {
        let map = body_to_map(body)?;
        match map.get("items") {
            None => Err(AppError::Validation("items: This field is required.".into())),
            Some(v) => parse_items(v),
        }
    }

    /// Partial update: `items` is optional; when present it replaces the item set.
    pub fn validate_partial(body: &Value) -> Result<Option<Vec<ItemInput>>, AppError> {
        let map = body_to_map(body)?;
        map.get("items").map(parse_items).transpose()
    }
}

fn body_to_map(value: &Value) -> Result<&Map<String, Value>, AppError> {
    value
        .as_object()
        .ok_or_else(|| AppError::Validation("Invalid data. Expected a dictionary.".into()))
}

fn parse_items(value: &Value) -> Result<Vec<ItemInput>, AppError> {
    let list = value.as_array().ok_or_else(|| {
        AppError::Validation("items: Expected a list of items.".into())
    })?;
    list.iter()
        .enumerate()
        .map(|(i, item)| parse_item(i, item))
        .collect()
}

fn parse_item(index: usize, value: &Value) -> Result<ItemInput, AppError> {
    let field_err = |field: &str, msg: &str| {
        AppError::Validation(format!("items[{}].{}: {}", index, field, msg))
    };
    let obj = value
        .as_object()
        .ok_or_else(|| AppError::Validation(format!("items[{}]: Expected a dictionary.", index)))?;

    let product = match obj.get("product") {
        None | Some(Value::Null) => return Err(field_err("product", "This field is required.")),
        Some(v) => as_integer(v).ok_or_else(|| field_err("product", "Incorrect type. Expected pk value."))?,
    };
    if product < 1 {
        return Err(field_err("product", &format!("Invalid pk \"{}\" - object does not exist.", product)));
    }

    let quantity = match obj.get("quantity") {
        None => DEFAULT_QUANTITY as i64,
        Some(v) => as_integer(v).ok_or_else(|| field_err("quantity", "A valid integer is required."))?,
    };
    if quantity < 1 {
        return Err(field_err("quantity", "Ensure this value is greater than or equal to 1."));
    }
    if quantity > i32::MAX as i64 {
        return Err(field_err(
            "quantity",
            &format!("Ensure this value is less than or equal to {}.", i32::MAX),
        ));
    }

    Ok(ItemInput {
        product,
        quantity: quantity as i32,
    })
}

/// Integers, or strings holding one.
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
