use crate::model::{DEFAULT_LIMIT_PER_LISTING, InputError, InputSpec, ListingResult};
use crate::parser::lenient::as_count;
use serde_json::Value;

/// Validates the input document. `roomids` must be a non-empty array of
/// strings or numbers; a missing or unusable `limit_per_listing` becomes 20.
pub fn validate_inputs(obj: &Value) -> Result<InputSpec, InputError> {
    let obj = obj.as_object().ok_or(InputError::NotAnObject)?;

    let ids = obj
        .get("roomids")
        .and_then(Value::as_array)
        .ok_or(InputError::MissingRoomIds)?;
    if ids.is_empty() {
        return Err(InputError::EmptyRoomIds);
    }

    let roomids = ids
        .iter()
        .enumerate()
        .map(|(index, id)| match id {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(InputError::InvalidRoomId {
                index,
                found: other.to_string(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let limit_per_listing = obj
        .get("limit_per_listing")
        .and_then(coerce_limit)
        .unwrap_or(DEFAULT_LIMIT_PER_LISTING);

    Ok(InputSpec {
        roomids,
        limit_per_listing,
    })
}

fn coerce_limit(value: &Value) -> Option<u32> {
    as_count(value).and_then(|v| u32::try_from(v).ok())
}

/// Results are already normalized per listing; nothing is merged or reordered.
pub fn aggregate_results(items: Vec<ListingResult>) -> Vec<ListingResult> {
    items
}

pub fn render_summary_table(results: &[ListingResult]) -> String {
    const ID_HEADER: &str = "Room ID";
    const COUNT_HEADER: &str = "Review Count";

    let id_width = results
        .iter()
        .map(|r| r.roomid.chars().count())
        .chain(std::iter::once(ID_HEADER.len()))
        .max()
        .unwrap_or(ID_HEADER.len());
    let count_width = results
        .iter()
        .map(|r| r.count.to_string().len())
        .chain(std::iter::once(COUNT_HEADER.len()))
        .max()
        .unwrap_or(COUNT_HEADER.len());

    let border = format!("+-{}-+-{}-+\n", "-".repeat(id_width), "-".repeat(count_width));
    let mut table = String::from("Review Scraper Summary\n");
    table.push_str(&border);
    table.push_str(&format!(
        "| {:<id_width$} | {:>count_width$} |\n",
        ID_HEADER, COUNT_HEADER
    ));
    table.push_str(&border);
    for item in results {
        table.push_str(&format!(
            "| {:<id_width$} | {:>count_width$} |\n",
            item.roomid, item.count
        ));
    }
    table.push_str(&border);
    table
}
