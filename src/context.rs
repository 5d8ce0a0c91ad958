// Correlation ids for requests that arrive without one

use uuid::Uuid;

/// A fresh random context id. Requests treat it as an opaque string.
pub fn new_context_id() -> String {
    Uuid::new_v4().to_string()
}

/// The caller's context id, or a fresh one when absent
pub fn context_id_or_new(context_id: Option<&str>) -> String {
    context_id
        .map(str::to_string)
        .unwrap_or_else(new_context_id)
}
