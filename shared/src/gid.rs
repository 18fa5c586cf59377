//! Platform global ids (`gid://shopify/<Type>/<id>`)
//!
//! Committed objects and their edit-session staging copies live in
//! different id namespaces: `LineItem/123` becomes `CalculatedLineItem/123`
//! inside an edit session.

const GID_PREFIX: &str = "gid://shopify/";

/// Last path segment of a gid, or the input itself when it is already bare
pub fn bare_id(id: &str) -> &str {
    id.trim_end_matches('/').rsplit('/').next().unwrap_or(id)
}

fn gid(kind: &str, id: &str) -> String {
    if id.starts_with(GID_PREFIX) {
        id.to_string()
    } else {
        format!("{GID_PREFIX}{kind}/{id}")
    }
}

/// `123` or an order gid → `gid://shopify/Order/123`
pub fn order_gid(id: &str) -> String {
    gid("Order", id)
}

/// `123` or a line item gid → `gid://shopify/LineItem/123`
pub fn line_item_gid(id: &str) -> String {
    gid("LineItem", id)
}

/// Staging id of a committed line item within an edit session
pub fn calculated_line_item_gid(line_item_id: &str) -> String {
    format!("{GID_PREFIX}CalculatedLineItem/{}", bare_id(line_item_id))
}
